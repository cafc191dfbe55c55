//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use http_bridge::config::{BridgeConfig, ReloadSignal};
use http_bridge::http::{CanonicalRequest, CanonicalResponse};
use http_bridge::{DispatchError, Dispatcher, HostServer, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A running bridge server.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub reload_tx: mpsc::UnboundedSender<ReloadSignal>,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a bridge server on an ephemeral port.
pub async fn start_bridge<D: Dispatcher + 'static>(
    config: BridgeConfig,
    dispatcher: Arc<D>,
) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (reload_tx, reload_rx) = mpsc::unbounded_channel();
    let server = HostServer::new(config, dispatcher);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, reload_rx, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    TestServer {
        addr,
        shutdown,
        reload_tx,
    }
}

type Handler =
    dyn Fn(&CanonicalRequest, CanonicalResponse) -> Result<CanonicalResponse, DispatchError>
        + Send
        + Sync;

/// Dispatcher that counts calls, keeps the last request and delegates to a
/// closure.
pub struct RecordingApp {
    calls: AtomicUsize,
    last: Mutex<Option<CanonicalRequest>>,
    handler: Box<Handler>,
}

#[allow(dead_code)]
impl RecordingApp {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&CanonicalRequest, CanonicalResponse) -> Result<CanonicalResponse, DispatchError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
            handler: Box::new(handler),
        }
    }

    pub fn ok() -> Self {
        Self::new(|_, response| Ok(response))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CanonicalRequest> {
        self.last.lock().unwrap().clone()
    }
}

impl Dispatcher for RecordingApp {
    fn process(
        &self,
        request: CanonicalRequest,
        response: CanonicalResponse,
    ) -> Result<CanonicalResponse, DispatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = (self.handler)(&request, response);
        *self.last.lock().unwrap() = Some(request);
        result
    }
}
