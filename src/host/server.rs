//! HTTP host server.
//!
//! # Responsibilities
//! - Create the axum Router with a catch-all bridge handler
//! - Wire up middleware (tracing, body limit)
//! - Capture each request as an inbound snapshot
//! - Run the bridge off the reactor and finalize the exchange
//! - Turn bridge failures into empty 500 responses
//! - Hand reload signals to the supervisor

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::{ConnectInfo, DefaultBodyLimit, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::trace::TraceLayer;

use crate::bridge::{Bridge, Dispatcher};
use crate::config::{BridgeConfig, ReloadSignal, UploadConfig};
use crate::error::BridgeError;
use crate::host::capture::{self, CaptureContext};
use crate::host::sink::HostSink;
use crate::http::{InboundRequestSnapshot, MutableSink};
use crate::lifecycle::Supervisor;
use crate::observability::metrics;

/// State shared by every handler invocation.
pub struct AppState<D> {
    pub bridge: Arc<ArcSwap<Bridge<D>>>,
    pub local_port: u16,
    pub max_body_size: usize,
    pub uploads: UploadConfig,
}

impl<D> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            bridge: Arc::clone(&self.bridge),
            local_port: self.local_port,
            max_body_size: self.max_body_size,
            uploads: self.uploads.clone(),
        }
    }
}

/// Host server driving the bridge for every request.
pub struct HostServer<D> {
    config: BridgeConfig,
    bridge: Arc<ArcSwap<Bridge<D>>>,
    config_path: Option<PathBuf>,
}

impl<D: Dispatcher + 'static> HostServer<D> {
    /// Create a new host server around `dispatcher`.
    pub fn new(config: BridgeConfig, dispatcher: Arc<D>) -> Self {
        let bridge = Bridge::new(dispatcher, &config.bridge);
        Self {
            config,
            bridge: Arc::new(ArcSwap::from_pointee(bridge)),
            config_path: None,
        }
    }

    /// Config file re-read on every reload signal.
    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Handle to the live bridge.
    pub fn bridge(&self) -> Arc<ArcSwap<Bridge<D>>> {
        Arc::clone(&self.bridge)
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Build the axum router with all middleware layers.
    fn build_router(&self, local_port: u16) -> Router {
        let state = AppState {
            bridge: Arc::clone(&self.bridge),
            local_port,
            max_body_size: self.config.server.max_body_size,
            uploads: self.config.uploads.clone(),
        };

        Router::new()
            .route("/", any(bridge_handler::<D>))
            .route("/{*path}", any(bridge_handler::<D>))
            .with_state(state)
            .layer(DefaultBodyLimit::max(self.config.server.max_body_size))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        reload_signals: mpsc::UnboundedReceiver<ReloadSignal>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            auto_content_length = self.config.bridge.auto_content_length,
            "Bridge server starting"
        );

        let supervisor = Supervisor::new(Arc::clone(&self.bridge), self.config_path.clone());
        tokio::spawn(supervisor.run(reload_signals, shutdown.resubscribe()));

        let app = self
            .build_router(addr.port())
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("Bridge server stopped");
        Ok(())
    }
}

/// Run the bridge and end the sink the way the host always does.
fn exchange<D: Dispatcher>(
    bridge: &Bridge<D>,
    snapshot: &InboundRequestSnapshot,
) -> Result<HostSink, BridgeError> {
    let mut sink = bridge.handle(snapshot, HostSink::new())?;
    if !sink.is_ended() {
        sink.end()?;
    }
    Ok(sink)
}

async fn bridge_handler<D: Dispatcher + 'static>(
    State(state): State<AppState<D>>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();

    let ctx = CaptureContext {
        local_port: state.local_port,
        remote,
        max_body_size: state.max_body_size,
        uploads: state.uploads.clone(),
    };

    let snapshot = match capture::capture(request, &ctx).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(method = %method, error = %e, "Failed to capture request");
            metrics::record_error("capture");
            let response = e.into_response();
            metrics::record_request(&method, response.status().as_u16(), start);
            return response;
        }
    };

    let spooled = capture::spooled_paths(&snapshot);
    let bridge = state.bridge.load_full();

    let outcome = tokio::task::spawn_blocking(move || exchange(&bridge, &snapshot)).await;

    let response = match outcome {
        Ok(Ok(sink)) => sink.into_response(),
        Ok(Err(e)) => {
            tracing::error!(method = %method, error = %e, "Bridge exchange failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            tracing::error!(method = %method, error = %e, "Bridge task panicked");
            metrics::record_error("panic");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    };

    capture::cleanup(spooled).await;
    metrics::record_request(&method, response.status().as_u16(), start);
    response
}
