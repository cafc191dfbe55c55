//! Per-request driver: adapt, dispatch, merge.

use std::fmt;
use std::sync::Arc;

use crate::bridge::dispatch::Dispatcher;
use crate::bridge::request_adapter::RequestAdapter;
use crate::bridge::response_adapter::ResponseAdapter;
use crate::config::BridgeSettings;
use crate::error::BridgeError;
use crate::http::{CanonicalResponse, InboundRequestSnapshot, MutableSink};
use crate::observability::metrics;

/// Path answered with an empty response and never dispatched.
pub const FAVICON_PATH: &str = "/favicon.ico";

/// Stage of one exchange. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Adapting,
    Dispatching,
    Merging,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Adapting => "adapting",
            Phase::Dispatching => "dispatching",
            Phase::Merging => "merging",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Stateless bridge between the host and a dispatcher.
///
/// Holds nothing per request; one instance serves concurrent exchanges.
pub struct Bridge<D> {
    dispatcher: Arc<D>,
    request_adapter: RequestAdapter,
    response_adapter: ResponseAdapter,
}

impl<D: Dispatcher> Bridge<D> {
    pub fn new(dispatcher: Arc<D>, settings: &BridgeSettings) -> Self {
        Self {
            dispatcher,
            request_adapter: RequestAdapter::new(),
            response_adapter: ResponseAdapter::new(settings.auto_content_length),
        }
    }

    /// Same dispatcher, new settings.
    #[must_use]
    pub fn reconfigured(&self, settings: &BridgeSettings) -> Self {
        Self::new(Arc::clone(&self.dispatcher), settings)
    }

    pub fn dispatcher(&self) -> &Arc<D> {
        &self.dispatcher
    }

    pub fn response_adapter(&self) -> &ResponseAdapter {
        &self.response_adapter
    }

    /// Whether the request is answered without dispatching.
    pub fn is_bypassed(snapshot: &InboundRequestSnapshot) -> bool {
        snapshot.path_info == FAVICON_PATH || snapshot.request_uri == FAVICON_PATH
    }

    /// Run one exchange and return the written sink.
    ///
    /// The sink is ended here only for bypassed requests; otherwise the host
    /// finalizes it. Dispatcher and merge failures are returned unchanged.
    pub fn handle<S: MutableSink>(
        &self,
        snapshot: &InboundRequestSnapshot,
        mut sink: S,
    ) -> Result<S, BridgeError> {
        if Self::is_bypassed(snapshot) {
            tracing::debug!(uri = %snapshot.request_uri, "Static asset bypass");
            metrics::record_bypass();
            sink.end()?;
            return Ok(sink);
        }

        let mut phase = Phase::Adapting;
        tracing::trace!(%phase, method = %snapshot.method, uri = %snapshot.request_uri);
        let request = self.request_adapter.adapt(snapshot);

        phase = Phase::Dispatching;
        tracing::trace!(%phase, method = %request.method(), uri = %request.uri());
        let response = self
            .dispatcher
            .process(request, CanonicalResponse::new())
            .inspect_err(|e| {
                tracing::error!(%phase, error = %e, "Dispatcher failed");
                metrics::record_error("dispatch");
            })?;

        phase = Phase::Merging;
        tracing::trace!(%phase, status = response.status());
        let sink = self.response_adapter.merge(response, sink).inspect_err(|e| {
            tracing::error!(
                %phase,
                error = %e,
                "Response merge failed; sink is partially written"
            );
            metrics::record_error(e.kind());
        })?;

        phase = Phase::Done;
        tracing::trace!(%phase);
        Ok(sink)
    }
}
