//! Errors surfaced by one bridged exchange.

use thiserror::Error;

use crate::bridge::DispatchError;
use crate::http::SinkError;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// The application failed. Rendering an error page is the host's job.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The response body could not be read while merging.
    #[error("failed to read response body: {0}")]
    Body(#[source] std::io::Error),

    /// The host sink refused a call.
    #[error("sink rejected write: {0}")]
    Sink(#[from] SinkError),
}

impl BridgeError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Dispatch(_) => "dispatch",
            Self::Body(_) => "body",
            Self::Sink(_) => "sink",
        }
    }
}
