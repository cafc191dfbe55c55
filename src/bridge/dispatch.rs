//! Interface to the application that turns requests into responses.

use thiserror::Error;

use crate::http::{CanonicalRequest, CanonicalResponse};

/// Failure raised by the application. The bridge never handles it.
#[derive(Debug, Error)]
#[error("dispatch failed: {message}")]
pub struct DispatchError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DispatchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The application side of the bridge.
///
/// Receives the adapted request and an empty response to fill in.
pub trait Dispatcher: Send + Sync {
    fn process(
        &self,
        request: CanonicalRequest,
        response: CanonicalResponse,
    ) -> Result<CanonicalResponse, DispatchError>;
}

impl<F> Dispatcher for F
where
    F: Fn(CanonicalRequest, CanonicalResponse) -> Result<CanonicalResponse, DispatchError>
        + Send
        + Sync,
{
    fn process(
        &self,
        request: CanonicalRequest,
        response: CanonicalResponse,
    ) -> Result<CanonicalResponse, DispatchError> {
        self(request, response)
    }
}
