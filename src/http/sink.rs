//! The host's mutable per-request output.
//!
//! Calls must arrive in order: headers, then the status line, then at most
//! one body write. `end` belongs to the host, except for requests the bridge
//! answers without dispatching.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("header `{0}` set after the status line")]
    HeaderAfterStatus(String),

    #[error("status set after the body was written")]
    StatusAfterBody,

    #[error("body already written")]
    BodyAlreadyWritten,

    #[error("body written before the status line")]
    BodyBeforeStatus,

    #[error("invalid status code {0}")]
    InvalidStatus(u16),

    #[error("invalid header `{0}`")]
    InvalidHeader(String),

    #[error("exchange already ended")]
    Ended,
}

pub trait MutableSink {
    fn set_header(&mut self, name: &str, value: &str) -> Result<(), SinkError>;

    fn set_status(&mut self, status: u16) -> Result<(), SinkError>;

    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError>;

    /// Finalize the exchange. No further calls are accepted.
    fn end(&mut self) -> Result<(), SinkError>;
}
