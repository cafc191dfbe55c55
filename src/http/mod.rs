//! HTTP message model shared by the host and the bridge.
//!
//! # Data Flow
//! ```text
//! host capture
//!     → inbound.rs (InboundRequestSnapshot, read-only to the bridge)
//!     → request.rs (CanonicalRequest, immutable, copy-on-write)
//!     → [dispatcher]
//!     → response.rs (CanonicalResponse + body.rs)
//!     → sink.rs (MutableSink, ordered writes)
//! ```

pub mod body;
pub mod headers;
pub mod inbound;
pub mod request;
pub mod response;
pub mod sink;

pub use body::{BodyStream, ResponseBody};
pub use headers::HeaderSet;
pub use inbound::{InboundRequestSnapshot, RawUpload};
pub use request::{CanonicalRequest, ParsedBody, ServerParams, UploadedFileDescriptor};
pub use response::CanonicalResponse;
pub use sink::{MutableSink, SinkError};
