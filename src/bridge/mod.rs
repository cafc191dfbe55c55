//! Request/response bridge between the host and the application.
//!
//! # Data Flow
//! ```text
//! InboundRequestSnapshot
//!     → request_adapter.rs (+ form.rs)  → CanonicalRequest
//!     → dispatch.rs (Dispatcher)         → CanonicalResponse
//!     → response_adapter.rs              → MutableSink
//! ```
//!
//! `orchestrator.rs` drives the three steps for one exchange and answers
//! `/favicon.ico` without dispatching.
//!
//! # Limitations
//! - The scheme is always `http`; the transport is never inspected.
//! - A body read failure during merge leaves the sink with headers and
//!   status but no body. The error is returned so the host can discard it.

pub mod dispatch;
pub mod form;
pub mod orchestrator;
pub mod request_adapter;
pub mod response_adapter;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatch::{DispatchError, Dispatcher};
pub use orchestrator::{Bridge, Phase, FAVICON_PATH};
pub use request_adapter::RequestAdapter;
pub use response_adapter::ResponseAdapter;
