//! The event-driven host runtime.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, catch-all route)
//!     → capture.rs (InboundRequestSnapshot, uploads spooled)
//!     → bridge (on a blocking thread)
//!     → sink.rs (HostSink → axum Response)
//!     → spooled uploads removed
//! ```

pub mod capture;
pub mod server;
pub mod sink;

pub use capture::{CaptureContext, CaptureError};
pub use server::HostServer;
pub use sink::HostSink;
