//! HTTP request/response bridge library.
//!
//! Translates requests from an event-driven HTTP host into immutable
//! canonical messages for a synchronous dispatcher, and writes the
//! dispatcher's response back into the host's mutable sink.

pub mod bridge;
pub mod config;
pub mod demo;
pub mod error;
pub mod host;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use bridge::{Bridge, DispatchError, Dispatcher};
pub use config::BridgeConfig;
pub use error::BridgeError;
pub use host::HostServer;
pub use lifecycle::Shutdown;
