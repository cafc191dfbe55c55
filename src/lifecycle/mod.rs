//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → broadcast → server drains, supervisor exits
//!
//! Reload (supervisor.rs):
//!     ReloadSignal → reload config → swap live bridge
//! ```
//!
//! # Design Decisions
//! - Reload never interrupts in-flight exchanges; they finish on the
//!   bridge they started with
//! - A config that fails to load keeps the current bridge

pub mod shutdown;
pub mod signals;
pub mod supervisor;

pub use shutdown::Shutdown;
pub use supervisor::{ReloadOutcome, Supervisor};
