//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BridgeConfig (validated, immutable)
//!
//! During development:
//!     watcher.rs detects a source or config change
//!     → ReloadSignal over an mpsc channel
//!     → lifecycle::supervisor reloads and swaps the bridge
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BridgeConfig, BridgeSettings, ObservabilityConfig, ReloadConfig, ServerConfig, UploadConfig,
};
pub use validation::ValidationError;
pub use watcher::{FileTypes, ReloadSignal, SourceWatcher};
