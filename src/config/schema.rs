//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files, and
//! every section falls back to its defaults when omitted.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Host server settings.
    pub server: ServerConfig,

    /// Request/response bridge behaviour.
    pub bridge: BridgeSettings,

    /// Where and how uploaded files are spooled.
    pub uploads: UploadConfig,

    /// Development-time hot reload.
    pub reload: ReloadConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Host server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum buffered request body in bytes.
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_size: 8 * 1024 * 1024, // 8MB
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BridgeSettings {
    /// Emit `Content-Length` from the response body size when it is known.
    pub auto_content_length: bool,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            auto_content_length: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UploadConfig {
    /// Spool directory. Defaults to the system temp dir.
    pub temp_dir: Option<PathBuf>,

    /// Files larger than this are rejected with an error code.
    pub max_file_size: u64,
}

impl UploadConfig {
    pub fn resolved_temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            max_file_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ReloadConfig {
    /// Watch sources and reload on change.
    pub enabled: bool,

    /// Directory watched recursively.
    pub source_dir: Option<PathBuf>,

    /// Changes closer together than this collapse into one reload.
    pub debounce_ms: u64,

    /// Extensions (without the dot) whose changes trigger a reload.
    /// Empty means every file.
    pub file_types: Vec<String>,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            source_dir: None,
            debounce_ms: 500,
            file_types: vec!["rs".to_string(), "toml".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the pretty format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: BridgeConfig = toml::from_str("").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert!(config.bridge.auto_content_length);
        assert!(!config.reload.enabled);
        assert_eq!(config.reload.file_types, ["rs", "toml"]);
    }

    #[test]
    fn reload_file_types_can_be_extended() {
        let config: BridgeConfig = toml::from_str(
            r#"
            [reload]
            file_types = ["rs", "toml", "html"]
            "#,
        )
        .unwrap();

        assert_eq!(config.reload.file_types, ["rs", "toml", "html"]);
        assert_eq!(config.reload.debounce_ms, 500);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: BridgeConfig = toml::from_str(
            r#"
            [server]
            bind_address = "127.0.0.1:9000"

            [bridge]
            auto_content_length = false

            [uploads]
            temp_dir = "/var/spool/bridge"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
        assert_eq!(config.server.max_body_size, 8 * 1024 * 1024);
        assert!(!config.bridge.auto_content_length);
        assert_eq!(
            config.uploads.resolved_temp_dir(),
            PathBuf::from("/var/spool/bridge")
        );
    }

    #[test]
    fn auto_content_length_rejects_non_boolean() {
        let result: Result<BridgeConfig, _> = toml::from_str("[bridge]\nauto_content_length = \"yes\"");
        assert!(result.is_err());
    }
}
