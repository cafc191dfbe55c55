//! HTTP request/response bridge.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────────┐
//!                 │                       HOST SERVER                        │
//!   Client ──────▶│  ┌─────────┐    ┌──────────────┐    ┌─────────────────┐  │
//!                 │  │  axum   │───▶│   capture    │───▶│ RequestAdapter  │  │
//!                 │  │ router  │    │  (snapshot)  │    │  (+ form data)  │  │
//!                 │  └─────────┘    └──────────────┘    └────────┬────────┘  │
//!                 │                                              ▼           │
//!                 │                                     ┌─────────────────┐  │
//!                 │                                     │   Dispatcher    │  │
//!                 │                                     └────────┬────────┘  │
//!                 │                                              ▼           │
//!   Client ◀──────│  ┌─────────┐    ┌──────────────┐    ┌─────────────────┐  │
//!                 │  │response │◀───│   HostSink   │◀───│ ResponseAdapter │  │
//!                 │  └─────────┘    └──────────────┘    └─────────────────┘  │
//!                 │                                                          │
//!                 │  watcher ── ReloadSignal ──▶ supervisor ── swap bridge   │
//!                 └──────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use http_bridge::config::{
    load_config, validation::validate_config, BridgeConfig, ConfigError, FileTypes, SourceWatcher,
};
use http_bridge::demo::DemoApp;
use http_bridge::lifecycle::{signals::shutdown_signal, Shutdown};
use http_bridge::observability::{logging, metrics};
use http_bridge::HostServer;

#[derive(Parser)]
#[command(name = "http-bridge")]
#[command(about = "Bridge an async HTTP host to a synchronous application", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override server.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Watch sources and reload on change.
    #[arg(long)]
    hot_reload: bool,

    /// Directory to watch when hot reload is on.
    #[arg(long)]
    source_dir: Option<PathBuf>,
}

impl Cli {
    fn resolve_config(&self) -> Result<BridgeConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => BridgeConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
        if self.hot_reload {
            config.reload.enabled = true;
        }
        if let Some(dir) = &self.source_dir {
            config.reload.source_dir = Some(dir.clone());
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    logging::init_logging(&config.observability);

    tracing::info!("http-bridge v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        auto_content_length = config.bridge.auto_content_length,
        hot_reload = config.reload.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // The watcher must outlive the server; dropping it stops notifications.
    let (_watcher, reload_signals) = if config.reload.enabled {
        let (watcher, signals) = SourceWatcher::new(
            config.reload.source_dir.as_deref(),
            cli.config.as_deref(),
            Duration::from_millis(config.reload.debounce_ms),
        );
        let watcher = watcher.with_file_types(FileTypes::new(&config.reload.file_types));
        (Some(watcher.run()?), signals)
    } else {
        let (_, signals) = mpsc::unbounded_channel();
        (None, signals)
    };

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    let mut server = HostServer::new(config, Arc::new(DemoApp));
    if let Some(path) = &cli.config {
        server = server.with_config_path(path);
    }

    let server_task = tokio::spawn(server.run(listener, reload_signals, server_shutdown));

    shutdown_signal().await;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
