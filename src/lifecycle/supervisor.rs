//! Reload supervisor.
//!
//! Consumes `ReloadSignal`s and swaps the live bridge. In-flight exchanges
//! keep the `Arc<Bridge>` they loaded, so a swap never affects them.

use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::{broadcast, mpsc};

use crate::bridge::{Bridge, Dispatcher};
use crate::config::{load_config, BridgeSettings, ReloadSignal};
use crate::observability::metrics;

/// Result of handling one reload signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Config reloaded and a new bridge installed.
    Reloaded,
    /// No config file; the bridge was rebuilt with its current settings.
    Refreshed,
    /// The config failed to load; the current bridge stays.
    Rejected,
}

impl ReloadOutcome {
    fn label(self) -> &'static str {
        match self {
            Self::Reloaded => "reloaded",
            Self::Refreshed => "refreshed",
            Self::Rejected => "rejected",
        }
    }
}

pub struct Supervisor<D> {
    live: Arc<ArcSwap<Bridge<D>>>,
    config_path: Option<PathBuf>,
}

impl<D: Dispatcher + 'static> Supervisor<D> {
    pub fn new(live: Arc<ArcSwap<Bridge<D>>>, config_path: Option<PathBuf>) -> Self {
        Self { live, config_path }
    }

    /// Handle one signal synchronously.
    pub fn apply(&self, signal: &ReloadSignal) -> ReloadOutcome {
        let current = self.live.load_full();

        let outcome = match &self.config_path {
            Some(path) => match load_config(path) {
                Ok(config) => {
                    self.live.store(Arc::new(current.reconfigured(&config.bridge)));
                    ReloadOutcome::Reloaded
                }
                Err(e) => {
                    tracing::error!(
                        path = ?path,
                        error = %e,
                        "Failed to reload config. Keeping current bridge."
                    );
                    ReloadOutcome::Rejected
                }
            },
            None => {
                let settings = BridgeSettings {
                    auto_content_length: current.response_adapter().auto_content_length(),
                };
                self.live.store(Arc::new(current.reconfigured(&settings)));
                ReloadOutcome::Refreshed
            }
        };

        tracing::info!(paths = ?signal.paths, outcome = outcome.label(), "Reload handled");
        metrics::record_reload(outcome.label());
        outcome
    }

    /// Process signals until the channel closes or shutdown fires.
    pub async fn run(
        self,
        mut signals: mpsc::UnboundedReceiver<ReloadSignal>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                maybe_signal = signals.recv() => match maybe_signal {
                    Some(signal) => {
                        self.apply(&signal);
                    }
                    None => break,
                },
                _ = shutdown.recv() => break,
            }
        }
        tracing::debug!("Reload supervisor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::DispatchError;
    use crate::http::{CanonicalRequest, CanonicalResponse};
    use std::time::Duration;

    struct Noop;

    impl Dispatcher for Noop {
        fn process(
            &self,
            _request: CanonicalRequest,
            response: CanonicalResponse,
        ) -> Result<CanonicalResponse, DispatchError> {
            Ok(response)
        }
    }

    fn live(auto_content_length: bool) -> Arc<ArcSwap<Bridge<Noop>>> {
        let settings = BridgeSettings {
            auto_content_length,
        };
        Arc::new(ArcSwap::from_pointee(Bridge::new(Arc::new(Noop), &settings)))
    }

    fn temp_config(content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("bridge-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, content).unwrap();
        path
    }

    fn signal() -> ReloadSignal {
        ReloadSignal {
            paths: vec![PathBuf::from("src/app.rs")],
        }
    }

    #[test]
    fn reload_swaps_in_new_settings() {
        let live = live(true);
        let path = temp_config("[bridge]\nauto_content_length = false\n");
        let supervisor = Supervisor::new(Arc::clone(&live), Some(path.clone()));

        let before = live.load_full();
        assert_eq!(supervisor.apply(&signal()), ReloadOutcome::Reloaded);

        assert!(!live.load().response_adapter().auto_content_length());
        assert!(before.response_adapter().auto_content_length());
        assert!(Arc::ptr_eq(before.dispatcher(), live.load().dispatcher()));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn invalid_config_keeps_current_bridge() {
        let live = live(true);
        let path = temp_config("[server]\nmax_body_size = 0\n");
        let supervisor = Supervisor::new(Arc::clone(&live), Some(path.clone()));

        let before = live.load_full();
        assert_eq!(supervisor.apply(&signal()), ReloadOutcome::Rejected);
        assert!(Arc::ptr_eq(&before, &live.load_full()));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn without_config_file_bridge_is_refreshed() {
        let live = live(false);
        let supervisor = Supervisor::new(Arc::clone(&live), None);

        let before = live.load_full();
        assert_eq!(supervisor.apply(&signal()), ReloadOutcome::Refreshed);

        let after = live.load_full();
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(!after.response_adapter().auto_content_length());
    }

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let live = live(true);
        let supervisor = Supervisor::new(Arc::clone(&live), None);
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(supervisor.run(rx, shutdown_rx));

        let before = live.load_full();
        tx.send(signal()).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!Arc::ptr_eq(&before, &live.load_full()));

        shutdown_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("supervisor exits")
            .unwrap();
    }
}
