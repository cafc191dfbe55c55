//! Source and config watcher for development hot reload.
//!
//! The watcher never touches request handling. It turns file system events
//! into `ReloadSignal`s on a channel; the supervisor decides what to do.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// Request to rebuild the serving bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadSignal {
    /// Paths whose change triggered the reload.
    pub paths: Vec<PathBuf>,
}

/// Collapses bursts of events into one signal per window.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    last: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Whether an event at `now` should produce a signal.
    pub fn admit(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.window => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

fn is_relevant(kind: &EventKind) -> bool {
    kind.is_modify() || kind.is_create() || kind.is_remove()
}

/// Extension filter over changed paths.
#[derive(Debug, Clone, Default)]
pub struct FileTypes {
    extensions: Vec<String>,
}

impl FileTypes {
    /// Accepts `"rs"` or `".rs"`. An empty list matches every path.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    /// Add one more watched extension.
    pub fn add(&mut self, extension: &str) {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        if !ext.is_empty() && !self.extensions.contains(&ext) {
            self.extensions.push(ext);
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

/// A watcher over a source directory and, optionally, the config file.
pub struct SourceWatcher {
    source_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
    debounce: Duration,
    file_types: FileTypes,
    signal_tx: mpsc::UnboundedSender<ReloadSignal>,
}

impl SourceWatcher {
    /// Create a new SourceWatcher.
    ///
    /// Returns the watcher and a receiver for reload signals.
    pub fn new(
        source_dir: Option<&Path>,
        config_path: Option<&Path>,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<ReloadSignal>) {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();

        (
            Self {
                source_dir: source_dir.map(Path::to_path_buf),
                config_path: config_path.map(Path::to_path_buf),
                debounce,
                file_types: FileTypes::default(),
                signal_tx,
            },
            signal_rx,
        )
    }

    /// Only reload for source changes with one of these extensions. The
    /// config file is always watched.
    pub fn with_file_types(mut self, file_types: FileTypes) -> Self {
        self.file_types = file_types;
        self
    }

    /// Start watching in notify's background thread.
    ///
    /// Dropping the returned watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.signal_tx.clone();
        let mut debouncer = Debouncer::new(self.debounce);
        let file_types = self.file_types.clone();
        let config_path = self.config_path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !is_relevant(&event.kind) {
                        return;
                    }
                    let paths: Vec<PathBuf> = event
                        .paths
                        .into_iter()
                        .filter(|path| {
                            config_path.as_deref() == Some(path.as_path()) || file_types.matches(path)
                        })
                        .collect();
                    if paths.is_empty() || !debouncer.admit(Instant::now()) {
                        return;
                    }
                    tracing::info!(paths = ?paths, "Source change detected, requesting reload");
                    let _ = tx.send(ReloadSignal { paths });
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        if let Some(dir) = &self.source_dir {
            watcher.watch(dir, RecursiveMode::Recursive)?;
            tracing::info!(path = ?dir, "Source watcher started");
        }
        if let Some(path) = &self.config_path {
            watcher.watch(path, RecursiveMode::NonRecursive)?;
            tracing::info!(path = ?path, "Config watcher started");
        }

        Ok(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    #[test]
    fn debouncer_collapses_bursts() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let start = Instant::now();

        assert!(debouncer.admit(start));
        assert!(!debouncer.admit(start + Duration::from_millis(100)));
        assert!(!debouncer.admit(start + Duration::from_millis(499)));
        assert!(debouncer.admit(start + Duration::from_millis(600)));
    }

    #[test]
    fn only_content_changes_are_relevant() {
        assert!(is_relevant(&EventKind::Modify(ModifyKind::Any)));
        assert!(is_relevant(&EventKind::Create(CreateKind::File)));
        assert!(!is_relevant(&EventKind::Access(AccessKind::Any)));
    }

    #[test]
    fn file_types_filter_by_extension() {
        let mut types = FileTypes::new(["rs", ".toml"]);

        assert!(types.matches(Path::new("src/app.rs")));
        assert!(types.matches(Path::new("Bridge.TOML")));
        assert!(!types.matches(Path::new("src/.app.rs.swp")));
        assert!(!types.matches(Path::new("logs/bridge.log")));
        assert!(!types.matches(Path::new("Makefile")));

        types.add(".html");
        assert!(types.matches(Path::new("templates/index.html")));
    }

    #[test]
    fn empty_file_types_match_everything() {
        assert!(FileTypes::default().matches(Path::new("notes.swp")));
    }

    #[tokio::test]
    async fn swap_file_change_is_ignored() {
        let dir = std::env::temp_dir().join(format!("bridge-watch-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let (watcher, mut signals) = SourceWatcher::new(Some(&dir), None, Duration::from_millis(50));
        let _guard = watcher
            .with_file_types(FileTypes::new(["rs"]))
            .run()
            .unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        std::fs::write(dir.join(".app.rs.swp"), "scratch").unwrap();

        let quiet = tokio::time::timeout(Duration::from_millis(500), signals.recv()).await;
        assert!(quiet.is_err());

        std::fs::write(dir.join("app.rs"), "fn main() {}").unwrap();
        let signal = tokio::time::timeout(Duration::from_secs(10), signals.recv())
            .await
            .expect("reload signal")
            .expect("channel open");
        assert!(signal.paths.iter().all(|p| p.extension() == Some(std::ffi::OsStr::new("rs"))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn change_in_source_dir_emits_signal() {
        let dir = std::env::temp_dir().join(format!("bridge-watch-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let (watcher, mut signals) = SourceWatcher::new(Some(&dir), None, Duration::from_millis(50));
        let _guard = watcher.run().unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        std::fs::write(dir.join("app.rs"), "fn main() {}").unwrap();

        let signal = tokio::time::timeout(Duration::from_secs(10), signals.recv())
            .await
            .expect("reload signal")
            .expect("channel open");
        assert!(!signal.paths.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
