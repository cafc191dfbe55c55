//! Shutdown coordination.
//!
//! `main` owns the `Shutdown` and triggers it once Ctrl+C or SIGTERM arrives.
//! `HostServer::run` holds one receiver and resubscribes it for the reload
//! supervisor, so a single trigger stops both: axum stops accepting and
//! drains in-flight exchanges while the supervisor stops swapping bridges.

use tokio::sync::broadcast;

pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for the server task. Take it before `trigger` is called;
    /// a late subscriber misses the signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every subscriber to stop. Triggering with no subscribers left
    /// (server already gone) is fine.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Subscribers that have not yet been dropped.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.subscribe();
        assert_eq!(shutdown.receiver_count(), 2);

        shutdown.trigger();

        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[tokio::test]
    async fn resubscribed_receiver_sees_trigger() {
        let shutdown = Shutdown::new();
        let mut server = shutdown.subscribe();
        let mut supervisor = server.resubscribe();

        shutdown.trigger();

        assert!(server.recv().await.is_ok());
        assert!(supervisor.recv().await.is_ok());
    }

    #[test]
    fn trigger_without_subscribers_is_harmless() {
        let shutdown = Shutdown::default();
        let late_after = {
            shutdown.trigger();
            shutdown.subscribe()
        };
        assert_eq!(shutdown.receiver_count(), 1);
        assert!(late_after.is_empty());
    }
}
