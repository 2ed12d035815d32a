//! Shutdown coordination.

use std::fmt;

use tokio::sync::broadcast;

/// Why the process is draining. Carried on the shutdown channel so the
/// draining transition can be logged with its cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainReason {
    /// SIGTERM from the operator or supervisor (systemd, Kubernetes).
    Terminate,
    /// SIGINT / Ctrl-C.
    Interrupt,
}

impl fmt::Display for DrainReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DrainReason::Terminate => "terminate",
            DrainReason::Interrupt => "interrupt",
        };
        f.write_str(name)
    }
}

/// Coordinator for graceful shutdown.
///
/// Broadcasts a [`DrainReason`] to every subscribed task; triggering it
/// moves the process into the draining phase.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<DrainReason>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<DrainReason> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal with its cause.
    pub fn trigger(&self, reason: DrainReason) {
        let _ = self.tx.send(reason);
    }

    /// Number of active subscribers (tasks still waiting on the signal).
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
    async fn subscribers_receive_the_triggered_reason() {
        let shutdown = Shutdown::new();
        let mut first = shutdown.subscribe();
        let mut second = shutdown.subscribe();
        assert_eq!(shutdown.receiver_count(), 2);

        shutdown.trigger(DrainReason::Terminate);

        assert_eq!(first.recv().await.unwrap(), DrainReason::Terminate);
        assert_eq!(second.recv().await.unwrap(), DrainReason::Terminate);
    }

    #[test]
    fn trigger_without_subscribers_is_harmless() {
        let shutdown = Shutdown::new();
        shutdown.trigger(DrainReason::Interrupt);
        assert_eq!(shutdown.receiver_count(), 0);
    }
}
