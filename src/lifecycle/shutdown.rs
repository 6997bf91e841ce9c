//! Shutdown coordination.

use tokio::sync::broadcast;

/// Broadcasts a single stop signal to the timeout monitor and control endpoint.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a signal nobody is listening to yet.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver that resolves once [`Shutdown::trigger`] is called.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Stop every subscriber. Calling it with no subscribers left is a no-op.
    pub fn trigger(&self) {
        match self.tx.send(()) {
            Ok(listeners) => tracing::info!(listeners = listeners, "Shutdown signalled"),
            Err(_) => tracing::debug!("Shutdown signalled with no listeners"),
        }
    }

    /// Number of tasks still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
