//! vivelink-common/src/shutdown.rs
//!
//! Cooperative stop signal shared by the sender and receiver loops. Loops
//! hold a `watch::Receiver<bool>` and check it at the top of each iteration.

use tokio::sync::watch;
use tracing::{error, info};

pub struct Shutdown {
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            shutdown_tx: tx,
            shutdown_rx: rx,
        }
    }

    pub fn trigger(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// A receiver for one loop.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// Wait for Ctrl-C, then trigger. If the signal handler cannot be
    /// installed this never returns and the process runs until killed.
    pub async fn trigger_on_ctrl_c(&self) {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {:?}", e);
            std::future::pending::<()>().await;
        }
        info!("Ctrl-C detected, shutting down...");
        self.trigger();
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// True once the stop flag is set or its sender is gone.
pub fn stop_requested(rx: &watch::Receiver<bool>) -> bool {
    *rx.borrow() || rx.has_changed().is_err()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_trigger() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        assert!(!stop_requested(&rx));

        shutdown.trigger();
        rx.changed().await.unwrap();
        assert!(*rx.borrow());
        assert!(shutdown.is_triggered());
    }

    #[test]
    fn dropped_sender_counts_as_stop() {
        let rx = {
            let shutdown = Shutdown::new();
            shutdown.subscribe()
        };
        assert!(stop_requested(&rx));
    }
}
