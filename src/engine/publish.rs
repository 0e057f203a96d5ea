//! Snapshot publication.
//!
//! The engine is the only writer. Each publish swaps the whole [`Metrics`]
//! value inside a `tokio::sync::watch` channel, so readers on any thread see
//! either the previous snapshot or the new one, never a mix.

use crate::types::Metrics;
use tokio::sync::watch;

#[derive(Debug)]
pub struct MetricsPublisher {
    tx: watch::Sender<Metrics>,
}

impl MetricsPublisher {
    pub fn new(initial: Metrics) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Replace the current snapshot. Succeeds with or without readers.
    pub fn publish(&self, metrics: Metrics) {
        self.tx.send_replace(metrics);
    }

    pub fn current(&self) -> Metrics {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> MetricsReader {
        MetricsReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side handed to the display layer.
#[derive(Debug, Clone)]
pub struct MetricsReader {
    rx: watch::Receiver<Metrics>,
}

impl MetricsReader {
    /// Copy of the latest snapshot.
    pub fn current(&self) -> Metrics {
        *self.rx.borrow()
    }

    /// True if a snapshot was published since this reader last looked.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Latest snapshot, marking it as seen.
    pub fn latest(&mut self) -> Metrics {
        *self.rx.borrow_and_update()
    }

    /// Wait for the next published snapshot.
    ///
    /// Returns `None` once the engine has been dropped.
    pub async fn changed(&mut self) -> Option<Metrics> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}
