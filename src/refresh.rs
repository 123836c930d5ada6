//! Manual refresh coordination.
//!
//! Widgets re-fetch their data when the refresh counter changes. The
//! counter is monotonic and published through a `watch` channel; a
//! transient `refreshing` flag drives the spinner and clears itself about
//! a second after the last trigger.

use std::time::Duration;

use tokio::sync::watch;

/// How long the refreshing flag stays up after a trigger.
const DEFAULT_SPINNER_DURATION: Duration = Duration::from_secs(1);

/// Publishes refresh signals to widgets.
#[derive(Debug, Clone)]
pub struct RefreshCoordinator {
    counter_tx: watch::Sender<u64>,
    refreshing_tx: watch::Sender<bool>,
    spinner_duration: Duration,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::with_spinner_duration(DEFAULT_SPINNER_DURATION)
    }

    /// Creates a coordinator with a custom spinner duration (tests).
    pub fn with_spinner_duration(spinner_duration: Duration) -> Self {
        let (counter_tx, _) = watch::channel(0);
        let (refreshing_tx, _) = watch::channel(false);
        Self {
            counter_tx,
            refreshing_tx,
            spinner_duration,
        }
    }

    /// Increments the refresh counter and raises the refreshing flag.
    ///
    /// A timer clears the flag after the spinner duration unless another
    /// trigger lands first (the newest trigger owns the flag).
    pub fn trigger(&self) {
        self.counter_tx.send_modify(|count| *count += 1);
        let generation = *self.counter_tx.borrow();
        // send_replace: the flag must hold its value even with no observers
        self.refreshing_tx.send_replace(true);

        let refreshing_tx = self.refreshing_tx.clone();
        let counter_rx = self.counter_tx.subscribe();
        let delay = self.spinner_duration;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // A newer trigger owns the flag now
            if *counter_rx.borrow() == generation {
                refreshing_tx.send_replace(false);
            }
        });
    }

    /// Returns the current counter value.
    pub fn count(&self) -> u64 {
        *self.counter_tx.borrow()
    }

    /// Watches the monotonic refresh counter.
    pub fn counter(&self) -> watch::Receiver<u64> {
        self.counter_tx.subscribe()
    }

    /// Watches the transient refreshing flag.
    pub fn refreshing(&self) -> watch::Receiver<bool> {
        self.refreshing_tx.subscribe()
    }

    /// Returns `true` while the spinner is up.
    pub fn is_refreshing(&self) -> bool {
        *self.refreshing_tx.borrow()
    }
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
