//! Persistence synchronizer.
//!
//! Keeps one user's [`LayoutStore`] and [`SettingsStore`] eventually
//! consistent with a [`DashboardBackend`]:
//!
//! - **Outbound**: local edits restart a debounce timer (default 1s); when
//!   it expires the current snapshot is written exactly once, so a burst of
//!   edits produces a single write of the final state.
//! - **Inbound**: backend pushes go through the stores' `apply_remote`,
//!   which drops content-equal documents. Combined with the stores only
//!   flagging [`StoreEvent::LocalEdit`] for persistence, this breaks the
//!   write → push → write echo loop between devices.
//! - Conflicts resolve last-write-wins at whole-document granularity.
//!
//! Backend failures are logged and surfaced through the [`SyncStatus`]
//! watch channel; they never crash the service, and local state remains
//! the session's source of truth.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::store::{LayoutStore, SettingsStore, StoreEvent};

pub mod backend;
pub mod file;

pub use backend::{DashboardBackend, MemoryBackend, RemoteUpdate};
pub use file::FileBackend;

/// Default debounce window for outbound writes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);

/// Synchronizer state surfaced to the UI ("syncing…" indicator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Nothing pending; last operation succeeded.
    Idle,
    /// A write or bootstrap read is in flight.
    Syncing,
    /// The last backend operation failed (details in the log).
    Error,
}

/// Debounced two-way synchronizer between the stores and a backend.
///
/// Explicitly constructed and started; stopping guarantees the backend
/// listener is torn down (nothing keeps syncing after logout).
pub struct Synchronizer<B: DashboardBackend> {
    backend: Arc<B>,
    layout: LayoutStore,
    settings: SettingsStore,
    debounce: Duration,
    status_tx: watch::Sender<SyncStatus>,
    task: Option<SyncTask>,
}

struct SyncTask {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
}

impl<B: DashboardBackend> Synchronizer<B> {
    /// Creates a synchronizer with the default debounce window.
    pub fn new(backend: B, layout: LayoutStore, settings: SettingsStore) -> Self {
        Self::with_debounce(backend, layout, settings, DEFAULT_DEBOUNCE)
    }

    /// Creates a synchronizer with a custom debounce window.
    pub fn with_debounce(
        backend: B,
        layout: LayoutStore,
        settings: SettingsStore,
        debounce: Duration,
    ) -> Self {
        let (status_tx, _rx) = watch::channel(SyncStatus::Idle);
        Self {
            backend: Arc::new(backend),
            layout,
            settings,
            debounce,
            status_tx,
            task: None,
        }
    }

    /// Watches the sync status.
    pub fn status(&self) -> watch::Receiver<SyncStatus> {
        self.status_tx.subscribe()
    }

    /// Returns the current sync status.
    pub fn current_status(&self) -> SyncStatus {
        *self.status_tx.borrow()
    }

    /// Returns `true` while the sync task is running.
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Starts syncing for `user_id`.
    ///
    /// Bootstraps from the backend first: an existing remote document is
    /// adopted; an absent one is seeded with the current local state (the
    /// first-time-user write). A second `start` without `stop` is ignored.
    pub fn start(&mut self, user_id: impl Into<String>) {
        if self.task.is_some() {
            tracing::warn!("Synchronizer already running, ignoring start");
            return;
        }
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_sync_task(
            Arc::clone(&self.backend),
            self.layout.clone(),
            self.settings.clone(),
            user_id.into(),
            self.debounce,
            self.status_tx.clone(),
            shutdown_rx,
        ));
        self.task = Some(SyncTask {
            handle,
            shutdown_tx,
        });
    }

    /// Stops the sync task, flushing any pending edits first.
    ///
    /// After this returns, no backend listener remains.
    pub async fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        if task.shutdown_tx.send(true).is_err() {
            tracing::debug!("Sync task already gone at stop");
        }
        if let Err(e) = task.handle.await {
            tracing::error!("Sync task panicked: {e}");
        }
        self.status_tx.send_replace(SyncStatus::Idle);
    }
}

/// Receives the next push, or parks forever when the backend has none.
async fn recv_push(
    rx: &mut Option<broadcast::Receiver<RemoteUpdate>>,
) -> Result<RemoteUpdate, broadcast::error::RecvError> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Sleeps until the debounce deadline, or parks forever when clean.
async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_sync_task<B: DashboardBackend>(
    backend: Arc<B>,
    layout: LayoutStore,
    settings: SettingsStore,
    user_id: String,
    debounce: Duration,
    status_tx: watch::Sender<SyncStatus>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    // Subscribe to the stores before bootstrap so no edit can slip between
    // the initial read and the event loop.
    let mut layout_rx = layout.subscribe();
    let mut settings_rx = settings.subscribe();
    let mut push_rx = backend.subscribe(&user_id).await;

    bootstrap(&*backend, &layout, &settings, &user_id, &status_tx).await;

    let mut dirty_dashboard = false;
    let mut dirty_settings = false;
    let mut deadline: Option<Instant> = None;
    let mut layout_open = true;
    let mut settings_open = true;

    loop {
        tokio::select! {
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            event = layout_rx.recv(), if layout_open => match event {
                Ok(StoreEvent::LocalEdit) => {
                    dirty_dashboard = true;
                    deadline = Some(Instant::now() + debounce);
                }
                Ok(StoreEvent::RemoteApplied) => {}
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!("Sync task lagged {missed} layout events");
                    dirty_dashboard = true;
                    deadline = Some(Instant::now() + debounce);
                }
                Err(broadcast::error::RecvError::Closed) => layout_open = false,
            },
            event = settings_rx.recv(), if settings_open => match event {
                Ok(StoreEvent::LocalEdit) => {
                    dirty_settings = true;
                    deadline = Some(Instant::now() + debounce);
                }
                Ok(StoreEvent::RemoteApplied) => {}
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!("Sync task lagged {missed} settings events");
                    dirty_settings = true;
                    deadline = Some(Instant::now() + debounce);
                }
                Err(broadcast::error::RecvError::Closed) => settings_open = false,
            },
            update = recv_push(&mut push_rx) => match update {
                Ok(RemoteUpdate::Dashboard(remote)) => {
                    layout.apply_remote(remote).await;
                }
                Ok(RemoteUpdate::Settings(remote)) => {
                    settings.apply_remote(remote).await;
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!("Sync task lagged {missed} backend pushes");
                }
                Err(broadcast::error::RecvError::Closed) => push_rx = None,
            },
            _ = sleep_until_deadline(deadline) => {
                flush(
                    &*backend,
                    &layout,
                    &settings,
                    &user_id,
                    &status_tx,
                    &mut dirty_dashboard,
                    &mut dirty_settings,
                )
                .await;
                deadline = None;
            }
        }
    }

    // Don't lose edits that were still inside the debounce window.
    if dirty_dashboard || dirty_settings {
        flush(
            &*backend,
            &layout,
            &settings,
            &user_id,
            &status_tx,
            &mut dirty_dashboard,
            &mut dirty_settings,
        )
        .await;
    }
    tracing::debug!(user_id = %user_id, "Sync task stopped");
}

/// Initial read: adopt the remote document, or seed the backend with the
/// local state when the user has none.
async fn bootstrap<B: DashboardBackend>(
    backend: &B,
    layout: &LayoutStore,
    settings: &SettingsStore,
    user_id: &str,
    status_tx: &watch::Sender<SyncStatus>,
) {
    status_tx.send_replace(SyncStatus::Syncing);
    let mut failed = false;

    match backend.read_dashboard(user_id).await {
        Ok(Some(remote)) => {
            layout.apply_remote(remote).await;
        }
        Ok(None) => {
            let snapshot = layout.snapshot().await;
            if let Err(e) = backend.write_dashboard(user_id, &snapshot).await {
                tracing::error!("Failed to seed dashboard for {user_id}: {e}");
                failed = true;
            }
        }
        Err(e) => {
            tracing::error!("Failed to read dashboard for {user_id}: {e}");
            failed = true;
        }
    }

    match backend.read_settings(user_id).await {
        Ok(Some(remote)) => {
            settings.apply_remote(remote).await;
        }
        Ok(None) => {
            let current = settings.get().await;
            if let Err(e) = backend.write_settings(user_id, &current).await {
                tracing::error!("Failed to seed settings for {user_id}: {e}");
                failed = true;
            }
        }
        Err(e) => {
            tracing::error!("Failed to read settings for {user_id}: {e}");
            failed = true;
        }
    }

    status_tx.send_replace(if failed {
        SyncStatus::Error
    } else {
        SyncStatus::Idle
    });
}

/// Writes whichever documents are dirty. Failures are logged and surfaced
/// as [`SyncStatus::Error`]; the dirty flags are cleared either way (the
/// next local edit re-arms the timer, there is no automatic retry loop).
async fn flush<B: DashboardBackend>(
    backend: &B,
    layout: &LayoutStore,
    settings: &SettingsStore,
    user_id: &str,
    status_tx: &watch::Sender<SyncStatus>,
    dirty_dashboard: &mut bool,
    dirty_settings: &mut bool,
) {
    status_tx.send_replace(SyncStatus::Syncing);
    let mut failed = false;

    if *dirty_dashboard {
        let snapshot = layout.snapshot().await;
        match backend.write_dashboard(user_id, &snapshot).await {
            Ok(()) => {
                tracing::debug!(user_id, "Wrote dashboard ({} widgets)", snapshot.widgets.len());
            }
            Err(e) => {
                tracing::error!("Failed to write dashboard for {user_id}: {e}");
                failed = true;
            }
        }
        *dirty_dashboard = false;
    }

    if *dirty_settings {
        let current = settings.get().await;
        match backend.write_settings(user_id, &current).await {
            Ok(()) => tracing::debug!(user_id, "Wrote settings"),
            Err(e) => {
                tracing::error!("Failed to write settings for {user_id}: {e}");
                failed = true;
            }
        }
        *dirty_settings = false;
    }

    status_tx.send_replace(if failed {
        SyncStatus::Error
    } else {
        SyncStatus::Idle
    });
}
