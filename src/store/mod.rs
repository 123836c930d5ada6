//! Dashboard state stores for SmartGlance.
//!
//! This module provides thread-safe stores for the widget layout and the
//! user settings. Both wrap their state in `Arc<RwLock<_>>` for concurrent
//! access from async tasks and broadcast a [`StoreEvent`] to subscribers on
//! every change, tagged by origin so the persistence synchronizer can tell
//! local edits (which must be written out) from adopted remote state (which
//! must not be echoed back).

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use crate::{DashboardState, UserSettings, WidgetConfig, WidgetKind, WidgetSize};

#[cfg(test)]
mod tests;

pub mod ops;

/// Capacity of the subscriber notification channel.
/// Allows bursty edit sequences without dropping notifications.
const SUBSCRIBER_CHANNEL_CAPACITY: usize = 256;

/// Change notification broadcast by the stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// State changed because of a local mutation; needs persisting.
    LocalEdit,
    /// State changed because a remote document was adopted.
    /// Never triggers an outbound write.
    RemoteApplied,
}

/// Thread-safe store for one user's dashboard layout.
///
/// # Example
///
/// ```
/// use smartglance::store::LayoutStore;
/// use smartglance::WidgetKind;
///
/// #[tokio::main]
/// async fn main() {
///     let store = LayoutStore::new();
///     let id = store.add_widget(WidgetKind::Currency).await;
///     assert!(store.snapshot().await.widget(&id).is_some());
/// }
/// ```
#[derive(Clone)]
pub struct LayoutStore {
    state: Arc<RwLock<DashboardState>>,
    event_tx: broadcast::Sender<StoreEvent>,
}

impl std::fmt::Debug for LayoutStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutStore")
            .field("state", &self.state)
            .field("subscriber_count", &self.event_tx.receiver_count())
            .finish()
    }
}

impl LayoutStore {
    /// Creates a store holding an empty dashboard.
    pub fn new() -> Self {
        Self::with_state(DashboardState::empty())
    }

    /// Creates a store holding `state` (e.g. the default layout or a
    /// document loaded from a backend).
    pub fn with_state(state: DashboardState) -> Self {
        let (event_tx, _rx) = broadcast::channel(SUBSCRIBER_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(state)),
            event_tx,
        }
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.event_tx.receiver_count()
    }

    /// Returns an owned copy of the current state.
    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// Appends a new widget of `kind` at the registry default size and
    /// returns its generated id.
    pub async fn add_widget(&self, kind: WidgetKind) -> String {
        let mut state = self.state.write().await;
        let id = ops::add_widget(&mut state, kind, now_ms());
        state.updated_at = now_ms();
        drop(state);
        self.notify_local();
        id
    }

    /// Removes the widget with `id`. Silent no-op when absent.
    pub async fn remove_widget(&self, id: &str) -> bool {
        self.mutate(|state| ops::remove_widget(state, id)).await
    }

    /// Drops config entries whose widget no longer exists.
    pub async fn prune_orphan_configs(&self) -> usize {
        let mut pruned = 0;
        self.mutate(|state| {
            pruned = ops::prune_orphan_configs(state);
            pruned > 0
        })
        .await;
        pruned
    }

    /// Moves the widget with `id` to `index`.
    pub async fn move_widget_to_index(&self, id: &str, index: usize) -> bool {
        self.mutate(|state| ops::move_widget_to_index(state, id, index))
            .await
    }

    /// Moves the widget with `id` directly before `before_id`.
    pub async fn move_widget_before(&self, id: &str, before_id: &str) -> bool {
        self.mutate(|state| ops::move_widget_before(state, id, before_id))
            .await
    }

    /// Sets the size of the widget with `id`.
    pub async fn resize_widget(&self, id: &str, size: WidgetSize) -> bool {
        self.mutate(|state| ops::resize_widget(state, id, size)).await
    }

    /// Shallow-merges `patch` into the config for `id`.
    pub async fn set_widget_config(&self, id: &str, patch: WidgetConfig) -> bool {
        self.mutate(|state| ops::set_widget_config(state, id, patch))
            .await
    }

    /// Replaces the layout with the built-in default and clears configs.
    pub async fn reset_to_default(&self) {
        self.mutate(|state| {
            ops::reset_to_default(state);
            true
        })
        .await;
    }

    /// Adopts a remote document if its content differs from the local state.
    ///
    /// Returns `true` (and emits [`StoreEvent::RemoteApplied`]) when the
    /// state was replaced. Content-equal documents are ignored entirely,
    /// which is what breaks the save/subscribe echo loop between devices.
    pub async fn apply_remote(&self, remote: DashboardState) -> bool {
        let mut state = self.state.write().await;
        if state.same_content(&remote) {
            tracing::trace!("Remote dashboard matches local content, ignoring");
            return false;
        }
        *state = remote;
        drop(state);
        tracing::debug!("Adopted remote dashboard state");
        if self.event_tx.send(StoreEvent::RemoteApplied).is_err() {
            tracing::trace!("No subscribers for remote-applied notification");
        }
        true
    }

    /// Applies `op` under the write lock; stamps `updated_at` and notifies
    /// subscribers only when the op reports a change.
    async fn mutate<F>(&self, op: F) -> bool
    where
        F: FnOnce(&mut DashboardState) -> bool,
    {
        let mut state = self.state.write().await;
        let changed = op(&mut state);
        if changed {
            state.updated_at = now_ms();
        }
        drop(state);
        if changed {
            self.notify_local();
        }
        changed
    }

    fn notify_local(&self) {
        if self.event_tx.send(StoreEvent::LocalEdit).is_err() {
            tracing::trace!("No subscribers for local-edit notification");
        }
    }
}

impl Default for LayoutStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe store for the user's global settings.
///
/// Settings are a single small record, so updates replace the whole value.
#[derive(Clone)]
pub struct SettingsStore {
    settings: Arc<RwLock<UserSettings>>,
    event_tx: broadcast::Sender<StoreEvent>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("settings", &self.settings)
            .field("subscriber_count", &self.event_tx.receiver_count())
            .finish()
    }
}

impl SettingsStore {
    /// Creates a store with default settings.
    pub fn new() -> Self {
        Self::with_settings(UserSettings::default())
    }

    /// Creates a store holding `settings`.
    pub fn with_settings(settings: UserSettings) -> Self {
        let (event_tx, _rx) = broadcast::channel(SUBSCRIBER_CHANNEL_CAPACITY);
        Self {
            settings: Arc::new(RwLock::new(settings)),
            event_tx,
        }
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    /// Returns an owned copy of the current settings.
    pub async fn get(&self) -> UserSettings {
        self.settings.read().await.clone()
    }

    /// Replaces the settings. No-op (and no notification) when unchanged.
    pub async fn update(&self, new: UserSettings) -> bool {
        let mut settings = self.settings.write().await;
        if *settings == new {
            return false;
        }
        *settings = new;
        drop(settings);
        if self.event_tx.send(StoreEvent::LocalEdit).is_err() {
            tracing::trace!("No subscribers for settings notification");
        }
        true
    }

    /// Adopts remote settings if they differ from the local value.
    pub async fn apply_remote(&self, remote: UserSettings) -> bool {
        let mut settings = self.settings.write().await;
        if *settings == remote {
            return false;
        }
        *settings = remote;
        drop(settings);
        if self.event_tx.send(StoreEvent::RemoteApplied).is_err() {
            tracing::trace!("No subscribers for settings notification");
        }
        true
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Current Unix time in milliseconds.
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
