//! Persistence backend contract and the in-memory backend.
//!
//! Backends store one dashboard document and one settings record per user
//! id. They know nothing about debouncing or echo suppression; that logic
//! lives in the synchronizer.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};

use crate::{DashboardState, SyncError, UserSettings};

/// Capacity of a per-user push channel.
const PUSH_CHANNEL_CAPACITY: usize = 64;

/// A document pushed to subscribers after a write.
#[derive(Debug, Clone)]
pub enum RemoteUpdate {
    /// The user's dashboard document changed.
    Dashboard(DashboardState),
    /// The user's settings record changed.
    Settings(UserSettings),
}

/// Storage contract for dashboard and settings documents.
///
/// `read_*` returns `None` for a user with no stored document (first run).
/// `subscribe` returns `None` for backends without live push; the
/// synchronizer then works in read/write-only mode.
pub trait DashboardBackend: Send + Sync + 'static {
    /// Reads the user's dashboard document.
    fn read_dashboard(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<DashboardState>, SyncError>> + Send;

    /// Writes the user's dashboard document, replacing any previous one.
    fn write_dashboard(
        &self,
        user_id: &str,
        state: &DashboardState,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;

    /// Reads the user's settings record.
    fn read_settings(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<UserSettings>, SyncError>> + Send;

    /// Writes the user's settings record.
    fn write_settings(
        &self,
        user_id: &str,
        settings: &UserSettings,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;

    /// Subscribes to pushes for `user_id`, if the backend supports them.
    fn subscribe(&self, user_id: &str) -> impl Future<Output = Option<broadcast::Receiver<RemoteUpdate>>> + Send;
}

#[derive(Debug)]
struct UserRecord {
    dashboard: Option<DashboardState>,
    settings: Option<UserSettings>,
    push_tx: broadcast::Sender<RemoteUpdate>,
    dashboard_writes: u64,
    settings_writes: u64,
}

impl UserRecord {
    fn new() -> Self {
        let (push_tx, _rx) = broadcast::channel(PUSH_CHANNEL_CAPACITY);
        Self {
            dashboard: None,
            settings: None,
            push_tx,
            dashboard_writes: 0,
            settings_writes: 0,
        }
    }
}

/// In-process backend with live push.
///
/// Every write is pushed to all of the user's subscribers, including an
/// echo back to the writing device. This mirrors a realtime database and
/// is what exercises the synchronizer's echo suppression; it also drives
/// the multi-device tests.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    users: Arc<Mutex<HashMap<String, UserRecord>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of dashboard writes accepted for `user_id` so far.
    pub async fn dashboard_write_count(&self, user_id: &str) -> u64 {
        let users = self.users.lock().await;
        users.get(user_id).map(|u| u.dashboard_writes).unwrap_or(0)
    }

    /// Number of settings writes accepted for `user_id` so far.
    pub async fn settings_write_count(&self, user_id: &str) -> u64 {
        let users = self.users.lock().await;
        users.get(user_id).map(|u| u.settings_writes).unwrap_or(0)
    }
}

impl DashboardBackend for MemoryBackend {
    async fn read_dashboard(&self, user_id: &str) -> Result<Option<DashboardState>, SyncError> {
        let users = self.users.lock().await;
        Ok(users.get(user_id).and_then(|u| u.dashboard.clone()))
    }

    async fn write_dashboard(
        &self,
        user_id: &str,
        state: &DashboardState,
    ) -> Result<(), SyncError> {
        let mut users = self.users.lock().await;
        let record = users
            .entry(user_id.to_string())
            .or_insert_with(UserRecord::new);
        record.dashboard = Some(state.clone());
        record.dashboard_writes += 1;
        // Push to every subscriber, echoing to the writer as well
        let _ = record.push_tx.send(RemoteUpdate::Dashboard(state.clone()));
        Ok(())
    }

    async fn read_settings(&self, user_id: &str) -> Result<Option<UserSettings>, SyncError> {
        let users = self.users.lock().await;
        Ok(users.get(user_id).and_then(|u| u.settings.clone()))
    }

    async fn write_settings(
        &self,
        user_id: &str,
        settings: &UserSettings,
    ) -> Result<(), SyncError> {
        let mut users = self.users.lock().await;
        let record = users
            .entry(user_id.to_string())
            .or_insert_with(UserRecord::new);
        record.settings = Some(settings.clone());
        record.settings_writes += 1;
        let _ = record.push_tx.send(RemoteUpdate::Settings(settings.clone()));
        Ok(())
    }

    async fn subscribe(&self, user_id: &str) -> Option<broadcast::Receiver<RemoteUpdate>> {
        let mut users = self.users.lock().await;
        let record = users
            .entry(user_id.to_string())
            .or_insert_with(UserRecord::new);
        Some(record.push_tx.subscribe())
    }
}
