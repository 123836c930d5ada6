//! File-system persistence backend.
//!
//! Documents live under `<data_dir>/users/<user_id>/` as pretty-printed
//! JSON (`dashboard.json`, `settings.json`). Writes go to a temp file in
//! the same directory and are renamed into place, so a crash mid-write
//! never leaves a truncated document at the final path.
//!
//! There is no live push between processes; `subscribe` returns `None` and
//! the synchronizer runs in read/write-only mode.

use std::path::{Path, PathBuf};

use tokio::sync::broadcast;

use super::backend::{DashboardBackend, RemoteUpdate};
use crate::{DashboardState, SyncError, UserSettings};

/// JSON-on-disk backend.
#[derive(Debug, Clone)]
pub struct FileBackend {
    data_dir: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at `data_dir`. Directories are created
    /// lazily on first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn user_dir(&self, user_id: &str) -> PathBuf {
        self.data_dir.join("users").join(user_id)
    }

    fn dashboard_path(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("dashboard.json")
    }

    fn settings_path(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("settings.json")
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        path: &Path,
    ) -> Result<Option<T>, SyncError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SyncError::Io {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), SyncError> {
        let parent = path.parent().unwrap_or(Path::new("."));
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SyncError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;

        let json = serde_json::to_string_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json.as_bytes())
            .await
            .map_err(|e| SyncError::Io {
                path: tmp.clone(),
                source: e,
            })?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| SyncError::Io {
                path: path.to_path_buf(),
                source: e,
            })
    }
}

impl DashboardBackend for FileBackend {
    async fn read_dashboard(&self, user_id: &str) -> Result<Option<DashboardState>, SyncError> {
        Self::read_json(&self.dashboard_path(user_id)).await
    }

    async fn write_dashboard(
        &self,
        user_id: &str,
        state: &DashboardState,
    ) -> Result<(), SyncError> {
        Self::write_json(&self.dashboard_path(user_id), state).await
    }

    async fn read_settings(&self, user_id: &str) -> Result<Option<UserSettings>, SyncError> {
        Self::read_json(&self.settings_path(user_id)).await
    }

    async fn write_settings(
        &self,
        user_id: &str,
        settings: &UserSettings,
    ) -> Result<(), SyncError> {
        Self::write_json(&self.settings_path(user_id), settings).await
    }

    async fn subscribe(&self, _user_id: &str) -> Option<broadcast::Receiver<RemoteUpdate>> {
        None
    }
}
