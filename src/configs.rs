//! Typed views over per-widget configuration maps.
//!
//! The store keeps configs as open JSON objects; these structs give widget
//! code a typed window onto them. Every struct carries a flattened extras
//! map so keys written by other (possibly newer) clients survive a
//! load/edit/save cycle on this one.
//!
//! Decoding is tolerant: a malformed or missing config decodes to the
//! defaults rather than erroring, because a widget must still render
//! something when a peer device wrote garbage.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::WidgetConfig;

/// Decodes `config` into a typed view, falling back to defaults on error.
pub fn decode_or_default<T>(config: &WidgetConfig) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    config.to_typed().unwrap_or_else(|e| {
        tracing::warn!("Malformed widget config, using defaults: {e}");
        T::default()
    })
}

/// Weather widget settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeatherConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    pub use_auto_location: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// News feed category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    #[default]
    Top,
    New,
    Best,
}

/// News widget settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsConfig {
    pub category: NewsCategory,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One entry of the quick-links widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuickLink {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Quick-links widget settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuickLinksConfig {
    pub links: Vec<QuickLink>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A followed YouTube channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YouTubeChannel {
    pub id: String,
    pub name: String,
}

/// YouTube widget settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YouTubeConfig {
    pub channels: Vec<YouTubeChannel>,
    pub video_count: u32,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            video_count: 6,
            extra: BTreeMap::new(),
        }
    }
}

/// Email widget settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub is_connected: bool,
    pub unread_count: u32,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Calendar widget settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub is_connected: bool,
    pub calendar_ids: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Water tracker settings and daily progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaterConfig {
    /// Daily goal in cups.
    pub daily_goal: u32,
    /// Cups consumed today.
    pub consumed: u32,
    /// ISO date (`YYYY-MM-DD`) of the last daily reset.
    pub last_reset: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            daily_goal: 8,
            consumed: 0,
            last_reset: String::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl WaterConfig {
    /// Zeroes the day's progress if `today` is a different date than the
    /// last reset. Returns `true` when a reset happened.
    pub fn reset_if_new_day(&mut self, today: NaiveDate) -> bool {
        let today_str = today.format("%Y-%m-%d").to_string();
        if self.last_reset == today_str {
            return false;
        }
        self.consumed = 0;
        self.last_reset = today_str;
        true
    }
}

/// One logged work session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkSession {
    pub id: String,
    /// ISO timestamp when the session started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// ISO timestamp when the session ended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Work timer settings. Shared by the work and work-reports widgets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    pub sessions: Vec<WorkSession>,
    /// ISO timestamp of the running session's start, if one is running.
    pub current_start: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}
