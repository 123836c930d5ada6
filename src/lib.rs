//! SmartGlance dashboard core
//!
//! This crate provides the state-management core of the SmartGlance personal
//! dashboard: the widget registry, the layout store, the drag-reorder and
//! settings-panel coordinators, and the persistence synchronizer that keeps
//! a user's dashboard consistent across devices.
//!
//! Rendering is intentionally out of scope. A frontend drives the services
//! in this crate and observes their broadcast/watch channels.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Configuration utilities including XDG path resolution.
pub mod config;

/// Typed views over per-widget configuration maps.
pub mod configs;

/// Drag-reorder and resize interaction state machine.
pub mod drag;

/// Logging initialization.
pub mod logging;

/// Settings-panel open/close coordination.
pub mod panel;

/// Built-in default dashboard layout.
pub mod presets;

/// Manual refresh coordination.
pub mod refresh;

/// Widget registry: known kinds, default sizes, display labels.
pub mod registry;

/// Dashboard service composing the stores and coordinators.
pub mod service;

/// Layout and settings stores with subscriber notifications.
pub mod store;

/// Persistence backends and the debounced synchronizer.
pub mod sync;

/// Widget display size.
///
/// On a desktop grid these map to 1, 2, and 4 column spans; the core only
/// cares about the ordering (small < medium < large) for cycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSize {
    Small,
    Medium,
    Large,
}

impl WidgetSize {
    /// Returns the next size in the small → medium → large → small cycle.
    pub fn next(self) -> Self {
        match self {
            WidgetSize::Small => WidgetSize::Medium,
            WidgetSize::Medium => WidgetSize::Large,
            WidgetSize::Large => WidgetSize::Small,
        }
    }
}

impl fmt::Display for WidgetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WidgetSize::Small => "small",
            WidgetSize::Medium => "medium",
            WidgetSize::Large => "large",
        };
        write!(f, "{}", s)
    }
}

/// Error type for parsing WidgetSize from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSizeError(pub String);

impl fmt::Display for ParseSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid widget size: {}", self.0)
    }
}

impl std::error::Error for ParseSizeError {}

impl FromStr for WidgetSize {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(WidgetSize::Small),
            "medium" => Ok(WidgetSize::Medium),
            "large" => Ok(WidgetSize::Large),
            _ => Err(ParseSizeError(s.to_string())),
        }
    }
}

/// Widget kind identifier.
///
/// Known kinds get a variant; anything else round-trips through
/// [`WidgetKind::Other`] so that state written by a newer client is not
/// destroyed when an older client loads, edits, and saves it.
///
/// Serialized as the plain slug string (e.g. `"work-reports"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetKind {
    Clock,
    Search,
    Weather,
    QuickLinks,
    Briefing,
    News,
    Youtube,
    Email,
    Calendar,
    Water,
    Work,
    WorkReports,
    Chat,
    Currency,
    Countdown,
    Services,
    DarkMode,
    /// Unrecognized kind, preserved verbatim.
    Other(String),
}

impl WidgetKind {
    /// Returns the canonical slug for this kind.
    pub fn slug(&self) -> &str {
        match self {
            WidgetKind::Clock => "clock",
            WidgetKind::Search => "search",
            WidgetKind::Weather => "weather",
            WidgetKind::QuickLinks => "links",
            WidgetKind::Briefing => "briefing",
            WidgetKind::News => "news",
            WidgetKind::Youtube => "youtube",
            WidgetKind::Email => "email",
            WidgetKind::Calendar => "calendar",
            WidgetKind::Water => "water",
            WidgetKind::Work => "work",
            WidgetKind::WorkReports => "work-reports",
            WidgetKind::Chat => "chat",
            WidgetKind::Currency => "currency",
            WidgetKind::Countdown => "countdown",
            WidgetKind::Services => "services",
            WidgetKind::DarkMode => "darkmode",
            WidgetKind::Other(slug) => slug,
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for WidgetKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "clock" => WidgetKind::Clock,
            "search" => WidgetKind::Search,
            "weather" => WidgetKind::Weather,
            "links" => WidgetKind::QuickLinks,
            "briefing" => WidgetKind::Briefing,
            "news" => WidgetKind::News,
            "youtube" => WidgetKind::Youtube,
            "email" => WidgetKind::Email,
            "calendar" => WidgetKind::Calendar,
            "water" => WidgetKind::Water,
            "work" => WidgetKind::Work,
            "work-reports" => WidgetKind::WorkReports,
            "chat" => WidgetKind::Chat,
            "currency" => WidgetKind::Currency,
            "countdown" => WidgetKind::Countdown,
            "services" => WidgetKind::Services,
            "darkmode" => WidgetKind::DarkMode,
            other => WidgetKind::Other(other.to_string()),
        })
    }
}

impl From<String> for WidgetKind {
    fn from(s: String) -> Self {
        // Infallible: unknown slugs become Other
        s.parse().unwrap_or(WidgetKind::Other(s))
    }
}

impl From<WidgetKind> for String {
    fn from(kind: WidgetKind) -> Self {
        kind.slug().to_string()
    }
}

/// A single widget placed on the dashboard.
///
/// `id` is unique within one dashboard; `kind` may repeat (the store does
/// not enforce uniqueness by kind, that policy lives in the service layer).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WidgetInstance {
    /// Unique instance identifier (e.g. `"currency-1714650000000"`).
    pub id: String,
    /// Widget kind, serialized as `type` for frontend compatibility.
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    /// Current display size.
    pub size: WidgetSize,
}

impl WidgetInstance {
    /// Creates a widget instance with an explicit id.
    pub fn new(id: impl Into<String>, kind: WidgetKind, size: WidgetSize) -> Self {
        Self {
            id: id.into(),
            kind,
            size,
        }
    }
}

/// Per-widget configuration: an open string-keyed JSON object.
///
/// The core treats configs as opaque; typed views live in [`crate::configs`].
/// Unknown keys written by other clients survive load/merge/save untouched.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct WidgetConfig(pub serde_json::Map<String, serde_json::Value>);

impl WidgetConfig {
    /// Creates an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Sets `key` to `value`, returning the previous value if any.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Option<serde_json::Value> {
        self.0.insert(key.into(), value)
    }

    /// Shallow-merges `patch` into this config.
    ///
    /// Top-level keys from `patch` replace existing keys wholesale; keys
    /// absent from `patch` are left untouched. Nested objects are not
    /// merged recursively.
    pub fn merge(&mut self, patch: WidgetConfig) {
        for (key, value) in patch.0 {
            self.0.insert(key, value);
        }
    }

    /// Returns `true` if the config has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds a config from any serializable value.
    ///
    /// Returns an error if `value` does not serialize to a JSON object.
    pub fn from_typed<T: serde::Serialize>(value: &T) -> Result<Self, SyncError> {
        match serde_json::to_value(value)? {
            serde_json::Value::Object(map) => Ok(Self(map)),
            other => Err(SyncError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    /// Deserializes the config into a typed view.
    pub fn to_typed<T: serde::de::DeserializeOwned>(&self) -> Result<T, SyncError> {
        Ok(serde_json::from_value(serde_json::Value::Object(
            self.0.clone(),
        ))?)
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// The persisted dashboard document for one user.
///
/// Serialized as camelCase JSON: `{"widgets": [...], "configs": {...},
/// "updatedAt": 1714650000000}`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    /// Ordered widget list; index is display position.
    pub widgets: Vec<WidgetInstance>,
    /// Per-widget configs keyed by instance id. Sparse: absent means defaults.
    #[serde(default)]
    pub configs: BTreeMap<String, WidgetConfig>,
    /// Unix epoch milliseconds of the last local mutation.
    #[serde(default)]
    pub updated_at: i64,
}

impl DashboardState {
    /// Creates an empty dashboard with `updated_at` set to zero.
    pub fn empty() -> Self {
        Self {
            widgets: Vec::new(),
            configs: BTreeMap::new(),
            updated_at: 0,
        }
    }

    /// Returns `true` if `other` has the same widgets and configs.
    ///
    /// `updated_at` is deliberately excluded: two states that differ only in
    /// the write timestamp carry the same content, and treating them as
    /// equal is what suppresses save/subscribe echo loops.
    pub fn same_content(&self, other: &DashboardState) -> bool {
        self.widgets == other.widgets && self.configs == other.configs
    }

    /// Returns the widget with the given id, if present.
    pub fn widget(&self, id: &str) -> Option<&WidgetInstance> {
        self.widgets.iter().find(|w| w.id == id)
    }

    /// Returns the index of the widget with the given id, if present.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.widgets.iter().position(|w| w.id == id)
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Global (non-widget) user preferences.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    /// Display name used in the greeting.
    pub user_name: String,
    /// Temperature unit toggle (true = Celsius).
    pub use_celsius: bool,
    /// Section visibility toggles.
    pub show_news: bool,
    pub show_weather: bool,
    pub show_briefing: bool,
    pub show_links: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            user_name: "User".to_string(),
            use_celsius: true,
            show_news: true,
            show_weather: true,
            show_briefing: true,
            show_links: true,
        }
    }
}

/// Errors that can occur while persisting or loading dashboard state.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Failed to read or write a dashboard document on disk.
    #[error("Failed to access dashboard document: {path}")]
    Io {
        /// Path of the document that could not be accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A document could not be serialized or deserialized.
    #[error("Invalid dashboard document: {0}")]
    Json(#[from] serde_json::Error),

    /// A typed config value did not serialize to a JSON object.
    #[error("Widget config must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON type that was produced instead.
        found: &'static str,
    },

    /// The backend rejected or failed the operation.
    #[error("Backend error: {0}")]
    Backend(String),
}
