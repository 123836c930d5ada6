//! Settings-panel coordination.
//!
//! At most one widget settings panel is open at a time. The open id is
//! session-local UI state and is never persisted.

/// Tracks which widget's settings panel is open.
#[derive(Debug, Clone, Default)]
pub struct PanelCoordinator {
    open_widget_id: Option<String>,
}

impl PanelCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of the widget whose panel is open, if any.
    pub fn open_id(&self) -> Option<&str> {
        self.open_widget_id.as_deref()
    }

    /// Returns `true` if the panel for `id` is open.
    pub fn is_open(&self, id: &str) -> bool {
        self.open_widget_id.as_deref() == Some(id)
    }

    /// Toggles the panel for `id`.
    ///
    /// Closes it when already open for `id`; otherwise opens it, implicitly
    /// closing whichever panel was open before.
    pub fn toggle(&mut self, id: &str) {
        if self.is_open(id) {
            self.open_widget_id = None;
        } else {
            self.open_widget_id = Some(id.to_string());
        }
    }

    /// Closes any open panel.
    pub fn close(&mut self) {
        self.open_widget_id = None;
    }

    /// Clears the open id if it references `removed_id`.
    ///
    /// Called when a widget is removed so the coordinator never points at a
    /// widget that no longer exists.
    pub fn clear_removed(&mut self, removed_id: &str) {
        if self.is_open(removed_id) {
            self.open_widget_id = None;
        }
    }
}
