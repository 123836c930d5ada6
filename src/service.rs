//! Dashboard service: the frontend-facing composition root.
//!
//! Owns the layout and settings stores, the drag controller, the panel
//! coordinator, and the refresh coordinator, and applies the UI-level
//! policies the store itself deliberately does not (single instance per
//! kind, panel cleanup on removal).

use crate::drag::{DragController, DragMove};
use crate::panel::PanelCoordinator;
use crate::refresh::RefreshCoordinator;
use crate::registry::WidgetRegistry;
use crate::store::{LayoutStore, SettingsStore};
use crate::{presets, WidgetConfig, WidgetKind, WidgetSize};

/// Everything a widget needs to render itself.
#[derive(Debug, Clone)]
pub struct WidgetContext {
    pub id: String,
    pub kind: WidgetKind,
    pub size: WidgetSize,
    /// Clone of the widget's config; empty map when none is stored.
    pub config: WidgetConfig,
    /// Whether this widget's settings panel is open.
    pub settings_open: bool,
    /// Re-fetch dependency: widgets reload data when this changes.
    pub refresh_count: u64,
}

/// Frontend-facing dashboard service.
pub struct DashboardService {
    registry: WidgetRegistry,
    layout: LayoutStore,
    settings: SettingsStore,
    panel: PanelCoordinator,
    drag: DragController,
    refresh: RefreshCoordinator,
}

impl DashboardService {
    /// Creates a service around existing stores.
    pub fn new(layout: LayoutStore, settings: SettingsStore) -> Self {
        Self {
            registry: WidgetRegistry::new(),
            layout,
            settings,
            panel: PanelCoordinator::new(),
            drag: DragController::new(),
            refresh: RefreshCoordinator::new(),
        }
    }

    /// Creates a service seeded with the default layout and settings
    /// (the first-run / onboarding output).
    pub fn with_default_layout() -> Self {
        Self::new(
            LayoutStore::with_state(presets::default_layout()),
            SettingsStore::new(),
        )
    }

    /// The layout store (for subscriptions and the synchronizer).
    pub fn layout(&self) -> &LayoutStore {
        &self.layout
    }

    /// The settings store.
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// The refresh coordinator.
    pub fn refresh(&self) -> &RefreshCoordinator {
        &self.refresh
    }

    /// The widget registry.
    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// Id of the widget whose settings panel is open, if any.
    pub fn open_panel_id(&self) -> Option<&str> {
        self.panel.open_id()
    }

    /// Adds a widget of `kind`, returning its new id.
    ///
    /// Returns `None` without touching the store when the kind is not
    /// registered or an instance of it already exists. The add-widget panel
    /// only offers one instance per kind; the store itself stays
    /// policy-free and would accept duplicates.
    pub async fn add_widget(&self, kind: WidgetKind) -> Option<String> {
        if !self.registry.is_registered(&kind) {
            tracing::debug!("Refusing to add unregistered widget kind {kind}");
            return None;
        }
        let snapshot = self.layout.snapshot().await;
        if snapshot.widgets.iter().any(|w| w.kind == kind) {
            tracing::debug!("Widget kind {kind} already on the dashboard");
            return None;
        }
        Some(self.layout.add_widget(kind).await)
    }

    /// Removes a widget and clears its settings panel if it was open.
    pub async fn remove_widget(&mut self, id: &str) -> bool {
        let removed = self.layout.remove_widget(id).await;
        if removed {
            self.panel.clear_removed(id);
        }
        removed
    }

    /// Toggles the settings panel for `id` (at most one open).
    pub fn toggle_widget_settings(&mut self, id: &str) {
        self.panel.toggle(id);
    }

    /// Shallow-merges `patch` into the widget's config.
    pub async fn update_widget_config(&self, id: &str, patch: WidgetConfig) {
        self.layout.set_widget_config(id, patch).await;
    }

    /// Starts dragging `id`.
    pub fn begin_drag(&mut self, id: &str) {
        self.drag.begin_drag(id);
    }

    /// Finishes the drag over `over_id`, moving the widget in the store
    /// when the drop target differs.
    pub async fn end_drag(&mut self, over_id: &str) -> bool {
        match self.drag.end_drag(over_id) {
            Some(mv) => self.apply_drag(mv).await,
            None => false,
        }
    }

    /// Applies a completed drag outcome to the store.
    ///
    /// The dragged widget takes the drop target's index, so a forward drag
    /// lands after the target and a backward drag lands before it.
    pub async fn apply_drag(&self, mv: DragMove) -> bool {
        let Some(to) = self.layout.snapshot().await.position(&mv.target_id) else {
            return false;
        };
        self.layout.move_widget_to_index(&mv.id, to).await
    }

    /// Cancels any in-flight gesture.
    pub fn cancel_gesture(&mut self) {
        self.drag.cancel();
    }

    /// Starts resizing `id` from its current pixel width.
    pub fn begin_resize(&mut self, id: &str, start_width: f64, start_x: f64) {
        self.drag.begin_resize(id, start_width, start_x);
    }

    /// Finishes the resize, snapping the widget to the bucketed size.
    pub async fn end_resize(&mut self, end_x: f64) -> bool {
        match self.drag.end_resize(end_x) {
            Some((id, size)) => self.layout.resize_widget(&id, size).await,
            None => false,
        }
    }

    /// Keyboard path: advances the widget's size one step in the cycle.
    pub async fn cycle_widget_size(&self, id: &str) -> bool {
        let Some(current) = self.layout.snapshot().await.widget(id).map(|w| w.size) else {
            return false;
        };
        self.layout.resize_widget(id, current.next()).await
    }

    /// Resets the layout to the default and closes any open panel.
    pub async fn reset_to_default(&mut self) {
        self.layout.reset_to_default().await;
        self.panel.close();
    }

    /// Triggers a manual refresh of all widgets.
    pub fn trigger_refresh(&self) {
        self.refresh.trigger();
    }

    /// Builds the rendering context for the widget with `id`.
    ///
    /// Returns `None` when the widget does not exist.
    pub async fn widget_context(&self, id: &str) -> Option<WidgetContext> {
        let snapshot = self.layout.snapshot().await;
        let widget = snapshot.widget(id)?;
        Some(WidgetContext {
            id: widget.id.clone(),
            kind: widget.kind.clone(),
            size: widget.size,
            config: snapshot.configs.get(id).cloned().unwrap_or_default(),
            settings_open: self.panel.is_open(id),
            refresh_count: self.refresh.count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn add_widget_enforces_single_instance_per_kind() {
        let service = DashboardService::with_default_layout();
        // Every default kind is already present
        assert!(service.add_widget(WidgetKind::Currency).await.is_none());

        let mut service = service;
        service.remove_widget("currency").await;
        let id = service
            .add_widget(WidgetKind::Currency)
            .await
            .expect("kind no longer present");
        assert!(id.starts_with("currency-"));
    }

    #[tokio::test]
    async fn add_widget_rejects_unregistered_kind() {
        let service = DashboardService::new(LayoutStore::new(), SettingsStore::new());
        assert!(service
            .add_widget(WidgetKind::Other("mystery".to_string()))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn removing_open_panel_widget_clears_panel() {
        let mut service = DashboardService::with_default_layout();
        service.toggle_widget_settings("water");
        assert_eq!(service.open_panel_id(), Some("water"));

        service.remove_widget("water").await;
        assert!(service.open_panel_id().is_none());
    }

    #[tokio::test]
    async fn removing_other_widget_keeps_panel() {
        let mut service = DashboardService::with_default_layout();
        service.toggle_widget_settings("water");
        service.remove_widget("news").await;
        assert_eq!(service.open_panel_id(), Some("water"));
    }

    #[tokio::test]
    async fn drag_gesture_moves_widget() {
        let mut service = DashboardService::with_default_layout();
        service.begin_drag("currency");
        assert!(service.end_drag("clock").await);

        let state = service.layout().snapshot().await;
        assert_eq!(state.position("currency"), Some(0));
    }

    #[tokio::test]
    async fn forward_drag_lands_after_the_target() {
        let mut service = DashboardService::with_default_layout();
        // clock starts at 0, weather at 2; clock takes weather's index
        service.begin_drag("clock");
        assert!(service.end_drag("weather").await);

        let state = service.layout().snapshot().await;
        assert_eq!(state.position("search"), Some(0));
        assert_eq!(state.position("weather"), Some(1));
        assert_eq!(state.position("clock"), Some(2));
    }

    #[tokio::test]
    async fn drag_onto_missing_target_is_noop() {
        let mut service = DashboardService::with_default_layout();
        let before = service.layout().snapshot().await;
        service.begin_drag("clock");
        assert!(!service.end_drag("ghost").await);
        assert_eq!(service.layout().snapshot().await, before);
    }

    #[tokio::test]
    async fn resize_gesture_snaps_to_bucket() {
        let mut service = DashboardService::with_default_layout();
        // weather starts Small at 380px; drag to 850px total width
        service.begin_resize("weather", 380.0, 0.0);
        assert!(service.end_resize(470.0).await);
        let state = service.layout().snapshot().await;
        assert_eq!(
            state.widget("weather").map(|w| w.size),
            Some(WidgetSize::Large)
        );
    }

    #[tokio::test]
    async fn cycle_widget_size_advances_one_step() {
        let service = DashboardService::with_default_layout();
        assert!(service.cycle_widget_size("weather").await);
        let state = service.layout().snapshot().await;
        assert_eq!(
            state.widget("weather").map(|w| w.size),
            Some(WidgetSize::Medium)
        );
    }

    #[tokio::test]
    async fn widget_context_carries_config_and_panel_state() {
        let mut service = DashboardService::with_default_layout();
        let mut patch = WidgetConfig::new();
        patch.insert("city", json!("Lisbon"));
        service.update_widget_config("weather", patch).await;
        service.toggle_widget_settings("weather");
        service.trigger_refresh();

        let ctx = service
            .widget_context("weather")
            .await
            .expect("widget exists");
        assert_eq!(ctx.kind, WidgetKind::Weather);
        assert_eq!(ctx.config.get("city"), Some(&json!("Lisbon")));
        assert!(ctx.settings_open);
        assert_eq!(ctx.refresh_count, 1);
    }

    #[tokio::test]
    async fn widget_context_defaults_to_empty_config() {
        let service = DashboardService::with_default_layout();
        let ctx = service.widget_context("clock").await.expect("widget exists");
        assert!(ctx.config.is_empty());
        assert!(!ctx.settings_open);
    }

    #[tokio::test]
    async fn widget_context_for_missing_widget_is_none() {
        let service = DashboardService::with_default_layout();
        assert!(service.widget_context("ghost").await.is_none());
    }

    #[tokio::test]
    async fn reset_closes_panel() {
        let mut service = DashboardService::with_default_layout();
        service.toggle_widget_settings("water");
        service.reset_to_default().await;
        assert!(service.open_panel_id().is_none());
        assert_eq!(
            service.layout().snapshot().await.widgets,
            crate::presets::default_widgets()
        );
    }
}
