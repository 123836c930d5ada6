//! Value-level operations on [`DashboardState`].
//!
//! These are pure transformations used by the store service. Operations on
//! missing ids are silent no-ops (the UI may race a remote removal), and
//! every function reports whether it changed anything so the caller can
//! decide whether to notify subscribers.

use crate::registry::WidgetRegistry;
use crate::{presets, DashboardState, WidgetConfig, WidgetInstance, WidgetKind, WidgetSize};

/// Generates a fresh widget id of the form `<tag>-<millis>`.
///
/// On collision (two adds inside the same millisecond, or a slug id from the
/// default layout) a numeric suffix is appended until the id is unique.
pub fn generate_widget_id(state: &DashboardState, kind: &WidgetKind, now_ms: i64) -> String {
    let base = format!("{}-{}", kind.slug(), now_ms);
    if state.widget(&base).is_none() {
        return base;
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("{base}-{n}");
        if state.widget(&candidate).is_none() {
            return candidate;
        }
        n += 1;
    }
}

/// Appends a new widget of `kind` and returns its generated id.
///
/// The size comes from the registry default, falling back to Medium for
/// unregistered kinds. Duplicate kinds are permitted here; the
/// single-instance policy belongs to the service layer.
pub fn add_widget(state: &mut DashboardState, kind: WidgetKind, now_ms: i64) -> String {
    let size = WidgetRegistry::new()
        .default_size(&kind)
        .unwrap_or(WidgetSize::Medium);
    let id = generate_widget_id(state, &kind, now_ms);
    state.widgets.push(WidgetInstance::new(id.clone(), kind, size));
    id
}

/// Removes the widget with `id`. Its config entry is left in place;
/// see [`prune_orphan_configs`].
pub fn remove_widget(state: &mut DashboardState, id: &str) -> bool {
    let before = state.widgets.len();
    state.widgets.retain(|w| w.id != id);
    state.widgets.len() != before
}

/// Drops config entries whose widget no longer exists.
///
/// Returns the count of removed entries.
pub fn prune_orphan_configs(state: &mut DashboardState) -> usize {
    let before = state.configs.len();
    let live: Vec<String> = state.widgets.iter().map(|w| w.id.clone()).collect();
    state.configs.retain(|id, _| live.iter().any(|w| w == id));
    before - state.configs.len()
}

/// Moves the widget with `id` to `index`, preserving the relative order of
/// all other widgets. The index is clamped to the list length.
pub fn move_widget_to_index(state: &mut DashboardState, id: &str, index: usize) -> bool {
    let Some(from) = state.position(id) else {
        return false;
    };
    let to = index.min(state.widgets.len() - 1);
    if from == to {
        return false;
    }
    let widget = state.widgets.remove(from);
    state.widgets.insert(to, widget);
    true
}

/// Moves the widget with `id` directly before the widget with `before_id`.
///
/// No-op if either id is missing or they are the same widget.
pub fn move_widget_before(state: &mut DashboardState, id: &str, before_id: &str) -> bool {
    if id == before_id {
        return false;
    }
    let Some(from) = state.position(id) else {
        return false;
    };
    if state.position(before_id).is_none() {
        return false;
    }
    let widget = state.widgets.remove(from);
    // Recompute after removal: the target may have shifted left.
    let to = state.position(before_id).unwrap_or(state.widgets.len());
    state.widgets.insert(to, widget);
    from != to
}

/// Sets the size of the widget with `id`.
pub fn resize_widget(state: &mut DashboardState, id: &str, size: WidgetSize) -> bool {
    match state.widgets.iter_mut().find(|w| w.id == id) {
        Some(widget) if widget.size != size => {
            widget.size = size;
            true
        }
        _ => false,
    }
}

/// Shallow-merges `patch` into the config for `id`, creating the entry.
///
/// The widget itself need not exist: configs may arrive before their widget
/// on a syncing device.
pub fn set_widget_config(state: &mut DashboardState, id: &str, patch: WidgetConfig) -> bool {
    state
        .configs
        .entry(id.to_string())
        .or_insert_with(WidgetConfig::new)
        .merge(patch);
    true
}

/// Replaces the widgets with the default layout and clears all configs.
pub fn reset_to_default(state: &mut DashboardState) {
    state.widgets = presets::default_widgets();
    state.configs.clear();
}
