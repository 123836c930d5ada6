//! Tests for the dashboard stores.
//!
//! Tests are organized into categories:
//! - `basic`: add/remove/resize and id generation
//! - `reorder`: move operations and ordering invariants
//! - `configs`: config merge, pruning, and reset
//! - `subscriber`: broadcast notifications and echo suppression

mod basic;

use super::LayoutStore;
use crate::{DashboardState, WidgetInstance, WidgetKind, WidgetSize};

/// Builds a store pre-populated with widgets `w1..wN` of the given kinds.
pub(super) fn store_with_kinds(kinds: &[WidgetKind]) -> LayoutStore {
    let mut state = DashboardState::empty();
    for (i, kind) in kinds.iter().enumerate() {
        state.widgets.push(WidgetInstance::new(
            format!("w{}", i + 1),
            kind.clone(),
            WidgetSize::Medium,
        ));
    }
    LayoutStore::with_state(state)
}

/// Returns the widget ids of a snapshot, in order.
pub(super) fn ids(state: &DashboardState) -> Vec<String> {
    state.widgets.iter().map(|w| w.id.clone()).collect()
}
