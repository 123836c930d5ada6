//! Core add/remove/resize tests for LayoutStore.

use super::{ids, store_with_kinds};
use crate::store::{ops, LayoutStore};
use crate::{DashboardState, WidgetKind, WidgetSize};

#[tokio::test]
async fn add_widget_appends_with_registry_default_size() {
    let store = store_with_kinds(&[
        WidgetKind::Clock,
        WidgetKind::Search,
        WidgetKind::Weather,
        WidgetKind::News,
    ]);
    let id = store.add_widget(WidgetKind::Currency).await;

    let state = store.snapshot().await;
    assert_eq!(state.widgets.len(), 5);
    let added = state.widget(&id).expect("added widget should exist");
    assert_eq!(added.kind, WidgetKind::Currency);
    assert_eq!(added.size, WidgetSize::Medium);
    // Appended at the end
    assert_eq!(state.widgets.last().map(|w| w.id.as_str()), Some(id.as_str()));
}

#[tokio::test]
async fn add_unregistered_kind_falls_back_to_medium() {
    let store = LayoutStore::new();
    let id = store
        .add_widget(WidgetKind::Other("mystery".to_string()))
        .await;
    let state = store.snapshot().await;
    assert_eq!(state.widget(&id).map(|w| w.size), Some(WidgetSize::Medium));
}

#[tokio::test]
async fn add_widget_permits_duplicate_kinds() {
    let store = LayoutStore::new();
    let a = store.add_widget(WidgetKind::Water).await;
    let b = store.add_widget(WidgetKind::Water).await;
    assert_ne!(a, b);
    let state = store.snapshot().await;
    assert_eq!(state.widgets.len(), 2);
}

#[test]
fn generated_ids_are_unique_within_a_millisecond() {
    let mut state = DashboardState::empty();
    let mut seen = Vec::new();
    // Same timestamp for every call forces the collision path
    for _ in 0..10 {
        let id = ops::add_widget(&mut state, WidgetKind::Water, 1714650000000);
        assert!(!seen.contains(&id), "duplicate id: {id}");
        seen.push(id);
    }
}

#[test]
fn id_uniqueness_under_add_remove_sequences() {
    let mut state = DashboardState::empty();
    let mut live: Vec<String> = Vec::new();
    for round in 0..20i64 {
        let id = ops::add_widget(&mut state, WidgetKind::Currency, 1714650000000 + round / 3);
        assert!(!live.contains(&id));
        live.push(id);
        if round % 3 == 2 {
            let victim = live.remove(0);
            assert!(ops::remove_widget(&mut state, &victim));
        }
    }
    let snapshot_ids: Vec<_> = state.widgets.iter().map(|w| w.id.clone()).collect();
    assert_eq!(snapshot_ids, live);
}

#[tokio::test]
async fn remove_widget_filters_instance() {
    let store = store_with_kinds(&[WidgetKind::Clock, WidgetKind::News, WidgetKind::Water]);
    assert!(store.remove_widget("w2").await);
    let state = store.snapshot().await;
    assert_eq!(ids(&state), vec!["w1", "w3"]);
}

#[tokio::test]
async fn remove_missing_widget_is_silent_noop() {
    let store = store_with_kinds(&[WidgetKind::Clock]);
    let before = store.snapshot().await;
    assert!(!store.remove_widget("ghost").await);
    let after = store.snapshot().await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn resize_widget_updates_size() {
    let store = store_with_kinds(&[WidgetKind::Weather]);
    assert!(store.resize_widget("w1", WidgetSize::Large).await);
    let state = store.snapshot().await;
    assert_eq!(state.widget("w1").map(|w| w.size), Some(WidgetSize::Large));
}

#[tokio::test]
async fn resize_to_same_size_is_noop() {
    let store = store_with_kinds(&[WidgetKind::Weather]);
    assert!(!store.resize_widget("w1", WidgetSize::Medium).await);
}

#[tokio::test]
async fn resize_missing_widget_is_silent_noop() {
    let store = store_with_kinds(&[WidgetKind::Weather]);
    assert!(!store.resize_widget("ghost", WidgetSize::Large).await);
}

#[tokio::test]
async fn local_mutation_stamps_updated_at() {
    let store = store_with_kinds(&[WidgetKind::Clock]);
    assert_eq!(store.snapshot().await.updated_at, 0);
    store.resize_widget("w1", WidgetSize::Small).await;
    assert!(store.snapshot().await.updated_at > 0);
}
