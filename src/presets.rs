//! Built-in default dashboard layout.
//!
//! First-time users (and users who hit "reset layout") get this fixed
//! arrangement. Instance ids are stable slugs rather than generated ids so
//! that two devices bootstrapping independently produce identical state.

use crate::{DashboardState, WidgetInstance, WidgetKind, WidgetSize};

/// The widgets of the default layout, in display order.
const DEFAULT_LAYOUT: &[(&str, WidgetKind, WidgetSize)] = &[
    ("clock", WidgetKind::Clock, WidgetSize::Medium),
    ("search", WidgetKind::Search, WidgetSize::Medium),
    ("weather", WidgetKind::Weather, WidgetSize::Small),
    ("links", WidgetKind::QuickLinks, WidgetSize::Small),
    ("briefing", WidgetKind::Briefing, WidgetSize::Large),
    ("news", WidgetKind::News, WidgetSize::Large),
    ("youtube", WidgetKind::Youtube, WidgetSize::Large),
    ("email", WidgetKind::Email, WidgetSize::Medium),
    ("calendar", WidgetKind::Calendar, WidgetSize::Large),
    ("water", WidgetKind::Water, WidgetSize::Small),
    ("work", WidgetKind::Work, WidgetSize::Large),
    ("work-reports", WidgetKind::WorkReports, WidgetSize::Large),
    ("chat", WidgetKind::Chat, WidgetSize::Large),
    ("currency", WidgetKind::Currency, WidgetSize::Medium),
    ("countdown", WidgetKind::Countdown, WidgetSize::Medium),
    ("services", WidgetKind::Services, WidgetSize::Large),
    ("darkmode", WidgetKind::DarkMode, WidgetSize::Small),
];

/// Returns the default widget list.
pub fn default_widgets() -> Vec<WidgetInstance> {
    DEFAULT_LAYOUT
        .iter()
        .map(|(id, kind, size)| WidgetInstance::new(*id, kind.clone(), *size))
        .collect()
}

/// Returns a complete default dashboard: default widgets, no configs.
pub fn default_layout() -> DashboardState {
    DashboardState {
        widgets: default_widgets(),
        ..DashboardState::empty()
    }
}
