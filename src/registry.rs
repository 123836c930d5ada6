//! Widget registry for the SmartGlance dashboard.
//!
//! The registry is the authority on which widget kinds exist, what size a
//! new instance of each kind starts at, and which kinds the "add widget"
//! panel offers. It is static data; widget behavior lives in the frontend.

use crate::{WidgetKind, WidgetSize};

/// Capabilities of a registered widget kind.
#[derive(Debug, Clone, Copy)]
pub struct WidgetDescriptor {
    /// Kind this descriptor applies to.
    pub kind: &'static str,
    /// Human-readable display label.
    pub label: &'static str,
    /// Size a freshly added instance starts at.
    pub default_size: WidgetSize,
    /// Whether the add-widget panel offers this kind.
    ///
    /// Core kinds like the clock and search bar ship in the default layout
    /// and cannot be added a second time from the panel.
    pub addable: bool,
}

const DESCRIPTORS: &[WidgetDescriptor] = &[
    WidgetDescriptor {
        kind: "clock",
        label: "Clock",
        default_size: WidgetSize::Medium,
        addable: false,
    },
    WidgetDescriptor {
        kind: "search",
        label: "Search",
        default_size: WidgetSize::Medium,
        addable: false,
    },
    WidgetDescriptor {
        kind: "weather",
        label: "Weather",
        default_size: WidgetSize::Small,
        addable: false,
    },
    WidgetDescriptor {
        kind: "links",
        label: "Quick Links",
        default_size: WidgetSize::Small,
        addable: false,
    },
    WidgetDescriptor {
        kind: "briefing",
        label: "Daily Briefing",
        default_size: WidgetSize::Large,
        addable: false,
    },
    WidgetDescriptor {
        kind: "news",
        label: "News",
        default_size: WidgetSize::Large,
        addable: false,
    },
    WidgetDescriptor {
        kind: "youtube",
        label: "YouTube",
        default_size: WidgetSize::Large,
        addable: true,
    },
    WidgetDescriptor {
        kind: "email",
        label: "Email",
        default_size: WidgetSize::Medium,
        addable: true,
    },
    WidgetDescriptor {
        kind: "calendar",
        label: "Calendar",
        default_size: WidgetSize::Large,
        addable: true,
    },
    WidgetDescriptor {
        kind: "water",
        label: "Water Tracker",
        default_size: WidgetSize::Small,
        addable: true,
    },
    WidgetDescriptor {
        kind: "work",
        label: "Work Timer",
        default_size: WidgetSize::Large,
        addable: true,
    },
    WidgetDescriptor {
        kind: "work-reports",
        label: "Work Reports",
        default_size: WidgetSize::Large,
        addable: true,
    },
    WidgetDescriptor {
        kind: "chat",
        label: "Chat",
        default_size: WidgetSize::Large,
        addable: true,
    },
    WidgetDescriptor {
        kind: "currency",
        label: "Currency",
        default_size: WidgetSize::Medium,
        addable: true,
    },
    WidgetDescriptor {
        kind: "countdown",
        label: "Countdown",
        default_size: WidgetSize::Medium,
        addable: false,
    },
    WidgetDescriptor {
        kind: "services",
        label: "Services",
        default_size: WidgetSize::Large,
        addable: false,
    },
    WidgetDescriptor {
        kind: "darkmode",
        label: "Dark Mode",
        default_size: WidgetSize::Small,
        addable: true,
    },
];

/// Registry of known widget kinds.
///
/// # Example
///
/// ```
/// use smartglance::registry::WidgetRegistry;
/// use smartglance::{WidgetKind, WidgetSize};
///
/// let registry = WidgetRegistry::new();
/// assert_eq!(
///     registry.default_size(&WidgetKind::Currency),
///     Some(WidgetSize::Medium)
/// );
/// assert!(registry.default_size(&WidgetKind::Other("bogus".into())).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry;

impl WidgetRegistry {
    /// Creates the registry with all built-in kinds.
    pub fn new() -> Self {
        Self
    }

    /// Looks up the descriptor for a kind.
    ///
    /// Returns `None` for unregistered kinds (including all
    /// [`WidgetKind::Other`] values).
    pub fn descriptor(&self, kind: &WidgetKind) -> Option<&'static WidgetDescriptor> {
        DESCRIPTORS.iter().find(|d| d.kind == kind.slug())
    }

    /// Returns `true` if the kind is registered.
    pub fn is_registered(&self, kind: &WidgetKind) -> bool {
        self.descriptor(kind).is_some()
    }

    /// Returns the default size for new instances of `kind`.
    pub fn default_size(&self, kind: &WidgetKind) -> Option<WidgetSize> {
        self.descriptor(kind).map(|d| d.default_size)
    }

    /// Returns the display label for `kind`.
    pub fn label(&self, kind: &WidgetKind) -> Option<&'static str> {
        self.descriptor(kind).map(|d| d.label)
    }

    /// Returns the kinds the add-widget panel offers, in registry order.
    pub fn addable_kinds(&self) -> Vec<WidgetKind> {
        DESCRIPTORS
            .iter()
            .filter(|d| d.addable)
            .map(|d| d.kind.parse().unwrap_or(WidgetKind::Other(d.kind.into())))
            .collect()
    }

    /// Returns every registered kind, in registry order.
    pub fn all_kinds(&self) -> Vec<WidgetKind> {
        DESCRIPTORS
            .iter()
            .map(|d| d.kind.parse().unwrap_or(WidgetKind::Other(d.kind.into())))
            .collect()
    }
}
