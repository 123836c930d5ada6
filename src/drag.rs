//! Drag-reorder and resize interaction state machine.
//!
//! The controller is pure: it tracks which widget is being dragged or
//! resized and turns pointer gestures into discrete outcomes
//! ([`DragMove`], a final [`WidgetSize`]). It never touches the store;
//! the service applies outcomes on drop.

use crate::WidgetSize;

/// Pointer position in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned bounding box of a rendered widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetRect {
    /// Id of the widget this box belongs to.
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl WidgetRect {
    pub fn new(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
        }
    }

    fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }
}

/// A completed drag gesture: move `id` to the index of `target_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct DragMove {
    /// Widget being moved.
    pub id: String,
    /// Widget whose index it takes.
    pub target_id: String,
}

/// Interaction state.
#[derive(Debug, Clone, PartialEq)]
enum InteractionState {
    Idle,
    Dragging {
        active_id: String,
    },
    Resizing {
        active_id: String,
        start_width: f64,
        start_x: f64,
    },
}

/// Pixel width below which a widget snaps to Small.
const SMALL_MAX_WIDTH: f64 = 400.0;
/// Pixel width below which a widget snaps to Medium; at or above, Large.
const MEDIUM_MAX_WIDTH: f64 = 800.0;

/// Maps a resized pixel width to the nearest size bucket.
pub fn size_for_width(width: f64) -> WidgetSize {
    if width < SMALL_MAX_WIDTH {
        WidgetSize::Small
    } else if width < MEDIUM_MAX_WIDTH {
        WidgetSize::Medium
    } else {
        WidgetSize::Large
    }
}

/// Drag-reorder and resize controller.
///
/// One gesture at a time: beginning a new drag or resize replaces any
/// in-flight gesture.
#[derive(Debug, Clone)]
pub struct DragController {
    state: InteractionState,
}

impl DragController {
    pub fn new() -> Self {
        Self {
            state: InteractionState::Idle,
        }
    }

    /// Returns the id of the widget being dragged, if any.
    pub fn dragging_id(&self) -> Option<&str> {
        match &self.state {
            InteractionState::Dragging { active_id } => Some(active_id),
            _ => None,
        }
    }

    /// Returns the id of the widget being resized, if any.
    pub fn resizing_id(&self) -> Option<&str> {
        match &self.state {
            InteractionState::Resizing { active_id, .. } => Some(active_id),
            _ => None,
        }
    }

    /// Returns `true` when no gesture is in flight.
    pub fn is_idle(&self) -> bool {
        self.state == InteractionState::Idle
    }

    /// Starts dragging the widget with `id` (pointer-down or
    /// keyboard-activate).
    pub fn begin_drag(&mut self, id: impl Into<String>) {
        self.state = InteractionState::Dragging {
            active_id: id.into(),
        };
    }

    /// Nearest-center collision detection for drop-target highlighting.
    ///
    /// Returns the id of the widget whose bounding-box center is closest to
    /// `pointer`, or `None` when `rects` is empty. Visual feedback only; no
    /// store mutation happens until drop.
    pub fn drop_target<'a>(&self, pointer: Point, rects: &'a [WidgetRect]) -> Option<&'a str> {
        rects
            .iter()
            .min_by(|a, b| {
                let da = distance_squared(pointer, a.center());
                let db = distance_squared(pointer, b.center());
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|rect| rect.id.as_str())
    }

    /// Ends the drag over the widget with `over_id`.
    ///
    /// Returns a [`DragMove`] when the drop target differs from the dragged
    /// widget, `None` otherwise. Always returns to idle.
    pub fn end_drag(&mut self, over_id: &str) -> Option<DragMove> {
        let state = std::mem::replace(&mut self.state, InteractionState::Idle);
        match state {
            InteractionState::Dragging { active_id } if active_id != over_id => Some(DragMove {
                id: active_id,
                target_id: over_id.to_string(),
            }),
            _ => None,
        }
    }

    /// Cancels any in-flight gesture (escape key, drop outside the grid).
    pub fn cancel(&mut self) {
        self.state = InteractionState::Idle;
    }

    /// Starts resizing the widget with `id` from its current pixel width
    /// and the pointer's starting x coordinate.
    pub fn begin_resize(&mut self, id: impl Into<String>, start_width: f64, start_x: f64) {
        self.state = InteractionState::Resizing {
            active_id: id.into(),
            start_width,
            start_x,
        };
    }

    /// Ends the resize at pointer x `end_x`.
    ///
    /// The final width is the starting width plus the horizontal travel,
    /// mapped to a size bucket exactly once on release. Returns `None` when
    /// no resize was in flight. Always returns to idle.
    pub fn end_resize(&mut self, end_x: f64) -> Option<(String, WidgetSize)> {
        let state = std::mem::replace(&mut self.state, InteractionState::Idle);
        match state {
            InteractionState::Resizing {
                active_id,
                start_width,
                start_x,
            } => {
                let new_width = start_width + (end_x - start_x);
                Some((active_id, size_for_width(new_width)))
            }
            _ => None,
        }
    }

    /// Keyboard-accessible size cycling: small → medium → large → small.
    pub fn cycle_size(&self, size: WidgetSize) -> WidgetSize {
        size.next()
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

fn distance_squared(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}
