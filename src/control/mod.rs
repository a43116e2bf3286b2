//! User interaction handling for the selection subsystem.
//!
//! The rendering engine owns the raw input pipeline (pan, zoom, rotation). What reaches this
//! crate is a small set of already-interpreted gestures, expressed as [`SelectorEvent`]s in map
//! coordinates. The [`SpatialSelector`] consumes them together with a [`SelectionContext`] built
//! from the current view state and the visible layers, and reports through [`EventPropagation`]
//! whether the engine should keep processing the event.

use geo_types::{Coord, Polygon};

mod selector;

pub use selector::{SelectionContext, SpatialSelector};

/// State of the keyboard modifiers at the moment of a gesture.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct GestureModifiers {
    /// The platform modifier key (Ctrl, or Cmd on macOS). Holding it arms the drag-box gesture.
    pub platform_key: bool,
    /// The shift key.
    pub shift_key: bool,
}

/// A selection gesture reported by the rendering engine.
#[derive(Debug, Clone)]
pub enum SelectorEvent {
    /// A drag gesture started.
    DragStarted {
        /// Modifier keys held when the drag started.
        modifiers: GestureModifiers,
    },
    /// The drag gesture ended.
    ///
    /// `area` is the dragged box in map coordinates. When the view is rotated, the box the user
    /// sees as a screen-aligned rectangle is a rotated quadrilateral on the map, which is why the
    /// area is a polygon and not an axis-aligned rectangle.
    DragEnded {
        /// The dragged box in map coordinates.
        area: Polygon<f64>,
    },
    /// A click without a drag.
    Click {
        /// Click position in map coordinates.
        position: Coord<f64>,
        /// Modifier keys held when the click happened.
        modifiers: GestureModifiers,
    },
}

/// Value returned by the selector to indicate the status of the event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventPropagation {
    /// Event should be propagated to the next handler.
    Propagate,
    /// Event should not be propagated to the next handler.
    Stop,
    /// Event should not be propagated, and the selector takes ownership of the gesture: all
    /// consequent drag events belong to it.
    Consume,
}
