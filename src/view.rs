//! State of the map view as reported by the rendering engine.

use std::f64::consts::FRAC_PI_2;

use geo_types::{coord, Rect};

const OBLIQUE_EPSILON: f64 = 1e-9;

/// Snapshot of the map view at the moment of a selection gesture.
///
/// The view is owned by the rendering engine; the selection code only reads it through
/// [`MapAdapter::view_state`](crate::map::MapAdapter::view_state).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    extent: Rect<f64>,
    rotation: f64,
    resolution: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            extent: Rect::new(coord! {x: -180.0, y: -90.0}, coord! {x: 180.0, y: 90.0}),
            rotation: 0.0,
            resolution: 1.0,
        }
    }
}

impl ViewState {
    /// Creates a new view state.
    ///
    /// `extent` is the full-world extent of the projection, `rotation` is the view rotation in
    /// radians, and `resolution` is the size of one screen pixel in map units.
    pub fn new(extent: Rect<f64>, rotation: f64, resolution: f64) -> Self {
        Self {
            extent,
            rotation,
            resolution,
        }
    }

    /// Full-world extent of the projection.
    pub fn extent(&self) -> Rect<f64> {
        self.extent
    }

    /// View rotation in radians.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Size of one screen pixel in map units.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Horizontal width of one world copy. The projection tiles infinitely east-west with this
    /// period.
    pub fn world_width(&self) -> f64 {
        self.extent.width()
    }

    /// Returns true if the view rotation is not a multiple of 90°.
    ///
    /// For oblique views an axis-aligned extent test is only conservative, and selection must
    /// re-test candidate geometries exactly.
    pub fn is_oblique(&self) -> bool {
        (self.rotation % FRAC_PI_2).abs() > OBLIQUE_EPSILON
    }
}
