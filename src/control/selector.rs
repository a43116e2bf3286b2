use std::sync::Arc;

use geo::{AffineOps, AffineTransform, BoundingRect, Intersects};
use geo_types::{coord, Coord, Polygon, Rect};
use parking_lot::RwLock;

use crate::control::{EventPropagation, SelectorEvent};
use crate::layer::{VectorLayer, WfsFeature};
use crate::selection::{SelectedFeature, SelectionState};
use crate::view::ViewState;

/// Pick tolerance for click selection, in multiples of the view resolution.
const CLICK_TOLERANCE_PX: f64 = 2.0;

/// Read-only context a selection gesture is evaluated against: the current view and the layers
/// currently visible on the map, in catalog order.
pub struct SelectionContext<'a> {
    /// View state at the moment of the gesture.
    pub view: ViewState,
    /// Visible vector layers, in catalog order.
    pub layers: &'a [Arc<VectorLayer>],
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum GestureState {
    Idle,
    Dragging,
}

/// Multi-layer box selection of map features.
///
/// The selector is a state machine driven by drag gesture events from the rendering engine. The
/// drag gesture is armed only while the platform modifier key is held. A new drag clears the
/// previous selection; when the drag ends, every feature of every visible layer whose geometry
/// intersects the dragged box is appended to the shared [`SelectionState`].
///
/// The box is evaluated against every world copy it spans, since the projection repeats
/// east-west across the antimeridian, and features are deduplicated across copies. For oblique
/// views (rotation not a multiple of 90°) candidates found with the axis-aligned extent of the
/// box are re-tested against the actual rotated box.
pub struct SpatialSelector {
    state: GestureState,
    selection: Arc<RwLock<SelectionState>>,
}

impl SpatialSelector {
    /// Creates a selector writing to the given selection state.
    pub fn new(selection: Arc<RwLock<SelectionState>>) -> Self {
        Self {
            state: GestureState::Idle,
            selection,
        }
    }

    /// The selection state this selector writes to.
    pub fn selection(&self) -> &Arc<RwLock<SelectionState>> {
        &self.selection
    }

    /// Handles one gesture event.
    pub fn handle_event(
        &mut self,
        event: &SelectorEvent,
        context: &SelectionContext,
    ) -> EventPropagation {
        match event {
            SelectorEvent::DragStarted { modifiers } => {
                if self.state != GestureState::Idle || !modifiers.platform_key {
                    return EventPropagation::Propagate;
                }

                self.state = GestureState::Dragging;
                self.selection.write().clear();
                EventPropagation::Consume
            }
            SelectorEvent::DragEnded { area } => {
                if self.state != GestureState::Dragging {
                    return EventPropagation::Propagate;
                }

                self.state = GestureState::Idle;
                self.select_in_box(area, context);
                EventPropagation::Stop
            }
            SelectorEvent::Click {
                position,
                modifiers: _,
            } => {
                if self.toggle_at(*position, context) {
                    EventPropagation::Stop
                } else {
                    EventPropagation::Propagate
                }
            }
        }
    }

    fn select_in_box(&mut self, area: &Polygon<f64>, context: &SelectionContext) {
        let Some(box_extent) = area.bounding_rect() else {
            return;
        };

        let world_extent = context.view.extent();
        let world_width = context.view.world_width();
        if !(world_width > 0.0) {
            return;
        }

        // The box may span several repetitions of the world across the antimeridian; each one is
        // evaluated in the base world's coordinates.
        let start_world =
            ((box_extent.min().x - world_extent.min().x) / world_width).floor() as i64;
        let end_world = ((box_extent.max().x - world_extent.min().x) / world_width).floor() as i64;

        let mut selection = self.selection.write();
        let mut accepted: Vec<SelectedFeature> = Vec::new();
        for world in start_world..=end_world {
            let shift = world as f64 * world_width;
            let left = (box_extent.min().x - shift).max(world_extent.min().x);
            let right = (box_extent.max().x - shift).min(world_extent.max().x);
            if left > right {
                continue;
            }

            let pass_extent = Rect::new(
                coord! {x: left, y: box_extent.min().y},
                coord! {x: right, y: box_extent.max().y},
            );

            for layer in context.layers {
                for (index, feature) in layer.source().features_in(&pass_extent) {
                    if selection.contains(layer.name(), index)
                        || accepted
                            .iter()
                            .any(|s| s.index() == index && s.layer() == layer.name())
                    {
                        continue;
                    }

                    if context.view.is_oblique()
                        && !oblique_hit(area, shift, context.view.rotation(), &feature)
                    {
                        continue;
                    }

                    accepted.push(SelectedFeature::new(layer.name(), index, feature));
                }
            }
        }

        // A single notification per gesture, no matter how many features the box caught.
        selection.extend(accepted);
    }

    fn toggle_at(&mut self, position: Coord<f64>, context: &SelectionContext) -> bool {
        let tolerance = context.view.resolution() * CLICK_TOLERANCE_PX;
        let mut toggled = false;

        let mut selection = self.selection.write();
        for layer in context.layers {
            for (index, feature) in layer.source().features_at(position.x, position.y, tolerance)
            {
                selection.toggle(SelectedFeature::new(layer.name(), index, feature));
                toggled = true;
            }
        }

        toggled
    }
}

/// Exact intersection test for oblique views.
///
/// The extent query of the box pass is conservative when the view is rotated: the box is a
/// rotated quadrilateral on the map and its axis-aligned extent overshoots it. Rotating both the
/// box and the candidate geometry back by the view rotation makes the box axis-aligned again, so
/// testing the rotated geometry against the rotated box's extent is exact.
fn oblique_hit(area: &Polygon<f64>, shift: f64, rotation: f64, feature: &WfsFeature) -> bool {
    let anchor = coord! {x: 0.0, y: 0.0};
    let unrotate = AffineTransform::rotate(-rotation.to_degrees(), anchor);

    let shifted_box = area.affine_transform(&AffineTransform::translate(-shift, 0.0));
    let aligned_box = shifted_box.affine_transform(&unrotate);
    let Some(aligned_extent) = aligned_box.bounding_rect() else {
        return false;
    };

    let aligned_geometry = feature.geometry().affine_transform(&unrotate);
    aligned_geometry.intersects(&aligned_extent.to_polygon())
}
