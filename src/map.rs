//! Boundary to the external map rendering engine.

use std::sync::Arc;

use crate::layer::VectorLayer;
use crate::view::ViewState;

/// The slice of the rendering engine this crate talks to.
///
/// The engine owns tile compositing, projection and input handling. The selection subsystem only
/// needs to attach and detach vector layers, read the current view and ask for redraws; anything
/// else stays on the engine's side of this trait.
pub trait MapAdapter {
    /// Attaches a vector layer on top of the currently attached layers.
    fn attach_vector_layer(&mut self, layer: Arc<VectorLayer>);

    /// Detaches the vector layer with the given name. Detaching a layer that is not attached is
    /// a no-op.
    fn detach_vector_layer(&mut self, name: &str);

    /// Current state of the map view.
    fn view_state(&self) -> ViewState;

    /// Requests a redraw of the map.
    fn request_redraw(&self) {}
}
