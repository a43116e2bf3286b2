//! Synchronization of catalog visibility with the layers attached to the map.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::catalog::LayerCatalog;
use crate::layer::{StyleTable, VectorLayer};
use crate::map::MapAdapter;

/// Keeps the set of map-attached vector layers equal to the catalog's visible layers.
///
/// Toggling is per-layer independent: checking or unchecking one layer never changes the
/// visibility of any other. On every change the attached set is diffed against
/// [`visible_layers`](LayerCatalog::visible_layers): layers that became invisible are detached,
/// newly visible layers are attached in catalog order with freshly constructed feature sources.
/// Layers that stay visible keep their already loaded sources.
pub struct LayerVisibilityController<M: MapAdapter> {
    catalog: Arc<RwLock<LayerCatalog>>,
    styles: StyleTable,
    attached: Vec<Arc<VectorLayer>>,
    map: M,
}

impl<M: MapAdapter> LayerVisibilityController<M> {
    /// Creates a controller over the given catalog and map. No layers are attached until
    /// [`sync_layers`](Self::sync_layers) or [`set_layer_visible`](Self::set_layer_visible) is
    /// called.
    pub fn new(catalog: Arc<RwLock<LayerCatalog>>, styles: StyleTable, map: M) -> Self {
        Self {
            catalog,
            styles,
            attached: Vec::new(),
            map,
        }
    }

    /// The catalog this controller synchronizes with.
    pub fn catalog(&self) -> &Arc<RwLock<LayerCatalog>> {
        &self.catalog
    }

    /// The map adapter.
    pub fn map(&self) -> &M {
        &self.map
    }

    /// Currently attached vector layers, in catalog order.
    ///
    /// This is the layer set a [`SelectionContext`](crate::control::SelectionContext) should be
    /// built from.
    pub fn attached_layers(&self) -> &[Arc<VectorLayer>] {
        &self.attached
    }

    /// Handles a visibility toggle from the UI checklist.
    ///
    /// Returns the newly attached layers, whose feature sources still need to be
    /// [loaded](crate::layer::load_layers).
    pub fn set_layer_visible(&mut self, name: &str, visible: bool) -> Vec<Arc<VectorLayer>> {
        self.catalog.write().set_visible(name, visible);
        self.sync_layers()
    }

    /// Re-derives the attached layer set from the current catalog state.
    ///
    /// Returns the newly attached layers, whose feature sources still need to be loaded.
    pub fn sync_layers(&mut self) -> Vec<Arc<VectorLayer>> {
        let visible: Vec<_> = self
            .catalog
            .read()
            .visible_layers()
            .cloned()
            .collect();

        let (kept, dropped): (Vec<_>, Vec<_>) = std::mem::take(&mut self.attached)
            .into_iter()
            .partition(|layer| visible.iter().any(|d| d.name() == layer.name()));
        for layer in &dropped {
            self.map.detach_vector_layer(layer.name());
        }

        let mut added = Vec::new();
        let mut attached = Vec::with_capacity(visible.len());
        for descriptor in &visible {
            if let Some(existing) = kept.iter().find(|l| l.name() == descriptor.name()) {
                attached.push(existing.clone());
                continue;
            }

            let layer = Arc::new(VectorLayer::new(
                descriptor,
                *self.styles.get(descriptor.name()),
            ));
            self.map.attach_vector_layer(layer.clone());
            added.push(layer.clone());
            attached.push(layer);
        }

        self.attached = attached;
        if !dropped.is_empty() || !added.is_empty() {
            self.map.request_redraw();
        }

        added
    }
}

#[cfg(test)]
mod tests {
    use geo_types::{coord, Rect};

    use super::*;
    use crate::catalog::{LayerDescriptor, WfsEndpoint};
    use crate::view::ViewState;

    #[derive(Default)]
    struct MockMap {
        attached: Vec<String>,
        detach_calls: usize,
    }

    impl MapAdapter for &mut MockMap {
        fn attach_vector_layer(&mut self, layer: Arc<VectorLayer>) {
            self.attached.push(layer.name().to_string());
        }

        fn detach_vector_layer(&mut self, name: &str) {
            self.attached.retain(|n| n != name);
            self.detach_calls += 1;
        }

        fn view_state(&self) -> ViewState {
            ViewState::default()
        }
    }

    fn catalog() -> Arc<RwLock<LayerCatalog>> {
        let endpoint = WfsEndpoint::new("http://localhost:8080/geoserver", "ne");
        let extent = Rect::new(coord! {x: 0.0, y: 0.0}, coord! {x: 1.0, y: 1.0});
        Arc::new(RwLock::new(LayerCatalog::new(vec![
            LayerDescriptor::new(&endpoint, "ne:A", "A", extent),
            LayerDescriptor::new(&endpoint, "ne:B", "B", extent),
            LayerDescriptor::new(&endpoint, "ne:C", "C", extent),
        ])))
    }

    #[test]
    fn initial_sync_attaches_all_visible_layers() {
        let mut map = MockMap::default();
        let mut controller =
            LayerVisibilityController::new(catalog(), StyleTable::new(), &mut map);

        let added = controller.sync_layers();
        assert_eq!(added.len(), 3);

        let names: Vec<_> = controller
            .attached_layers()
            .iter()
            .map(|l| l.name().to_string())
            .collect();
        assert_eq!(names, ["ne:A", "ne:B", "ne:C"]);
        assert_eq!(controller.map().attached, ["ne:A", "ne:B", "ne:C"]);
    }

    #[test]
    fn toggle_off_detaches_only_that_layer() {
        let mut map = MockMap::default();
        let mut controller =
            LayerVisibilityController::new(catalog(), StyleTable::new(), &mut map);
        controller.sync_layers();

        let added = controller.set_layer_visible("ne:B", false);
        assert!(added.is_empty());

        let names: Vec<_> = controller
            .attached_layers()
            .iter()
            .map(|l| l.name().to_string())
            .collect();
        assert_eq!(names, ["ne:A", "ne:C"]);
        assert_eq!(controller.map().attached, ["ne:A", "ne:C"]);
        assert_eq!(controller.map().detach_calls, 1);
    }

    #[test]
    fn toggle_back_on_attaches_fresh_layer_keeping_others() {
        let mut map = MockMap::default();
        let mut controller =
            LayerVisibilityController::new(catalog(), StyleTable::new(), &mut map);
        controller.sync_layers();

        let kept_a = controller.attached_layers()[0].clone();
        controller.set_layer_visible("ne:B", false);
        let added = controller.set_layer_visible("ne:B", true);

        assert_eq!(added.len(), 1);
        assert_eq!(added[0].name(), "ne:B");
        // Layers that stayed visible keep their sources.
        assert!(Arc::ptr_eq(&kept_a, &controller.attached_layers()[0]));
        // The re-attached layer got a fresh, unloaded source.
        assert!(!added[0].source().is_loaded());
    }

    #[test]
    fn redundant_toggle_changes_nothing() {
        let mut map = MockMap::default();
        let mut controller =
            LayerVisibilityController::new(catalog(), StyleTable::new(), &mut map);
        controller.sync_layers();

        let before: Vec<_> = controller.attached_layers().to_vec();
        let added = controller.set_layer_visible("ne:A", true);
        assert!(added.is_empty());
        assert_eq!(controller.map().detach_calls, 0);
        for (a, b) in before.iter().zip(controller.attached_layers()) {
            assert!(Arc::ptr_eq(a, b));
        }
    }

    #[test]
    fn unknown_layer_toggle_is_noop() {
        let mut map = MockMap::default();
        let mut controller =
            LayerVisibilityController::new(catalog(), StyleTable::new(), &mut map);
        controller.sync_layers();

        let added = controller.set_layer_visible("ne:Nowhere", false);
        assert!(added.is_empty());
        assert_eq!(controller.attached_layers().len(), 3);
    }
}
