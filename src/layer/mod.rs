//! Vector layers attached to the map: descriptor identity, style and feature data.

use std::sync::Arc;

use crate::catalog::LayerDescriptor;

pub mod feature_source;
pub mod style;

pub use feature_source::{FeatureSource, WfsFeature};
pub use style::{LayerStyle, StyleTable};

/// A vector layer as handed to the rendering engine: the identity of a catalog layer together
/// with its style and its bounded-fetch feature source.
#[derive(Debug)]
pub struct VectorLayer {
    name: String,
    title: String,
    style: LayerStyle,
    source: FeatureSource,
}

impl VectorLayer {
    /// Creates a layer for the given catalog descriptor with a fresh, unloaded feature source.
    pub fn new(descriptor: &LayerDescriptor, style: LayerStyle) -> Self {
        Self {
            name: descriptor.name().to_string(),
            title: descriptor.title().to_string(),
            style,
            source: FeatureSource::new(descriptor.fetch_url()),
        }
    }

    /// Qualified name of the layer, matching its catalog descriptor.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable name of the layer.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Style the rendering engine should draw the layer with.
    pub fn style(&self) -> &LayerStyle {
        &self.style
    }

    /// Feature data of the layer.
    pub fn source(&self) -> &FeatureSource {
        &self.source
    }
}

/// Loads the feature sources of the given layers, each independently.
///
/// A failed load leaves that layer's source empty and is logged; it does not affect the other
/// layers.
pub async fn load_layers(layers: &[Arc<VectorLayer>]) {
    let loads = layers.iter().map(|layer| async move {
        if let Err(error) = layer.source().load().await {
            log::warn!("Failed to load layer {}: {error}", layer.name());
        }
    });

    futures::future::join_all(loads).await;
}

#[cfg(test)]
mod tests {
    use geo_types::{coord, Rect};

    use super::*;
    use crate::catalog::{LayerDescriptor, WfsEndpoint};

    #[tokio::test]
    async fn failed_layer_load_does_not_abort_the_batch() {
        let endpoint = WfsEndpoint::new("http://127.0.0.1:9", "ne");
        let extent = Rect::new(coord! {x: 0.0, y: 0.0}, coord! {x: 1.0, y: 1.0});
        let layers = [
            Arc::new(VectorLayer::new(
                &LayerDescriptor::new(&endpoint, "ne:A", "A", extent),
                LayerStyle::default(),
            )),
            Arc::new(VectorLayer::new(
                &LayerDescriptor::new(&endpoint, "ne:B", "B", extent),
                LayerStyle::default(),
            )),
        ];

        // Both fetches fail; the call still completes and the sources stay empty.
        load_layers(&layers).await;
        for layer in &layers {
            assert!(!layer.source().is_loaded());
            assert!(layer.source().features_in(&extent).is_empty());
        }
    }
}
