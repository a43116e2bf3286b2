//! Catalog of the feature layers discovered from a WFS service.
//!
//! [`LayerCatalog`] is constructed once per session from the descriptors returned by
//! [`discover_layers`](crate::capabilities::discover_layers) and is the single source of truth for
//! which layers exist and which of them are visible. The bounded GetFeature URL of every layer is
//! built once, when the descriptor is constructed, and cached on it.

use geo_types::Rect;
use log::warn;
use serde::{Deserialize, Serialize};

/// Spatial reference system used for both the requested features and the bounding box filter.
pub const DEFAULT_SRS: &str = "EPSG:4326";

/// Address of a WFS service: base URL of the server plus the workspace the layers live in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WfsEndpoint {
    base_url: String,
    workspace: String,
}

impl WfsEndpoint {
    /// Creates a new endpoint. A trailing slash in `base_url` is ignored.
    pub fn new(base_url: impl Into<String>, workspace: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            base_url,
            workspace: workspace.into(),
        }
    }

    /// URL of the GetCapabilities document of the service.
    pub fn capabilities_url(&self) -> String {
        format!(
            "{}/{}/wfs?request=GetCapabilities",
            self.base_url, self.workspace
        )
    }

    /// Bounded GetFeature request URL for the feature type with the given qualified name.
    ///
    /// The bounding box is given in `minX,minY,maxX,maxY,SRS` order.
    pub fn feature_url(&self, type_name: &str, extent: Rect<f64>) -> String {
        format!(
            "{}/{}/wfs?service=WFS&version=1.1.0&request=GetFeature&typeName={}&outputFormat=application/json&srsname={srs}&bbox={},{},{},{},{srs}",
            self.base_url,
            self.workspace,
            type_name,
            extent.min().x,
            extent.min().y,
            extent.max().x,
            extent.max().y,
            srs = DEFAULT_SRS,
        )
    }
}

/// Identity and metadata of one layer discovered from the service catalog.
///
/// Descriptors are immutable after construction except for the [`visible`](Self::is_visible) flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerDescriptor {
    name: String,
    title: String,
    extent: Rect<f64>,
    fetch_url: String,
    visible: bool,
}

impl LayerDescriptor {
    /// Creates a descriptor for the feature type with the given qualified `name`.
    ///
    /// The layer is visible by default.
    pub fn new(
        endpoint: &WfsEndpoint,
        name: impl Into<String>,
        title: impl Into<String>,
        extent: Rect<f64>,
    ) -> Self {
        let name = name.into();
        let fetch_url = endpoint.feature_url(&name, extent);
        Self {
            name,
            title: title.into(),
            extent,
            fetch_url,
            visible: true,
        }
    }

    /// Qualified (namespaced) name of the feature type. Unique within a catalog.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable name of the layer.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Geographic extent of the layer, as advertised by the service.
    pub fn extent(&self) -> Rect<f64> {
        self.extent
    }

    /// Bounded GetFeature URL of the layer.
    pub fn fetch_url(&self) -> &str {
        &self.fetch_url
    }

    /// Whether the layer should currently be shown on the map.
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// An ordered collection of the layers discovered from a WFS service.
///
/// The order of the layers is the document order of the capabilities document. It is significant:
/// it defines the checklist order in the UI and, through that, the z-order of re-attached layers.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LayerCatalog {
    layers: Vec<LayerDescriptor>,
}

impl LayerCatalog {
    /// Creates a catalog from the given descriptors.
    ///
    /// Layer names must be unique; a descriptor with an already seen name is dropped.
    pub fn new(layers: Vec<LayerDescriptor>) -> Self {
        let mut unique: Vec<LayerDescriptor> = Vec::with_capacity(layers.len());
        for layer in layers {
            if unique.iter().any(|l| l.name == layer.name) {
                warn!("Duplicate layer {} dropped from the catalog", layer.name);
                continue;
            }

            unique.push(layer);
        }

        Self { layers: unique }
    }

    /// Number of layers in the catalog.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if the catalog contains no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// All layers in the catalog in the capabilities document order.
    pub fn layers(&self) -> &[LayerDescriptor] {
        &self.layers
    }

    /// Returns the descriptor of the layer with the given name, if present.
    pub fn get(&self, name: &str) -> Option<&LayerDescriptor> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Cached bounded fetch URL of the layer with the given name.
    pub fn url_for(&self, name: &str) -> Option<&str> {
        self.get(name).map(|l| l.fetch_url())
    }

    /// Changes the visibility flag of the layer with the given name.
    ///
    /// Setting the same value twice has no additional effect. An unknown name is a no-op, as the
    /// UI and the catalog can be transiently out of sync during async load.
    pub fn set_visible(&mut self, name: &str, visible: bool) {
        if let Some(layer) = self.layers.iter_mut().find(|l| l.name == name) {
            layer.visible = visible;
        }
    }

    /// Order-preserving view of the layers with the visibility flag set.
    pub fn visible_layers(&self) -> impl Iterator<Item = &LayerDescriptor> {
        self.layers.iter().filter(|l| l.visible)
    }
}
