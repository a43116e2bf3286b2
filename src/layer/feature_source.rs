//! Per-layer feature storage backed by a bounded GeoJSON fetch.

use std::sync::Arc;

use geo::{BoundingRect, Intersects};
use geo_types::{coord, Geometry, Rect};
use geojson::GeoJson;
use log::debug;
use parking_lot::RwLock;

use crate::error::Error;
use crate::platform;

/// One spatial record of a layer: a geometry plus its attribute map.
///
/// Features are decoded once per source load and shared immutably after that.
#[derive(Debug, Clone)]
pub struct WfsFeature {
    geometry: Geometry<f64>,
    bounding: Rect<f64>,
    properties: geojson::JsonObject,
}

impl WfsFeature {
    /// Creates a feature from the given geometry and attributes.
    ///
    /// Returns `None` for geometries with no extent (e.g. empty collections).
    pub fn new(geometry: Geometry<f64>, properties: geojson::JsonObject) -> Option<Self> {
        let bounding = geometry.bounding_rect()?;
        Some(Self {
            geometry,
            bounding,
            properties,
        })
    }

    fn from_geojson(feature: geojson::Feature) -> Option<Self> {
        let geometry: Geometry<f64> = feature.geometry?.try_into().ok()?;
        Self::new(geometry, feature.properties.unwrap_or_default())
    }

    /// Geometry of the feature.
    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    /// Axis-aligned bounding rectangle of the geometry.
    pub fn bounding(&self) -> Rect<f64> {
        self.bounding
    }

    /// All attributes of the feature.
    pub fn properties(&self) -> &geojson::JsonObject {
        &self.properties
    }

    /// Returns the string value of the attribute with the given name, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.properties.get(name)?.as_str()
    }
}

/// Feature storage of one vector layer, filled by a bounded GetFeature request.
///
/// The source starts empty. Until [`load`](Self::load) completes, every query yields zero
/// features; there is no retry and no error on the query path, as later viewport interactions
/// will see the data once it arrives.
#[derive(Debug, Default)]
pub struct FeatureSource {
    url: String,
    features: RwLock<Option<Vec<Arc<WfsFeature>>>>,
}

impl FeatureSource {
    /// Creates an unloaded source that will fetch from the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            features: RwLock::new(None),
        }
    }

    /// URL the source loads its feature collection from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns true once the feature collection has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.features.read().is_some()
    }

    /// Fetches and decodes the feature collection. Returns the number of loaded features.
    pub async fn load(&self) -> Result<usize, Error> {
        let body = platform::load_text(&self.url).await?;
        let features = decode_collection(&body)?;
        let count = features.len();
        debug!("Loaded {count} features from {}", self.url);
        *self.features.write() = Some(features);
        Ok(count)
    }

    /// Replaces the content of the source with the given features.
    pub fn set_features(&self, features: impl IntoIterator<Item = WfsFeature>) {
        *self.features.write() = Some(features.into_iter().map(Arc::new).collect());
    }

    /// Returns the features whose geometry intersects the given extent, with their indices.
    ///
    /// The bounding rectangle check is a cheap prefilter; accepted features intersect the extent
    /// with their actual geometry.
    pub fn features_in(&self, extent: &Rect<f64>) -> Vec<(usize, Arc<WfsFeature>)> {
        let guard = self.features.read();
        let Some(features) = guard.as_ref() else {
            return Vec::new();
        };

        let extent_poly = extent.to_polygon();
        features
            .iter()
            .enumerate()
            .filter(|(_, f)| f.bounding().intersects(extent))
            .filter(|(_, f)| f.geometry().intersects(&extent_poly))
            .map(|(index, f)| (index, f.clone()))
            .collect()
    }

    /// Returns the features within `tolerance` map units of the given position.
    pub fn features_at(&self, x: f64, y: f64, tolerance: f64) -> Vec<(usize, Arc<WfsFeature>)> {
        let probe = Rect::new(
            coord! {x: x - tolerance, y: y - tolerance},
            coord! {x: x + tolerance, y: y + tolerance},
        );
        self.features_in(&probe)
    }
}

fn decode_collection(body: &str) -> Result<Vec<Arc<WfsFeature>>, Error> {
    let features = match body.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => {
            return Err(Error::Decoding(
                "expected a feature collection, got a bare geometry".into(),
            ))
        }
    };

    Ok(features
        .into_iter()
        .filter_map(WfsFeature::from_geojson)
        .map(Arc::new)
        .collect())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use geo_types::polygon;

    use super::*;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-80, -3], [-78, -3], [-78, -2], [-80, -2], [-80, -3]]]
                },
                "properties": {"NOM_CANTON": "Cuenca", "PARROQUIA": "Centro"}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-79.0, -2.9]},
                "properties": {"Name": "Mirador de Turi"}
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": {"Name": "No geometry"}
            }
        ]
    }"#;

    #[test]
    fn decodes_feature_collection() {
        let features = decode_collection(COLLECTION).expect("collection must decode");
        // The geometry-less feature is dropped.
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].attribute("NOM_CANTON"), Some("Cuenca"));
        assert_eq!(features[0].attribute("PARROQUIA"), Some("Centro"));
        assert_eq!(features[1].attribute("Name"), Some("Mirador de Turi"));
        assert_eq!(features[1].attribute("NOM_CANTON"), None);
    }

    #[test]
    fn rejects_bare_geometry() {
        let result = decode_collection(r#"{"type": "Point", "coordinates": [0, 0]}"#);
        assert_matches!(result, Err(Error::Decoding(_)));
    }

    #[tokio::test]
    async fn failed_load_leaves_source_unloaded() {
        // Port 9 (discard) is closed on any sane test host, so the request fails fast.
        let source = FeatureSource::new("http://127.0.0.1:9/wfs");
        assert_matches!(source.load().await, Err(Error::Network));
        assert!(!source.is_loaded());

        let extent = Rect::new(coord! {x: -180.0, y: -90.0}, coord! {x: 180.0, y: 90.0});
        assert!(source.features_in(&extent).is_empty());
    }

    #[test]
    fn unloaded_source_yields_no_features() {
        let source = FeatureSource::new("http://localhost/unused");
        assert!(!source.is_loaded());

        let extent = Rect::new(coord! {x: -180.0, y: -90.0}, coord! {x: 180.0, y: 90.0});
        assert!(source.features_in(&extent).is_empty());
        assert!(source.features_at(0.0, 0.0, 1.0).is_empty());
    }

    #[test]
    fn features_in_tests_actual_geometry() {
        // A diagonal sliver: its bounding rectangle covers the unit square neighborhood, but the
        // geometry stays close to the x = y line.
        let sliver = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 10.1, y: 10.0),
            (x: 0.1, y: 0.0),
        ];
        let source = FeatureSource::new("http://localhost/unused");
        source.set_features([
            WfsFeature::new(sliver.into(), geojson::JsonObject::new()).expect("non-empty geometry")
        ]);

        // Overlaps the bounding rectangle only.
        let corner = Rect::new(coord! {x: 8.0, y: 0.0}, coord! {x: 9.0, y: 1.0});
        assert!(source.features_in(&corner).is_empty());

        // Overlaps the geometry itself.
        let on_diagonal = Rect::new(coord! {x: 4.0, y: 3.5}, coord! {x: 5.0, y: 4.5});
        assert_eq!(source.features_in(&on_diagonal).len(), 1);
    }

    #[test]
    fn features_at_respects_tolerance() {
        let features = decode_collection(COLLECTION).expect("collection must decode");
        let source = FeatureSource::new("http://localhost/unused");
        *source.features.write() = Some(features);

        // Close to the point feature, which sits inside the polygon feature.
        let picked = source.features_at(-79.001, -2.9, 0.01);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[1].1.attribute("Name"), Some("Mirador de Turi"));

        // Inside the polygon but out of tolerance of the point.
        let picked = source.features_at(-79.1, -2.9, 0.01);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].1.attribute("NOM_CANTON"), Some("Cuenca"));

        assert!(source.features_at(-70.0, 0.0, 0.01).is_empty());
    }
}
