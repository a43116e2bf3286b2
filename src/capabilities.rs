//! Discovery of feature layers from a WFS GetCapabilities document.
//!
//! The capabilities document is requested once at startup. Every `FeatureType` entry with a name,
//! a title and a well-formed WGS84 bounding box becomes a [`LayerDescriptor`]; base-reference
//! layers are filtered out by title, and entries with missing or unparsable corner data are
//! silently dropped. GIS catalogs routinely contain non-spatial entries, so an incomplete entry is
//! not an error.

use geo_types::{coord, Rect};
use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::catalog::{LayerDescriptor, WfsEndpoint};
use crate::error::Error;
use crate::platform;

/// Titles of the base-reference layers that are never shown in the catalog, regardless of the
/// service content.
pub const BASE_REFERENCE_TITLES: [&str; 5] = [
    "Boundary Lines",
    "Coastlines",
    "Countries",
    "Disputed Areas",
    "Populated Places",
];

/// Fetches the capabilities document of the given service and parses it into layer descriptors.
///
/// Fails with [`Error::Network`] if the request fails or returns a non-success status, and with
/// [`Error::Parse`] if the document is not well-formed.
pub async fn discover_layers(endpoint: &WfsEndpoint) -> Result<Vec<LayerDescriptor>, Error> {
    let document = platform::load_text(&endpoint.capabilities_url()).await?;
    parse_capabilities(endpoint, &document)
}

#[derive(Default)]
struct PendingEntry {
    name: Option<String>,
    title: Option<String>,
    lower_corner: Option<String>,
    upper_corner: Option<String>,
}

impl PendingEntry {
    fn into_descriptor(self, endpoint: &WfsEndpoint) -> Option<LayerDescriptor> {
        let name = self.name?;
        let title = self.title.unwrap_or_default();
        if BASE_REFERENCE_TITLES.contains(&title.as_str()) {
            return None;
        }

        let Some(extent) = parse_extent(self.lower_corner.as_deref(), self.upper_corner.as_deref())
        else {
            debug!("Feature type {name} has no valid bounding box and is skipped");
            return None;
        };

        Some(LayerDescriptor::new(endpoint, name, title, extent))
    }
}

fn parse_corner(value: &str) -> Option<(f64, f64)> {
    let mut parts = value.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    Some((x, y))
}

fn parse_extent(lower: Option<&str>, upper: Option<&str>) -> Option<Rect<f64>> {
    let (min_x, min_y) = parse_corner(lower?)?;
    let (max_x, max_y) = parse_corner(upper?)?;
    if min_x > max_x || min_y > max_y {
        return None;
    }

    Some(Rect::new(
        coord! {x: min_x, y: min_y},
        coord! {x: max_x, y: max_y},
    ))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum EntryField {
    Name,
    Title,
    LowerCorner,
    UpperCorner,
}

/// Parses the text of a capabilities document into layer descriptors, preserving document order.
///
/// This is the pure part of [`discover_layers`]. Namespace prefixes of the elements are ignored,
/// as different servers use different prefix conventions for the OWS elements.
pub fn parse_capabilities(
    endpoint: &WfsEndpoint,
    document: &str,
) -> Result<Vec<LayerDescriptor>, Error> {
    let mut reader = Reader::from_str(document);
    reader.trim_text(true);

    let mut layers = Vec::new();
    let mut entry: Option<PendingEntry> = None;
    let mut field: Option<EntryField> = None;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(start) => match start.local_name().as_ref() {
                b"FeatureType" => entry = Some(PendingEntry::default()),
                b"Name" if entry.is_some() => field = Some(EntryField::Name),
                b"Title" if entry.is_some() => field = Some(EntryField::Title),
                b"LowerCorner" if entry.is_some() => field = Some(EntryField::LowerCorner),
                b"UpperCorner" if entry.is_some() => field = Some(EntryField::UpperCorner),
                _ => {}
            },
            Event::Text(text) => {
                if let (Some(pending), Some(field)) = (&mut entry, field) {
                    let value = text.unescape()?.into_owned();
                    let slot = match field {
                        EntryField::Name => &mut pending.name,
                        EntryField::Title => &mut pending.title,
                        EntryField::LowerCorner => &mut pending.lower_corner,
                        EntryField::UpperCorner => &mut pending.upper_corner,
                    };
                    // The first occurrence wins, same as the original viewer.
                    if slot.is_none() {
                        *slot = Some(value);
                    }
                }
            }
            Event::End(end) => match end.local_name().as_ref() {
                b"FeatureType" => {
                    if let Some(descriptor) =
                        entry.take().and_then(|e| e.into_descriptor(endpoint))
                    {
                        layers.push(descriptor);
                    }
                    field = None;
                }
                _ => field = None,
            },
            _ => {}
        }
    }

    Ok(layers)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn endpoint() -> WfsEndpoint {
        WfsEndpoint::new("http://localhost:8080/geoserver", "ne")
    }

    fn feature_type(name: &str, title: &str, lower: &str, upper: &str) -> String {
        format!(
            "<FeatureType>\
                <Name>{name}</Name>\
                <Title>{title}</Title>\
                <Abstract/>\
                <ows:Keywords><ows:Keyword>features</ows:Keyword></ows:Keywords>\
                <DefaultSRS>urn:x-ogc:def:crs:EPSG:4326</DefaultSRS>\
                <ows:WGS84BoundingBox>\
                    <ows:LowerCorner>{lower}</ows:LowerCorner>\
                    <ows:UpperCorner>{upper}</ows:UpperCorner>\
                </ows:WGS84BoundingBox>\
            </FeatureType>"
        )
    }

    fn document(feature_types: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
            <wfs:WFS_Capabilities xmlns:wfs=\"http://www.opengis.net/wfs\" \
                xmlns:ows=\"http://www.opengis.net/ows\" version=\"1.1.0\">\
                <ows:ServiceIdentification><ows:Title>GeoServer WFS</ows:Title></ows:ServiceIdentification>\
                <FeatureTypeList>{feature_types}</FeatureTypeList>\
            </wfs:WFS_Capabilities>"
        )
    }

    #[test]
    fn parses_feature_types_in_document_order() {
        let doc = document(&format!(
            "{}{}{}",
            feature_type("ne:Azuay", "Azuay", "-80 -3", "-78 -2"),
            feature_type("ne:Rutas", "Rutas", "-79.5 -3.1", "-78.6 -2.5"),
            feature_type("ne:Cuenca", "Cuenca Canton", "-79.2 -3.0", "-78.8 -2.7"),
        ));

        let layers = parse_capabilities(&endpoint(), &doc).expect("document must parse");
        let names: Vec<_> = layers.iter().map(|l| l.name()).collect();
        assert_eq!(names, ["ne:Azuay", "ne:Rutas", "ne:Cuenca"]);
        assert_eq!(layers[0].title(), "Azuay");
        assert_eq!(layers[0].extent().min().x, -80.0);
        assert_eq!(layers[0].extent().max().y, -2.0);
        assert!(layers.iter().all(|l| l.is_visible()));
    }

    #[test]
    fn filters_base_reference_layers() {
        let doc = document(&format!(
            "{}{}{}",
            feature_type("ne:countries", "Countries", "-180 -90", "180 90"),
            feature_type("ne:Azuay", "Azuay", "-80 -3", "-78 -2"),
            feature_type("ne:populated", "Populated Places", "-180 -90", "180 90"),
        ));

        let layers = parse_capabilities(&endpoint(), &doc).expect("document must parse");
        let names: Vec<_> = layers.iter().map(|l| l.name()).collect();
        assert_eq!(names, ["ne:Azuay"]);
    }

    #[test]
    fn skips_malformed_corner_entries() {
        let no_box = "<FeatureType><Name>ne:NoBox</Name><Title>No box</Title></FeatureType>";
        let doc = document(&format!(
            "{}{}{}{}",
            feature_type("ne:Bad", "Bad", "not numbers", "-78 -2"),
            no_box,
            feature_type("ne:Inverted", "Inverted", "-78 -2", "-80 -3"),
            feature_type("ne:Azuay", "Azuay", "-80 -3", "-78 -2"),
        ));

        let layers = parse_capabilities(&endpoint(), &doc).expect("document must parse");
        let names: Vec<_> = layers.iter().map(|l| l.name()).collect();
        assert_eq!(names, ["ne:Azuay"]);
    }

    #[test]
    fn empty_feature_type_list() {
        let layers = parse_capabilities(&endpoint(), &document("")).expect("document must parse");
        assert!(layers.is_empty());
    }

    #[test]
    fn malformed_document_fails() {
        let result = parse_capabilities(&endpoint(), "<FeatureTypeList><FeatureType></Oops>");
        assert_matches!(result, Err(Error::Parse(_)));
    }

    #[test]
    fn fetch_url_is_derived_from_extent() {
        let doc = document(&feature_type("ne:Azuay", "Azuay", "-80 -3", "-78 -2"));
        let layers = parse_capabilities(&endpoint(), &doc).expect("document must parse");

        assert_eq!(layers.len(), 1);
        let url = layers[0].fetch_url();
        assert!(url.contains("typeName=ne:Azuay"));
        assert!(url.contains("bbox=-80,-3,-78,-2,EPSG:4326"));
    }
}
