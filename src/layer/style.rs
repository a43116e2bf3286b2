//! Styles applied to vector layers by the rendering engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Appearance of a vector layer: stroke and fill of its features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    stroke_color: Color,
    stroke_width: f32,
    fill_color: Color,
}

impl LayerStyle {
    /// Creates a new style with the given fill color and a default stroke.
    pub fn new(fill_color: Color) -> Self {
        Self {
            fill_color,
            ..Default::default()
        }
    }

    /// Sets the stroke color.
    pub fn with_stroke_color(&self, stroke_color: Color) -> Self {
        Self {
            stroke_color,
            ..*self
        }
    }

    /// Sets the stroke width in pixels.
    pub fn with_stroke_width(&self, stroke_width: f32) -> Self {
        Self {
            stroke_width,
            ..*self
        }
    }

    /// Color of the feature outlines.
    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    /// Width of the feature outlines in pixels.
    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// Color of the polygon interiors.
    pub fn fill_color(&self) -> Color {
        self.fill_color
    }
}

impl Default for LayerStyle {
    /// The default style matches what rendering engines typically draw for unstyled vector
    /// layers: a light blue outline with a mostly transparent white fill.
    fn default() -> Self {
        Self {
            stroke_color: Color::rgba(51, 153, 204, 255),
            stroke_width: 1.25,
            fill_color: Color::WHITE.with_alpha(102),
        }
    }
}

/// Mapping from qualified layer names to their styles.
///
/// A layer with no entry in the table gets the [default](LayerStyle::default) style, which is not
/// an error.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StyleTable {
    styles: HashMap<String, LayerStyle>,
    default: LayerStyle,
}

impl StyleTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a style for the layer with the given name.
    pub fn with_style(mut self, name: impl Into<String>, style: LayerStyle) -> Self {
        self.styles.insert(name.into(), style);
        self
    }

    /// Returns the style of the layer with the given name, falling back to the default style.
    pub fn get(&self, name: &str) -> &LayerStyle {
        self.styles.get(name).unwrap_or(&self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_name_gets_default_style() {
        let azuay = LayerStyle::new(Color::BLUE.with_alpha(26))
            .with_stroke_color(Color::BLUE)
            .with_stroke_width(8.0);
        let table = StyleTable::new().with_style("ne:Azuay", azuay);

        assert_eq!(*table.get("ne:Azuay"), azuay);
        assert_eq!(*table.get("ne:Rutas"), LayerStyle::default());
    }
}
