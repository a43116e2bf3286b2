//! Projection of the selected feature set onto the info panel.

use super::SelectedFeature;
use crate::layer::WfsFeature;

/// Title shown by an empty, hidden panel.
pub const EMPTY_PANEL_TITLE: &str = "None";

/// Attribute holding the county name of a feature.
const CANTON_ATTRIBUTE: &str = "NOM_CANTON";
/// Attribute holding the parish name of a feature.
const PARISH_ATTRIBUTE: &str = "PARROQUIA";
/// Fallback display attribute for features without county/parish data.
const NAME_ATTRIBUTE: &str = "Name";

/// Separator between the county and parish parts of a label.
const FIELD_SEPARATOR: char = '-';
/// Separator between the labels of a multi-feature selection.
const LABEL_SEPARATOR: char = ',';

/// Content and visibility of the info panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoPanel {
    visible: bool,
    title: String,
}

impl Default for InfoPanel {
    fn default() -> Self {
        Self {
            visible: false,
            title: EMPTY_PANEL_TITLE.to_string(),
        }
    }
}

impl InfoPanel {
    /// Whether the panel should be shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Title text of the panel.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Path of the illustrative image for the current selection, if the panel is shown.
    pub fn image_path(&self) -> Option<String> {
        self.visible.then(|| format!("img/{}.jpg", self.title))
    }
}

struct Label {
    text: String,
    /// True for labels joined from the county and parish attributes. Only such labels may
    /// legitimately contain the field separator.
    composite: bool,
}

fn feature_label(feature: &WfsFeature) -> Label {
    match (
        feature.attribute(CANTON_ATTRIBUTE),
        feature.attribute(PARISH_ATTRIBUTE),
    ) {
        (Some(canton), Some(parish)) => Label {
            text: format!("{canton}{FIELD_SEPARATOR}{parish}"),
            composite: true,
        },
        _ => Label {
            text: feature
                .attribute(NAME_ATTRIBUTE)
                .unwrap_or_default()
                .to_string(),
            composite: false,
        },
    }
}

/// Derives the info panel state from the selection.
///
/// An empty selection hides the panel and resets its title. A selection that maps to a single
/// distinct label shows the panel with that label as the title. A heterogeneous selection (the
/// joined label list contains a label separator, or a fallback label itself contains the field
/// separator) hides the panel instead of showing a meaningless combined label.
#[derive(Debug, Default)]
pub struct SelectionPresenter {
    panel: InfoPanel,
}

impl SelectionPresenter {
    /// Creates a presenter with a hidden, reset panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the info panel.
    pub fn panel(&self) -> &InfoPanel {
        &self.panel
    }

    /// Recomputes the panel state for the given selection.
    pub fn update(&mut self, selection: &[SelectedFeature]) {
        let mut labels: Vec<Label> = Vec::new();
        for entry in selection {
            let label = feature_label(entry.feature());
            if label.text.is_empty() || labels.iter().any(|l| l.text == label.text) {
                continue;
            }

            labels.push(label);
        }

        if labels.is_empty() {
            self.panel = InfoPanel::default();
            return;
        }

        let ambiguous = labels
            .iter()
            .any(|l| !l.composite && l.text.contains(FIELD_SEPARATOR));
        let title: String = labels
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(&LABEL_SEPARATOR.to_string());

        self.panel = InfoPanel {
            visible: !ambiguous && !title.contains(LABEL_SEPARATOR),
            title,
        };
    }
}
