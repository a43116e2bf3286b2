//! The live set of selected features, shared between the selector and the presenter.

use std::sync::Arc;

use crate::layer::WfsFeature;

pub mod presenter;

pub use presenter::{InfoPanel, SelectionPresenter};

/// One selected feature: the layer it came from, its index within that layer's source, and the
/// feature itself.
#[derive(Debug, Clone)]
pub struct SelectedFeature {
    layer: String,
    index: usize,
    feature: Arc<WfsFeature>,
}

impl SelectedFeature {
    /// Creates a new selection entry.
    pub fn new(layer: impl Into<String>, index: usize, feature: Arc<WfsFeature>) -> Self {
        Self {
            layer: layer.into(),
            index,
            feature,
        }
    }

    /// Name of the layer the feature belongs to.
    pub fn layer(&self) -> &str {
        &self.layer
    }

    /// Index of the feature in its layer's source.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The selected feature.
    pub fn feature(&self) -> &Arc<WfsFeature> {
        &self.feature
    }
}

type ChangeListener = Box<dyn Fn(&[SelectedFeature]) + Send + Sync>;

/// The mutable set of currently selected features.
///
/// The state is owned by the selection subsystem and constructed once per session; it is cleared
/// at the start of every drag gesture and never persisted. Consumers subscribe to changes with
/// [`on_change`](Self::on_change) instead of polling.
#[derive(Default)]
pub struct SelectionState {
    selected: Vec<SelectedFeature>,
    listeners: Vec<ChangeListener>,
}

impl SelectionState {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler called after every change with the new content of the selection.
    pub fn on_change(&mut self, listener: impl Fn(&[SelectedFeature]) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Currently selected features, in selection order.
    pub fn selected(&self) -> &[SelectedFeature] {
        &self.selected
    }

    /// Number of selected features.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Returns true if the feature with the given index of the given layer is selected.
    pub fn contains(&self, layer: &str, index: usize) -> bool {
        self.selected
            .iter()
            .any(|s| s.index == index && s.layer == layer)
    }

    /// Empties the selection and notifies the listeners.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.notify();
    }

    /// Appends a feature to the selection. Features already selected are not added twice.
    pub fn push(&mut self, entry: SelectedFeature) {
        if self.contains(&entry.layer, entry.index) {
            return;
        }

        self.selected.push(entry);
        self.notify();
    }

    /// Appends all given features to the selection with a single change notification.
    ///
    /// Features already selected are skipped; if nothing new is added, the listeners are not
    /// called.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = SelectedFeature>) {
        let mut changed = false;
        for entry in entries {
            if self.contains(&entry.layer, entry.index) {
                continue;
            }

            self.selected.push(entry);
            changed = true;
        }

        if changed {
            self.notify();
        }
    }

    /// Adds the feature to the selection, or removes it if it is already selected.
    pub fn toggle(&mut self, entry: SelectedFeature) {
        match self
            .selected
            .iter()
            .position(|s| s.index == entry.index && s.layer == entry.layer)
        {
            Some(position) => {
                self.selected.remove(position);
                self.notify();
            }
            None => self.push(entry),
        }
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener(&self.selected);
        }
    }
}

impl std::fmt::Debug for SelectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionState")
            .field("selected", &self.selected)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
