//! Mirador discovers feature layers from a WFS service at runtime and lets the user of an
//! interactive map select features across those layers by dragging a box over the map.
//!
//! The crate does not render anything itself. It sits between a WFS catalog service and a map
//! rendering engine, and owns four things:
//!
//! * the [layer catalog](catalog::LayerCatalog), built by parsing the service's GetCapabilities
//!   document into typed [descriptors](catalog::LayerDescriptor) with a bounded GetFeature URL
//!   derived from each layer's advertised extent;
//! * the [visibility controller](controller::LayerVisibilityController), which keeps the set of
//!   layers attached to the map equal to the set of visible catalog layers as the user toggles
//!   the layer checklist;
//! * the [spatial selector](control::SpatialSelector), a drag-box gesture state machine that
//!   finds the features of all visible layers intersecting the dragged box, handling
//!   antimeridian world copies and oblique (rotated) views;
//! * the [selection presenter](selection::SelectionPresenter), which projects the selected
//!   feature set onto the info panel title.
//!
//! The rendering engine is reached through the [`MapAdapter`](map::MapAdapter) trait, and its
//! gestures reach the selector as [`SelectorEvent`](control::SelectorEvent)s.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mirador::capabilities::discover_layers;
//! use mirador::catalog::{LayerCatalog, WfsEndpoint};
//! use mirador::control::SpatialSelector;
//! use mirador::controller::LayerVisibilityController;
//! use mirador::layer::{load_layers, StyleTable};
//! use mirador::selection::{SelectionPresenter, SelectionState};
//! use parking_lot::RwLock;
//!
//! # async fn run(map: impl mirador::map::MapAdapter) -> Result<(), mirador::Error> {
//! let endpoint = WfsEndpoint::new("http://localhost:8080/geoserver", "ne");
//! let catalog = Arc::new(RwLock::new(LayerCatalog::new(
//!     discover_layers(&endpoint).await?,
//! )));
//!
//! let mut controller = LayerVisibilityController::new(catalog, StyleTable::new(), map);
//! load_layers(&controller.sync_layers()).await;
//!
//! let selection = Arc::new(RwLock::new(SelectionState::new()));
//! let presenter = Arc::new(RwLock::new(SelectionPresenter::new()));
//! let subscriber = presenter.clone();
//! selection
//!     .write()
//!     .on_change(move |selected| subscriber.write().update(selected));
//!
//! let selector = SpatialSelector::new(selection);
//! // Feed the selector with `SelectorEvent`s from the rendering engine.
//! # Ok(())
//! # }
//! ```

pub mod capabilities;
pub mod catalog;
mod color;
pub mod control;
pub mod controller;
pub mod error;
pub mod layer;
pub mod map;
mod platform;
pub mod selection;
pub mod view;

pub use color::Color;
pub use error::Error;
pub use view::ViewState;
