//! Error types used by the crate.

use thiserror::Error;

/// Mirador error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure or non-success HTTP status.
    #[error("failed to load data")]
    Network,
    /// The capabilities document is not well-formed.
    #[error("malformed capabilities document: {0}")]
    Parse(String),
    /// A feature collection could not be decoded.
    #[error("failed to decode feature collection: {0}")]
    Decoding(String),
}

impl From<reqwest::Error> for Error {
    fn from(_value: reqwest::Error) -> Self {
        Self::Network
    }
}

impl From<quick_xml::Error> for Error {
    fn from(value: quick_xml::Error) -> Self {
        Self::Parse(value.to_string())
    }
}

impl From<geojson::Error> for Error {
    fn from(value: geojson::Error) -> Self {
        Self::Decoding(value.to_string())
    }
}
