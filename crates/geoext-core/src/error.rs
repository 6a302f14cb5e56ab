//! Error types for Geoext

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoextError {
    // Caller errors
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Invalid {kind} produced: {points} point(s), at least {minimum} required")]
    InvalidGeometryProduced {
        kind: &'static str,
        points: usize,
        minimum: usize,
    },

    #[error("Mixed SRIDs: source has {source_srid}, reference has {reference_srid}")]
    MixedSrids { source_srid: i32, reference_srid: i32 },

    // Reader errors
    #[error("Unparseable {format} input: {reason}")]
    UnparseableInput { format: &'static str, reason: String },

    #[error("Input appears to be {detected} but {detected} is being filtered")]
    FilteredType { detected: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeoextError {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        GeoextError::InvalidArgument { reason: reason.into() }
    }

    pub(crate) fn unparseable(format: &'static str, reason: impl Into<String>) -> Self {
        GeoextError::UnparseableInput { format, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, GeoextError>;
