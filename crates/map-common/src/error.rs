//! Error types for map generation.

use thiserror::Error;

/// Result type alias using MapError.
pub type MapResult<T> = Result<T, MapError>;

/// Primary error type for map generation.
#[derive(Debug, Error)]
pub enum MapError {
    // === Map Definition Errors ===
    #[error("Invalid extent: {0}")]
    InvalidExtent(String),

    #[error("Location '{name}' at ({lon}, {lat}) lies outside the map extent")]
    LocationOutOfExtent { name: String, lon: f64, lat: f64 },

    #[error("Duplicate location name: {0}")]
    DuplicateLocation(String),

    #[error("Route endpoint '{0}' does not name a location")]
    UnknownRouteEndpoint(String),

    // === Feature Layer Errors ===
    #[error("Invalid GeoJSON in layer '{layer}': {message}")]
    FeatureParse { layer: String, message: String },

    // === Rendering Errors ===
    #[error("Font error: {0}")]
    FontError(String),

    #[error("Canvas error: {0}")]
    CanvasError(String),

    #[error("PNG encoding failed: {0}")]
    EncodeError(String),

    // === Infrastructure Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MapError {
    /// True when the error comes from the map definition rather than the
    /// rendering or output stage.
    pub fn is_definition_error(&self) -> bool {
        matches!(
            self,
            MapError::InvalidExtent(_)
                | MapError::LocationOutOfExtent { .. }
                | MapError::DuplicateLocation(_)
                | MapError::UnknownRouteEndpoint(_)
        )
    }
}
