//! Error types for solar map operations.

use thiserror::Error;

/// Result type alias using SolarError.
pub type SolarResult<T> = Result<T, SolarError>;

/// Primary error type for map construction, plotting and overlays.
#[derive(Debug, Error)]
pub enum SolarError {
    // === Plot configuration errors ===
    #[error("Cannot manually specify {bound}, please specify the norm {bound} instead")]
    NormConflict { bound: &'static str },

    #[error("{operation} requires the axes to be WCSAxes")]
    NotWcsAxes { operation: &'static str },

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Map data errors ===
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Invalid header keyword {keyword}: {message}")]
    InvalidHeader { keyword: String, message: String },

    #[error("Missing header keyword: {0}")]
    MissingHeader(String),

    #[error("Invalid observation time: {0}")]
    InvalidTime(String),

    // === Coordinate errors ===
    #[error("Coordinate frame {found} is incompatible with {expected}")]
    IncompatibleFrame { expected: String, found: String },

    #[error("Projection error: {0}")]
    ProjectionError(String),

    // === Rendering errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("Unknown colormap: {0}")]
    UnknownColormap(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl SolarError {
    /// Shorthand for an [`SolarError::InvalidParameter`].
    pub fn invalid(param: impl Into<String>, message: impl Into<String>) -> Self {
        SolarError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Whether the caller can fix this by changing plot arguments.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SolarError::NormConflict { .. }
                | SolarError::NotWcsAxes { .. }
                | SolarError::InvalidParameter { .. }
        )
    }
}

impl From<std::io::Error> for SolarError {
    fn from(err: std::io::Error) -> Self {
        SolarError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SolarError {
    fn from(err: serde_json::Error) -> Self {
        SolarError::InvalidParameter {
            param: "json".to_string(),
            message: err.to_string(),
        }
    }
}
