//! Error types for the simulation core.

use std::fmt;

/// Result type for simulation core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or building the simulation.
#[derive(Debug)]
pub enum Error {
    /// A configuration value is out of range.
    Config {
        /// The offending field, as `section.field`.
        field: &'static str,
        /// Why the value was rejected.
        detail: String,
    },
    /// Heightfield data is malformed.
    Heightfield {
        /// Description of what was invalid.
        detail: String,
    },
    /// The skybox image cannot be sliced into cube faces.
    Skybox {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
        /// Description of what was invalid.
        detail: String,
    },
    /// A JSON config file failed to parse.
    Json(serde_json::Error),
}

impl Error {
    pub(crate) fn config(field: &'static str, detail: impl Into<String>) -> Self {
        Error::Config {
            field,
            detail: detail.into(),
        }
    }

    pub(crate) fn heightfield(detail: impl Into<String>) -> Self {
        Error::Heightfield {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config { field, detail } => write!(f, "invalid config {field}: {detail}"),
            Error::Heightfield { detail } => write!(f, "invalid heightfield: {detail}"),
            Error::Skybox {
                width,
                height,
                detail,
            } => write!(f, "cannot slice {width}x{height} skybox image: {detail}"),
            Error::Json(e) => write!(f, "failed to parse config: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}
