use thiserror::Error;

/// Prefix used when a field's `Serialize` impl fails while it is being read.
pub const ERROR_INVOKING_GETTER: &str = "Could not get value for method: ";

/// Prefix used by the single-level checker for the same failure.
pub const PROPERTY_READ_ERROR: &str = "Could not read value for property:";

/// Structural failures. These abort a check; empty values never end up here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not get value for method: {property} ({message})")]
    PropertyRead { property: String, message: String },

    #[error("Could not read value for property:{property} ({message})")]
    FieldRead { property: String, message: String },

    #[error("value nesting exceeds the depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    #[error("invalid rules at {path}: {message}")]
    InvalidRules { path: String, message: String },

    /// A `Serialize` impl failed outside of any named field (e.g. at the root).
    #[error("failed to capture value: {0}")]
    Capture(String),
}

impl serde::ser::Error for Error {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Error::Capture(msg.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
