//! Error types for the event grep crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// A configured pattern string is not a valid regular expression.
    #[error("Invalid regex pattern for field '{field}': {pattern} ({reason})")]
    InvalidRegex {
        field: String,
        pattern: String,
        reason: String,
    },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("YAML parsing error: {0}")]
    YamlError(String),
    #[error("JSON parsing error: {0}")]
    JsonError(String),
    #[error("IO error: {0}")]
    IoError(String),
    /// A stored field value is neither a scalar nor a sequence of scalars.
    #[error("Invalid field shape for '{field}': found {found}")]
    InvalidFieldShape { field: String, found: String },
}

impl FilterError {
    /// Whether this error belongs to the construction-time (configuration) kind.
    ///
    /// Everything except [`FilterError::InvalidFieldShape`] can only be raised while
    /// building a filter.
    pub fn is_config_error(&self) -> bool {
        !matches!(self, FilterError::InvalidFieldShape { .. })
    }
}

impl From<std::io::Error> for FilterError {
    fn from(err: std::io::Error) -> Self {
        FilterError::IoError(err.to_string())
    }
}

impl From<serde_yaml::Error> for FilterError {
    fn from(err: serde_yaml::Error) -> Self {
        FilterError::YamlError(err.to_string())
    }
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::JsonError(err.to_string())
    }
}
