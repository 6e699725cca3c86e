//! Error types for message templating

use thiserror::Error;

use crate::diagnostic::Severity;

/// Result type for templating operations
pub type Result<T> = std::result::Result<T, PlangError>;

/// Templating errors
#[derive(Error, Debug)]
pub enum PlangError {
    #[error("Invalid key {key}: {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Index overflow: cannot bind {count} values after index {offset}")]
    IndexOverflow { offset: usize, count: usize },

    #[error("Language identifier \"{actual}\" must be equal to registry's language identifier \"{expected}\"")]
    LanguageMismatch { expected: String, actual: String },

    #[error("Message not found: {key} in language {language}")]
    NotFound { key: String, language: String },

    #[error("Unresolved placeholder {name} ({severity}): {message}")]
    UnresolvedPlaceholder {
        name: String,
        severity: Severity,
        message: String,
    },

    #[error("Type mismatch for placeholder {name} ({severity}): {message}")]
    TypeMismatch {
        name: String,
        severity: Severity,
        message: String,
    },

    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl PlangError {
    /// Error for a negative positional index
    pub fn negative_index(index: i64) -> Self {
        Self::InvalidKey {
            key: index.to_string(),
            reason: "index must not be negative".to_string(),
        }
    }

    /// Error for an empty registry key
    pub fn empty_key() -> Self {
        Self::InvalidKey {
            key: String::new(),
            reason: "key cannot be empty".to_string(),
        }
    }
}
