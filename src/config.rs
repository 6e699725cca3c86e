//! Configuration management for plang
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (plang.toml)
//! - Environment variables (PLANG__*)
//!
//! ## Example config file (plang.toml):
//! ```toml
//! [lexer]
//! opening = "${"
//! closing = "}"
//! trim_whitespace = true
//!
//! [lexicon]
//! case_sensitive = false
//!
//! [binder]
//! case_sensitive = false
//!
//! [errors]
//! raise_at = "issue"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::diagnostic::Severity;
use crate::error::Result;
use crate::lexer::{DEFAULT_CLOSING, DEFAULT_OPENING};

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlangConfig {
    /// Placeholder delimiters
    #[serde(default)]
    pub lexer: LexerConfig,

    /// Placeholder name lookup
    #[serde(default)]
    pub lexicon: LexiconConfig,

    /// Binder key policy
    #[serde(default)]
    pub binder: BinderConfig,

    /// Default error handler
    #[serde(default)]
    pub errors: ErrorConfig,
}

/// Lexer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexerConfig {
    #[serde(default = "default_opening")]
    pub opening: String,

    #[serde(default = "default_closing")]
    pub closing: String,

    /// Trim whitespace around extracted placeholder names
    #[serde(default)]
    pub trim_whitespace: bool,
}

/// Lexicon configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexiconConfig {
    #[serde(default)]
    pub case_sensitive: bool,
}

/// Binder configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BinderConfig {
    #[serde(default)]
    pub case_sensitive: bool,
}

/// Error handling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorConfig {
    /// Lowest severity the default handler raises instead of logging
    #[serde(default = "default_raise_at")]
    pub raise_at: Severity,
}

// Default value functions
fn default_opening() -> String {
    DEFAULT_OPENING.to_string()
}

fn default_closing() -> String {
    DEFAULT_CLOSING.to_string()
}

fn default_raise_at() -> Severity {
    Severity::Issue
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            opening: default_opening(),
            closing: default_closing(),
            trim_whitespace: false,
        }
    }
}

impl Default for ErrorConfig {
    fn default() -> Self {
        Self {
            raise_at: default_raise_at(),
        }
    }
}

impl PlangConfig {
    /// Load configuration from default locations
    pub fn load() -> std::result::Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from default locations plus a specific file
    pub fn load_from(config_path: Option<&str>) -> std::result::Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["plang.toml", ".plang.toml", "config/plang.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "plang", "plang") {
            let xdg_config = config_dir.config_dir().join("plang.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // PLANG__LEXER__OPENING and friends
        builder = builder.add_source(
            Environment::with_prefix("PLANG")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlangConfig::default();
        assert_eq!(config.lexer.opening, "{");
        assert_eq!(config.lexer.closing, "}");
        assert!(!config.lexicon.case_sensitive);
        assert!(!config.binder.case_sensitive);
        assert_eq!(config.errors.raise_at, Severity::Issue);
    }

    #[test]
    fn test_serialize_config() {
        let config = PlangConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[lexer]"));
        assert!(toml_str.contains("[errors]"));
        assert!(toml_str.contains("raise_at = \"issue\""));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[lexer]\nopening = \"<%\"\nclosing = \"%>\"\n\n[errors]\nraise_at = \"warning\"\n",
        )
        .unwrap();

        let config = PlangConfig::load_from(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.lexer.opening, "<%");
        assert_eq!(config.lexer.closing, "%>");
        assert!(!config.lexer.trim_whitespace);
        assert_eq!(config.errors.raise_at, Severity::Warning);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(PlangConfig::load_from(Some(path.to_str().unwrap())).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");

        let mut config = PlangConfig::default();
        config.lexer.trim_whitespace = true;
        config.binder.case_sensitive = true;
        config.save(&path).unwrap();

        let reloaded = PlangConfig::load_from(Some(path.to_str().unwrap())).unwrap();
        assert!(reloaded.lexer.trim_whitespace);
        assert!(reloaded.binder.case_sensitive);
    }
}
