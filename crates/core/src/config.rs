//! TOML-based configuration for pomerge.
//!
//! The file is optional. Every field has a default, and command-line flags
//! override whatever the file says.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ConfigError;

/// Tracing levels accepted in `logging.level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level tool configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Resolution behaviour.
    #[serde(default)]
    pub resolve: ResolveConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Resolve
// ---------------------------------------------------------------------------

/// Conflict resolution settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Leave the `fuzzy` flag on resolved records (default false).
    #[serde(default)]
    pub keep_fuzzy: bool,

    /// Fail the run when any conflicted record has no variant for the
    /// requested label (default false).
    #[serde(default)]
    pub strict: bool,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl ToolConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: ToolConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Validate semantic constraints that TOML parsing cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".into(),
                detail: format!(
                    "unknown level '{}', expected one of: {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }
        Ok(())
    }

    /// Convenience: load and validate in one call.
    pub fn load_and_validate<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/pomerge/config.toml`, when the platform has a config
    /// directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pomerge").join("config.toml"))
    }

    /// Load the file at [`ToolConfig::default_path`] if it exists, otherwise
    /// fall back to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_and_validate(path),
            _ => {
                debug!("no configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_toml() -> &'static str {
        r#"
[resolve]
keep_fuzzy = true
strict = true

[logging]
level = "debug"
"#
    }

    #[test]
    fn test_parse_full_config() {
        let config: ToolConfig = toml::from_str(sample_toml()).unwrap();
        assert!(config.resolve.keep_fuzzy);
        assert!(config.resolve.strict);
        assert_eq!(config.logging.level, "debug");
        config.validate().unwrap();
    }

    #[test]
    fn test_defaults_apply() {
        let config: ToolConfig = toml::from_str("").unwrap();
        assert_eq!(config, ToolConfig::default());
        assert!(!config.resolve.keep_fuzzy);
        assert!(!config.resolve.strict);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_partial_section() {
        let config: ToolConfig = toml::from_str("[resolve]\nstrict = true\n").unwrap();
        assert!(config.resolve.strict);
        assert!(!config.resolve.keep_fuzzy);
    }

    #[test]
    fn test_validate_rejects_unknown_level() {
        let mut config = ToolConfig::default();
        config.logging.level = "loud".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));

        config.logging.level = "INFO".into();
        config.validate().unwrap();
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, sample_toml()).unwrap();

        let config = ToolConfig::load_and_validate(&path).unwrap();
        assert!(config.resolve.keep_fuzzy);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ToolConfig::load_from_file("/nonexistent/pomerge.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[resolve\nkeep_fuzzy = ").unwrap();

        let result = ToolConfig::load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
