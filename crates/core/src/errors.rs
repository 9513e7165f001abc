//! Error types for the pomerge core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them for callers that want a single
//! error type.

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Catalog errors
// ---------------------------------------------------------------------------

/// Errors from reading or writing PO catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read or written.
    #[error("catalog I/O error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog text is not valid PO syntax.
    #[error("PO parse error in '{}' at line {line}: {detail}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        detail: String,
    },
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Conflict errors
// ---------------------------------------------------------------------------

/// Errors from the conflict resolution subsystem.
///
/// Per-record problems (a label with no matching variant) are not errors;
/// they are tallied in the resolve report.
#[derive(Debug, Error)]
pub enum ConflictError {
    /// The revision label was empty.
    #[error("revision label must not be empty")]
    EmptyLabel,

    /// The variant pattern built from the label was rejected by the regex
    /// engine (for instance a label too large for its limits).
    #[error("invalid variant pattern: {0}")]
    InvalidPattern(String),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = CatalogError::Parse {
            path: PathBuf::from("fr.po"),
            line: 12,
            detail: "unknown keyword 'msgfoo'".into(),
        };
        assert_eq!(
            err.to_string(),
            "PO parse error in 'fr.po' at line 12: unknown keyword 'msgfoo'"
        );

        let err = ConflictError::EmptyLabel;
        assert_eq!(err.to_string(), "revision label must not be empty");

        let err = ConfigError::InvalidValue {
            field: "logging.level".into(),
            detail: "unknown level 'loud'".into(),
        };
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_io_error_keeps_path_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = CatalogError::io("/tmp/missing.po", io);
        assert!(err.to_string().contains("/tmp/missing.po"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_core_error_from_subsystem() {
        let core_err: CoreError = ConflictError::EmptyLabel.into();
        assert!(matches!(core_err, CoreError::Conflict(_)));

        let core_err: CoreError = ConfigError::FileNotFound("x.toml".into()).into();
        assert!(matches!(core_err, CoreError::Config(_)));
    }
}
