//! Domain-specific error types for the installer helpers.
//!
//! Filesystem operations return [`anyhow::Result`] with path context, the way
//! an installer surfaces them to its operator. The typed errors below cover
//! the cases a caller is expected to inspect:
//!
//! ```text
//! RcFileError: per-field resource-file rewrite failures
//! ConfigError: field schema loading and validation
//! ```

use thiserror::Error;

/// Errors reported for a single field during a resource-file rewrite.
///
/// These never abort the rewrite of the remaining fields; they are returned
/// inside [`FieldOutcome::Failed`](crate::rcfile::FieldOutcome::Failed).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RcFileError {
    /// The field name contains characters a resource-file key cannot hold.
    #[error("invalid field name '{0}': expected letters, digits, '_' or '-'")]
    InvalidFieldName(String),

    /// The search pattern built for the field did not compile.
    #[error("invalid search pattern for field '{field}': {source}")]
    Pattern {
        /// Field whose pattern failed.
        field: String,
        /// Underlying regex error.
        source: regex::Error,
    },
}

/// Errors that arise from loading the resource-file field schema.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A field rule is inconsistent (e.g. an anchored layout without sentinel).
    #[error("invalid rule for field '{field}': {reason}")]
    InvalidRule {
        /// Field the rule belongs to.
        field: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The schema file is not valid TOML for the expected shape.
    #[error("invalid schema in {file}: {source}")]
    Parse {
        /// Path (or label) of the offending content.
        file: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// An I/O error occurred while reading the schema file.
    #[error("IO error reading schema file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
