//! # Error Types
//!
//! Errors raised while reading, writing, or querying configuration data.
//!
//! ## Design
//!
//! - A missing configuration file is its own variant ([`ConfigError::NotFound`])
//!   so callers can recover from it locally while malformed content keeps
//!   propagating as [`ConfigError::Parse`].
//! - Every variant that concerns a file names the path.

use std::path::PathBuf;

use thiserror::Error;

/// Error in configuration loading, saving, or lookup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The configuration content is not valid YAML.
    #[error("cannot parse configuration '{source_name}': {reason}")]
    Parse {
        /// File path or other description of where the content came from.
        source_name: String,
        /// Parser message.
        reason: String,
    },

    /// The top-level value is not a mapping.
    #[error("configuration must be a mapping at the top level, found {found}")]
    NotAMapping {
        /// Kind of value that was found instead.
        found: &'static str,
    },

    /// A requested key path is absent.
    #[error("configuration key '{path}' is not set")]
    MissingKey {
        /// Dotted key path.
        path: String,
    },

    /// A value exists but cannot be converted to the requested type.
    #[error("configuration key '{path}' has an unexpected type: {reason}")]
    TypeMismatch {
        /// Dotted key path.
        path: String,
        /// Conversion error message.
        reason: String,
    },

    /// The value tree could not be serialized.
    #[error("cannot serialize configuration: {0}")]
    Serialize(String),

    /// IO error while reading or writing a configuration file.
    #[error("io error on '{}': {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// IO error on an open reader or writer.
    #[error("io error on {stream}: {source}")]
    StreamIo {
        /// Which side failed, `reader` or `writer`.
        stream: &'static str,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Returns true for the recoverable missing-file case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound { .. })
    }
}
