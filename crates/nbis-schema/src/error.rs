//! # Error Types: Schema Engine
//!
//! Schema errors and materialization errors are kept apart from validation
//! errors ([`crate::validate::ValidationError`]) so that each reaches the
//! caller as the kind it is. [`LoadError`] is a transparent union used where
//! one operation can fail in more than one of those ways.

use std::path::PathBuf;

use nbis_core::ConfigError;
use thiserror::Error;

use crate::validate::ValidationError;

/// The schema document itself is unusable.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The document failed JSON Schema (Draft 7) self-validation.
    #[error("invalid schema '{schema_name}': {reason}")]
    Invalid {
        /// Schema name or source description.
        schema_name: String,
        /// Message from the meta-schema check.
        reason: String,
    },

    /// The document has a shape the property parser cannot interpret.
    #[error("malformed schema at '{path}': {reason}")]
    Malformed {
        /// Dotted path of the offending property (`(root)` for the document).
        path: String,
        /// What was wrong.
        reason: String,
    },

    /// The schema source could not be read or decoded.
    #[error("schema load error for '{schema_name}': {reason}")]
    Load {
        /// Schema name or file path.
        schema_name: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },
}

/// Rendering or writing a materialized configuration failed.
#[derive(Error, Debug)]
pub enum MaterializeError {
    /// The destination file already exists and was left untouched.
    #[error("{} exists; not overwriting", path.display())]
    AlreadyExists {
        /// Destination path.
        path: PathBuf,
    },

    /// A value cannot be expressed in the tabular output mode.
    #[error("property '{key}' cannot be written as a table column: {reason}")]
    NotTabular {
        /// Root-level key holding the value.
        key: String,
        /// Why the value does not fit.
        reason: String,
    },

    /// A value could not be rendered as YAML.
    #[error("cannot render property '{key}': {reason}")]
    Render {
        /// Key of the value being rendered.
        key: String,
        /// Serializer message.
        reason: String,
    },

    /// Writing the rendered text failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while loading and checking a configuration in one step.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The schema could not be obtained.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The configuration does not satisfy the schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The configuration file could not be read.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
