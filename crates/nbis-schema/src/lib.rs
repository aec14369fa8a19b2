//! # nbis-schema: Configuration Schema Engine
//!
//! Reads a declarative configuration schema (a JSON Schema Draft 7 document
//! written in YAML), validates configuration data against it, and
//! materializes a schema into a concrete configuration with human-readable
//! comments.
//!
//! ## Schema Model (`model`, `property`)
//!
//! [`SchemaModel`] holds the schema-wide description, the `required` list and
//! an ordered tree of [`PropertyNode`]s parsed from `properties`. Declaration
//! order is kept at every level.
//!
//! ## Validation (`validate`)
//!
//! [`SchemaModel::validate`] checks a [`Config`](nbis_core::Config) with the
//! `jsonschema` crate and reports every violation in a [`ValidationError`].
//!
//! ## Materialization (`dump`, `render`, `materialize`)
//!
//! [`ConfigMaterializer`] resolves every property to its default (or
//! example), overlays root-level overrides, and renders commented YAML:
//!
//! - [`ConfigMaterializer::from_schema`]: config plus rendered text.
//! - [`ConfigMaterializer::load`]: read a configuration file; a missing
//!   file yields an empty configuration.
//! - [`ConfigMaterializer::save`]: write plain YAML.
//!
//! ## Sources (`source`)
//!
//! The schemas nbis-admin ships with are embedded as [`BundledSchema`]s;
//! [`load_config`] loads and validates a project configuration in one step.
//!
//! ## Crate Policy
//!
//! - Depends only on `nbis-core` internally.
//! - Schema errors and validation errors always reach the caller; only a
//!   missing configuration file is recovered locally.

pub mod dump;
pub mod error;
pub mod materialize;
pub mod model;
pub mod property;
pub mod render;
pub mod source;
pub mod validate;

pub use dump::{DumpEntry, DumpValue, PropertyDump};
pub use error::{LoadError, MaterializeError, SchemaError};
pub use materialize::{ConfigMaterializer, DumpFormat, Materialized};
pub use model::SchemaModel;
pub use property::{PrimitiveType, PropertyNode, TypeSpec};
pub use source::{get_schema, load_config, BundledSchema, SchemaFile, SchemaSource};
pub use validate::{ValidationError, ValidationViolations, Violation};
