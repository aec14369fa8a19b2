//! # nbis-core: Foundational Types for nbis-admin
//!
//! This crate holds the data model shared by the schema engine and the
//! command-line tool. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One value tree.** Configuration data is a [`Config`]: an
//!    insertion-ordered mapping from property name to `serde_json::Value`.
//!    Scalars, nested mappings and lists are the variants of that one sum
//!    type; there is no duck-typed inspection of loosely typed data.
//!
//! 2. **Explicit access, no attribute injection.** Nested values are reached
//!    through [`Config::get_path`] with dotted paths (`webexport.url`) or the
//!    typed [`Config::get_as`]. Key lookup and path lookup always agree.
//!
//! 3. **Order is part of the contract.** Keys keep the order in which they
//!    were declared or loaded, so a configuration written back to disk reads
//!    in the same order as its schema.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `nbis-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod yaml;

pub use config::Config;
pub use error::ConfigError;
pub use yaml::{parse_yaml_str, yaml_to_json_value};
