//! # Schema Sources
//!
//! Where schema documents come from. The two schemas nbis-admin ships with
//! are compiled into the binary; any other schema can be read from disk.
//!
//! [`load_config`] ties a source, an optional configuration file and
//! optional in-memory data together into one validated [`Config`].

use std::path::{Path, PathBuf};

use nbis_core::{parse_yaml_str, Config};
use serde_json::Value;

use crate::error::{LoadError, SchemaError};
use crate::materialize::ConfigMaterializer;
use crate::model::SchemaModel;

/// Supplies a raw schema document.
pub trait SchemaSource {
    /// Name shown in messages, typically a file name.
    fn name(&self) -> String;

    /// Read and decode the schema document.
    fn load_document(&self) -> Result<Value, SchemaError>;
}

/// Schemas bundled with nbis-admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundledSchema {
    /// Project configuration (`<project>.yaml`).
    Configuration,
    /// Snakemake workflow profile (`config.yaml` in a profile directory).
    SnakemakeProfile,
}

impl BundledSchema {
    /// All bundled schemas.
    pub const ALL: [BundledSchema; 2] = [Self::Configuration, Self::SnakemakeProfile];

    /// Resource path of the schema inside the crate.
    pub fn resource_path(&self) -> &'static str {
        match self {
            Self::Configuration => "schemas/config.schema.yaml",
            Self::SnakemakeProfile => "schemas/profile.schema.yaml",
        }
    }

    /// The embedded schema text.
    pub fn contents(&self) -> &'static str {
        match self {
            Self::Configuration => include_str!("../schemas/config.schema.yaml"),
            Self::SnakemakeProfile => include_str!("../schemas/profile.schema.yaml"),
        }
    }
}

impl SchemaSource for BundledSchema {
    fn name(&self) -> String {
        self.resource_path().to_string()
    }

    fn load_document(&self) -> Result<Value, SchemaError> {
        parse_yaml_str(self.contents()).map_err(|reason| SchemaError::Load {
            schema_name: self.name(),
            reason,
        })
    }
}

/// A schema read from a YAML or JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFile(pub PathBuf);

impl SchemaFile {
    /// Point at a schema file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }
}

impl SchemaSource for SchemaFile {
    fn name(&self) -> String {
        self.0.display().to_string()
    }

    fn load_document(&self) -> Result<Value, SchemaError> {
        let content = std::fs::read_to_string(&self.0).map_err(|e| SchemaError::Load {
            schema_name: self.name(),
            reason: format!("cannot read file: {e}"),
        })?;

        let ext = self.0.extension().and_then(|e| e.to_str()).unwrap_or("");
        let parsed = match ext {
            "json" => serde_json::from_str(&content).map_err(|e| format!("invalid JSON: {e}")),
            _ => parse_yaml_str(&content),
        };
        parsed.map_err(|reason| SchemaError::Load {
            schema_name: self.name(),
            reason,
        })
    }
}

/// Build a [`SchemaModel`] from a bundled schema.
pub fn get_schema(schema: BundledSchema) -> Result<SchemaModel, SchemaError> {
    SchemaModel::from_source(&schema)
}

/// Load a configuration and optionally validate it.
///
/// Starts from `data` (or an empty configuration), overlays the root-level
/// keys of `file` when given, and validates the result against the schema
/// from `source` when `validate` is set. A missing `file` is tolerated with
/// a warning; malformed content is an error.
///
/// # Errors
///
/// Returns [`LoadError::Schema`] if the schema cannot be built,
/// [`LoadError::Config`] if the file cannot be parsed, and
/// [`LoadError::Validation`] if the result violates the schema.
pub fn load_config(
    file: Option<&Path>,
    data: Option<Config>,
    source: &dyn SchemaSource,
    validate: bool,
) -> Result<Config, LoadError> {
    let schema = SchemaModel::from_source(source)?;
    let mut config = data.unwrap_or_default();
    if let Some(path) = file {
        config.extend(ConfigMaterializer::load(path)?);
    }
    if validate {
        schema.validate(&config)?;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bundled_schemas_build() {
        for bundled in BundledSchema::ALL {
            let schema = get_schema(bundled).unwrap();
            assert!(!schema.properties().is_empty(), "{} has no properties", bundled.name());
            assert!(!schema.description().is_empty());
        }
    }

    #[test]
    fn test_configuration_requires_project_name() {
        let schema = get_schema(BundledSchema::Configuration).unwrap();
        assert!(schema.required().iter().any(|r| r == "project_name"));
    }

    #[test]
    fn test_bundled_defaults_validate() {
        for bundled in BundledSchema::ALL {
            let schema = get_schema(bundled).unwrap();
            for use_examples in [false, true] {
                let conf = schema.dump_properties(use_examples).to_config();
                schema
                    .validate(&conf)
                    .unwrap_or_else(|e| panic!("{} (examples={use_examples}): {e}", bundled.name()));
            }
        }
    }

    #[test]
    fn test_schema_file_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("s.schema.yaml");
        std::fs::write(&yaml, "properties:\n  a:\n    default: 1\n").unwrap();
        let json_path = dir.path().join("s.schema.json");
        std::fs::write(&json_path, r#"{"properties": {"b": {"default": 2}}}"#).unwrap();

        let a = SchemaModel::from_source(&SchemaFile::new(&yaml)).unwrap();
        assert_eq!(a.properties()[0].name, "a");
        let b = SchemaModel::from_source(&SchemaFile::new(&json_path)).unwrap();
        assert_eq!(b.properties()[0].default, json!(2));
    }

    #[test]
    fn test_schema_file_missing() {
        let err = SchemaFile::new("/nonexistent/x.schema.yaml")
            .load_document()
            .unwrap_err();
        assert!(matches!(err, SchemaError::Load { .. }));
    }

    #[test]
    fn test_load_config_file_overrides_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project_foo.yaml");
        std::fs::write(&path, "project_name: project_foo\n").unwrap();

        let data = Config::try_from(json!({"project_name": "nbis-admin"})).unwrap();
        let conf = load_config(
            Some(&path),
            Some(data),
            &BundledSchema::Configuration,
            true,
        )
        .unwrap();
        assert_eq!(conf.get("project_name"), Some(&json!("project_foo")));
    }

    #[test]
    fn test_load_config_missing_file_uses_data() {
        let data = Config::try_from(json!({"project_name": "nbis-admin"})).unwrap();
        let conf = load_config(
            Some(Path::new("/nonexistent/project.yaml")),
            Some(data),
            &BundledSchema::Configuration,
            true,
        )
        .unwrap();
        assert_eq!(conf.get("project_name"), Some(&json!("nbis-admin")));
    }

    #[test]
    fn test_load_config_validation_failure() {
        let err = load_config(None, None, &BundledSchema::Configuration, true).unwrap_err();
        match err {
            LoadError::Validation(e) => assert!(e.mentions("project_name")),
            other => panic!("expected validation error, got: {other}"),
        }
    }

    #[test]
    fn test_load_config_without_validation() {
        let conf = load_config(None, None, &BundledSchema::Configuration, false).unwrap();
        assert!(conf.is_empty());
    }
}
