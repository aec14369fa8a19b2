//! # Schema Model
//!
//! In-memory form of a configuration schema: the schema-wide description,
//! the `required` list, the ordered property tree, and a compiled Draft 7
//! validator.
//!
//! ## Construction
//!
//! [`SchemaModel::new`] takes an already decoded document. `None` stands for
//! "no schema": it has no properties and accepts every configuration. A
//! document is checked against the Draft 7 meta-schema and then parsed into
//! [`PropertyNode`]s; either step failing is a [`SchemaError`].
//!
//! The model is immutable after construction and holds no reference to the
//! configurations it validates.

use std::fmt;

use jsonschema::Validator;
use nbis_core::{parse_yaml_str, Config};
use serde_json::Value;

use crate::dump::PropertyDump;
use crate::error::SchemaError;
use crate::property::{collapse_whitespace, parse_properties, PropertyNode, TypeSpec};
use crate::source::SchemaSource;
use crate::validate::{self, ValidationError};

/// Name used for schemas built without a source.
const ANONYMOUS_SCHEMA: &str = "(inline)";

/// A parsed configuration schema.
pub struct SchemaModel {
    name: String,
    document: Option<Value>,
    description: String,
    required: Vec<String>,
    properties: Vec<PropertyNode>,
    validator: Option<Validator>,
}

impl SchemaModel {
    /// Build a model from a decoded schema document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Invalid`] if the document fails the Draft 7
    /// meta-schema check and [`SchemaError::Malformed`] if its `properties`
    /// cannot be interpreted.
    pub fn new(document: Option<Value>) -> Result<Self, SchemaError> {
        Self::with_name(ANONYMOUS_SCHEMA, document)
    }

    /// Build a model and label it `name` in error messages.
    pub fn with_name(name: impl Into<String>, document: Option<Value>) -> Result<Self, SchemaError> {
        let name = name.into();
        let Some(document) = document else {
            return Ok(Self {
                name,
                document: None,
                description: String::new(),
                required: Vec::new(),
                properties: Vec::new(),
                validator: None,
            });
        };

        let root = document.as_object().ok_or_else(|| SchemaError::Malformed {
            path: "(root)".to_string(),
            reason: format!("schema document must be a mapping, found {document}"),
        })?;

        let validator = validate::compile(&document, &name).map_err(|e| {
            tracing::error!("{e}");
            e
        })?;

        let description = match root.get("description") {
            Some(Value::String(s)) => collapse_whitespace(s),
            _ => String::new(),
        };
        let required = match root.get("required") {
            Some(Value::Array(names)) => names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };
        let properties = match root.get("properties") {
            Some(Value::Object(props)) => parse_properties(props, 0)?,
            Some(other) => {
                return Err(SchemaError::Malformed {
                    path: "(root)".to_string(),
                    reason: format!("properties must be a mapping, found {other}"),
                })
            }
            None => Vec::new(),
        };

        tracing::debug!(
            schema = %name,
            properties = properties.len(),
            required = required.len(),
            "parsed schema"
        );

        Ok(Self {
            name,
            document: Some(document),
            description,
            required,
            properties,
            validator: Some(validator),
        })
    }

    /// Parse a schema written as YAML (or JSON, which is valid YAML).
    pub fn from_yaml_str(name: &str, content: &str) -> Result<Self, SchemaError> {
        let document = parse_yaml_str(content).map_err(|reason| SchemaError::Load {
            schema_name: name.to_string(),
            reason,
        })?;
        let document = match document {
            Value::Null => None,
            other => Some(other),
        };
        Self::with_name(name, document)
    }

    /// Load and parse the document supplied by `source`.
    pub fn from_source(source: &dyn SchemaSource) -> Result<Self, SchemaError> {
        let document = source.load_document()?;
        Self::with_name(source.name(), Some(document))
    }

    /// Name used in error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema-wide description on a single line.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Root-level property nodes in declared order.
    pub fn properties(&self) -> &[PropertyNode] {
        &self.properties
    }

    /// Names of properties that must be present at the top level.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// A copy of the raw schema document, `None` for the empty schema.
    pub fn document(&self) -> Option<Value> {
        self.document.clone()
    }

    /// Returns true for the "no schema" model.
    pub fn is_empty_schema(&self) -> bool {
        self.document.is_none()
    }

    /// The value an empty configuration takes under this schema: `null`
    /// when the root type admits null, otherwise an empty mapping.
    pub fn empty_value(&self) -> Value {
        let root_type = self
            .document
            .as_ref()
            .and_then(|doc| TypeSpec::parse(doc.get("type"), "(root)").ok());
        match root_type {
            Some(spec @ (TypeSpec::Single(_) | TypeSpec::Union(_))) if spec.is_nullable() => {
                Value::Null
            }
            _ => Value::Object(serde_json::Map::new()),
        }
    }

    /// Compact JSON with sorted keys; empty for the "no schema" model.
    pub fn to_compact_string(&self) -> String {
        match &self.document {
            Some(doc) => sorted(doc).to_string(),
            None => String::new(),
        }
    }

    /// Validate a configuration, returning it unchanged on success.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every violated constraint.
    pub fn validate<'a>(&self, config: &'a Config) -> Result<&'a Config, ValidationError> {
        self.validate_value(&config.to_value())?;
        Ok(config)
    }

    /// Validate an arbitrary value against the schema.
    pub fn validate_value(&self, instance: &Value) -> Result<(), ValidationError> {
        match &self.validator {
            Some(validator) => validate::check(validator, instance, &self.name).map_err(|e| {
                tracing::error!("{e}");
                e
            }),
            None => Ok(()),
        }
    }

    /// Resolve every property to its default (or example) value.
    pub fn dump_properties(&self, use_examples: bool) -> PropertyDump {
        PropertyDump::from_nodes(&self.description, &self.properties, use_examples)
    }
}

/// Copy a value with every mapping's keys sorted.
fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            Value::Object(
                keys.into_iter()
                    .map(|k| (k.clone(), sorted(&map[k])))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

impl fmt::Debug for SchemaModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaModel")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("required", &self.required)
            .field("properties", &self.properties.len())
            .finish()
    }
}

impl fmt::Display for SchemaModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.document {
            Some(doc) => {
                let pretty = serde_json::to_string_pretty(doc).map_err(|_| fmt::Error)?;
                f.write_str(&pretty)
            }
            None => f.write_str("null"),
        }
    }
}
