//! # Property Nodes
//!
//! Typed view of the `properties` section of a schema document.
//!
//! ## Parsing
//!
//! [`parse_properties`] walks a `properties` mapping depth-first in
//! declared order. A definition that carries its own `properties` key is an
//! object node: the nested mapping is parsed one level deeper and attached
//! as its children. Everything else is a leaf. The source order is never
//! re-sorted; the rendered configuration file shows properties in exactly
//! the order the schema declares them.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::SchemaError;

/// JSON Schema primitive type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

impl PrimitiveType {
    /// Parse a JSON Schema type name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    /// The type name as written in a schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared `type` of a schema node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeSpec {
    /// No `type` key: any value is accepted.
    #[default]
    Unspecified,
    /// A single type name.
    Single(PrimitiveType),
    /// A list of type names; `null` in the list makes the value nullable.
    Union(Vec<PrimitiveType>),
}

impl TypeSpec {
    /// Interpret the `type` value of a definition found at `path`.
    pub fn parse(value: Option<&Value>, path: &str) -> Result<Self, SchemaError> {
        let unknown = |name: &str| SchemaError::Malformed {
            path: path.to_string(),
            reason: format!("unknown type '{name}'"),
        };
        match value {
            None => Ok(Self::Unspecified),
            Some(Value::String(name)) => PrimitiveType::parse(name)
                .map(Self::Single)
                .ok_or_else(|| unknown(name)),
            Some(Value::Array(names)) => {
                let mut types = Vec::with_capacity(names.len());
                for name in names {
                    let name = name.as_str().ok_or_else(|| SchemaError::Malformed {
                        path: path.to_string(),
                        reason: format!("type list entries must be strings, found {name}"),
                    })?;
                    types.push(PrimitiveType::parse(name).ok_or_else(|| unknown(name))?);
                }
                Ok(Self::Union(types))
            }
            Some(other) => Err(SchemaError::Malformed {
                path: path.to_string(),
                reason: format!("type must be a string or a list of strings, found {other}"),
            }),
        }
    }

    /// Returns true if `null` is an accepted value.
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Unspecified => true,
            Self::Single(t) => *t == PrimitiveType::Null,
            Self::Union(types) => types.contains(&PrimitiveType::Null),
        }
    }

    /// Returns true if the declared type names `object`.
    pub fn names_object(&self) -> bool {
        match self {
            Self::Unspecified => false,
            Self::Single(t) => *t == PrimitiveType::Object,
            Self::Union(types) => types.contains(&PrimitiveType::Object),
        }
    }
}

/// One named property of a schema, with its nested children.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyNode {
    /// Property name (mapping key).
    pub name: String,
    /// Nesting depth, 0 for root-level properties.
    pub level: usize,
    /// Description collapsed to a single line.
    pub description: String,
    /// Declared type.
    pub type_spec: TypeSpec,
    /// Declared default, `Value::Null` when absent.
    pub default: Value,
    /// Declared example, if any.
    pub example: Option<Value>,
    /// Child properties of an object node, in declared order.
    pub children: Vec<PropertyNode>,
    /// Set when the definition carried a `properties` key.
    pub is_object: bool,
}

impl PropertyNode {
    /// The default as it appears in a rendered file.
    pub fn default_literal(&self) -> String {
        match &self.default {
            Value::Null => "null".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// The value used when materializing: the example when requested and
    /// declared, otherwise the default.
    pub fn resolved_value(&self, use_examples: bool) -> &Value {
        match (&self.example, use_examples) {
            (Some(example), true) => example,
            _ => &self.default,
        }
    }

    /// Dotted path of this node given its parent's path.
    fn child_path(parent: &str, name: &str) -> String {
        if parent.is_empty() {
            name.to_string()
        } else {
            format!("{parent}.{name}")
        }
    }
}

/// Collapse line breaks and runs of whitespace into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a `properties` mapping into property nodes, preserving order.
pub fn parse_properties(
    properties: &Map<String, Value>,
    level: usize,
) -> Result<Vec<PropertyNode>, SchemaError> {
    parse_properties_at(properties, level, "")
}

fn parse_properties_at(
    properties: &Map<String, Value>,
    level: usize,
    parent_path: &str,
) -> Result<Vec<PropertyNode>, SchemaError> {
    let mut nodes = Vec::with_capacity(properties.len());
    for (name, definition) in properties {
        let path = PropertyNode::child_path(parent_path, name);
        let node = match definition {
            Value::Object(def) => parse_definition(name, def, level, &path)?,
            // `true`/`false` are valid schemas that constrain nothing useful here.
            Value::Bool(_) => PropertyNode {
                name: name.clone(),
                level,
                description: String::new(),
                type_spec: TypeSpec::Unspecified,
                default: Value::Null,
                example: None,
                children: Vec::new(),
                is_object: false,
            },
            other => {
                return Err(SchemaError::Malformed {
                    path,
                    reason: format!("property definition must be a mapping, found {other}"),
                })
            }
        };
        nodes.push(node);
    }
    Ok(nodes)
}

fn parse_definition(
    name: &str,
    def: &Map<String, Value>,
    level: usize,
    path: &str,
) -> Result<PropertyNode, SchemaError> {
    let description = match def.get("description") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => collapse_whitespace(s),
        Some(other) => {
            return Err(SchemaError::Malformed {
                path: path.to_string(),
                reason: format!("description must be a string, found {other}"),
            })
        }
    };
    let type_spec = TypeSpec::parse(def.get("type"), path)?;

    let (children, is_object) = match def.get("properties") {
        Some(Value::Object(nested)) => (parse_properties_at(nested, level + 1, path)?, true),
        Some(other) => {
            return Err(SchemaError::Malformed {
                path: path.to_string(),
                reason: format!("properties must be a mapping, found {other}"),
            })
        }
        None => (Vec::new(), false),
    };

    Ok(PropertyNode {
        name: name.to_string(),
        level,
        description,
        type_spec,
        default: def.get("default").cloned().unwrap_or(Value::Null),
        example: def.get("example").cloned(),
        children,
        is_object,
    })
}
