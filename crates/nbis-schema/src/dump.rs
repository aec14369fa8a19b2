//! # Property Dump
//!
//! The resolved value tree of a schema: every property with the value it
//! materializes to and the description that will be rendered as its
//! comment. Produced by [`crate::SchemaModel::dump_properties`] and consumed
//! by the renderer and by [`PropertyDump::to_config`].

use nbis_core::Config;
use serde_json::{Map, Value};

use crate::property::PropertyNode;

/// Resolved value of one dump entry.
#[derive(Debug, Clone, PartialEq)]
pub enum DumpValue {
    /// A concrete value (scalar, list, or a mapping supplied as a whole).
    Leaf(Value),
    /// An object-typed property, expanded into its children.
    Object(Vec<DumpEntry>),
}

/// One property with its resolved value and comment text.
#[derive(Debug, Clone, PartialEq)]
pub struct DumpEntry {
    /// Property name.
    pub name: String,
    /// Nesting depth, 0 for root-level properties.
    pub level: usize,
    /// Single-line description, empty if none.
    pub description: String,
    /// Resolved value.
    pub value: DumpValue,
}

impl DumpEntry {
    fn from_node(node: &PropertyNode, use_examples: bool) -> Self {
        let value = if node.is_object {
            DumpValue::Object(
                node.children
                    .iter()
                    .map(|child| DumpEntry::from_node(child, use_examples))
                    .collect(),
            )
        } else {
            DumpValue::Leaf(node.resolved_value(use_examples).clone())
        };
        Self {
            name: node.name.clone(),
            level: node.level,
            description: node.description.clone(),
            value,
        }
    }

    /// The plain value this entry materializes to.
    pub fn to_value(&self) -> Value {
        match &self.value {
            DumpValue::Leaf(value) => value.clone(),
            DumpValue::Object(children) => Value::Object(
                children
                    .iter()
                    .map(|child| (child.name.clone(), child.to_value()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

/// Ordered, nested dump of a schema's properties.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyDump {
    header: String,
    entries: Vec<DumpEntry>,
}

impl PropertyDump {
    /// Resolve `nodes` to values, preferring examples when `use_examples` is set.
    pub fn from_nodes(header: &str, nodes: &[PropertyNode], use_examples: bool) -> Self {
        Self {
            header: header.to_string(),
            entries: nodes
                .iter()
                .map(|node| DumpEntry::from_node(node, use_examples))
                .collect(),
        }
    }

    /// Schema-wide description rendered as the file preamble.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Root-level entries in declared order.
    pub fn entries(&self) -> &[DumpEntry] {
        &self.entries
    }

    /// Replace root-level values with those in `overrides`.
    ///
    /// A matching entry keeps its position and description; its value is
    /// replaced whole, so overrides never merge into nested objects. Keys
    /// the schema does not declare are appended without a description.
    pub fn overlay_root(&mut self, overrides: &Config) {
        for (key, value) in overrides.iter() {
            match self.entries.iter_mut().find(|entry| entry.name == key) {
                Some(entry) => entry.value = DumpValue::Leaf(value.clone()),
                None => self.entries.push(DumpEntry {
                    name: key.to_string(),
                    level: 0,
                    description: String::new(),
                    value: DumpValue::Leaf(value.clone()),
                }),
            }
        }
    }

    /// Build the configuration value tree.
    pub fn to_config(&self) -> Config {
        self.entries
            .iter()
            .map(|entry| (entry.name.clone(), entry.to_value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::parse_properties;
    use serde_json::json;

    fn dump(properties: Value, use_examples: bool) -> PropertyDump {
        let nodes = parse_properties(properties.as_object().unwrap(), 0).unwrap();
        PropertyDump::from_nodes("", &nodes, use_examples)
    }

    #[test]
    fn object_entries_expand_children() {
        let d = dump(
            json!({
                "webexport": {
                    "type": "object",
                    "default": {},
                    "properties": {
                        "url": {"default": null},
                        "port": {"default": 8080}
                    }
                }
            }),
            false,
        );
        assert_eq!(
            d.to_config().to_value(),
            json!({"webexport": {"url": null, "port": 8080}})
        );
    }

    #[test]
    fn overlay_replaces_whole_root_value() {
        let mut d = dump(
            json!({
                "project_name": {"default": "x", "description": "Project name"},
                "webexport": {"properties": {"url": {"default": null}, "port": {"default": 1}}}
            }),
            false,
        );
        let overrides = Config::try_from(json!({
            "webexport": {"url": "host:/www"},
            "extra": 1
        }))
        .unwrap();
        d.overlay_root(&overrides);

        let conf = d.to_config();
        assert_eq!(conf.get_path("webexport.url"), Some(&json!("host:/www")));
        assert!(conf.get_path("webexport.port").is_none());
        let keys: Vec<&str> = conf.keys().collect();
        assert_eq!(keys, ["project_name", "webexport", "extra"]);
        assert_eq!(d.entries()[0].description, "Project name");
        assert!(d.entries()[2].description.is_empty());
    }

    #[test]
    fn examples_replace_defaults_when_requested() {
        let props = json!({"url": {"default": null, "example": "host:/www"}});
        assert_eq!(dump(props.clone(), false).to_config().get("url"), Some(&Value::Null));
        assert_eq!(
            dump(props, true).to_config().get("url"),
            Some(&json!("host:/www"))
        );
    }
}
