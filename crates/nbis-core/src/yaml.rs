//! # YAML Value Conversion
//!
//! Configuration files and schema documents are written in YAML, while the
//! value tree and the validator work on `serde_json::Value`. YAML has a
//! richer type system than JSON (tags, anchors, non-string keys), but
//! configuration data uses only the JSON-compatible subset. This module
//! converts between the two without losing key order.

use serde_json::Value;

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Numeric and boolean mapping keys are stringified, tags are dropped, and
/// non-finite floats are rejected because JSON cannot represent them.
pub fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

/// Parse YAML text into a JSON value tree.
///
/// Empty input (or input that is only comments) yields `Value::Null`.
pub fn parse_yaml_str(content: &str) -> Result<Value, String> {
    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| format!("invalid YAML: {e}"))?;
    yaml_to_json_value(&yaml_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_to_json_conversion() {
        let yaml_str = r#"
project_name: project_foo
port: 8080
ratio: 0.5
enabled: true
url: null
items:
  - one
  - two
"#;
        let json_value = parse_yaml_str(yaml_str).unwrap();

        assert_eq!(json_value["project_name"], "project_foo");
        assert_eq!(json_value["port"], 8080);
        assert_eq!(json_value["ratio"], 0.5);
        assert_eq!(json_value["enabled"], true);
        assert!(json_value["url"].is_null());
        assert_eq!(json_value["items"][1], "two");
    }

    #[test]
    fn mapping_order_is_preserved() {
        let json_value = parse_yaml_str("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
        let keys: Vec<&str> = json_value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn non_string_keys_are_stringified() {
        let json_value = parse_yaml_str("1: one\ntrue: yes\n").unwrap();
        assert_eq!(json_value["1"], "one");
        assert_eq!(json_value["true"], "yes");
    }

    #[test]
    fn tags_are_dropped() {
        let json_value = parse_yaml_str("value: !custom 42\n").unwrap();
        assert_eq!(json_value["value"], 42);
    }

    #[test]
    fn comment_only_input_is_null() {
        assert_eq!(parse_yaml_str("# nothing here\n").unwrap(), Value::Null);
    }

    #[test]
    fn invalid_yaml_is_reported() {
        let err = parse_yaml_str("key: [unclosed\n").unwrap_err();
        assert!(err.contains("invalid YAML"));
    }
}
