//! # Schema Validation
//!
//! Validation of configuration data against a schema document using the
//! `jsonschema` crate, pinned to Draft 7.
//!
//! ## Error Reporting
//!
//! A configuration that fails validation is rejected with every violation
//! listed: the instance path of the offending value, the schema path of the
//! constraint, and the validator's message (which names the missing key for
//! `required` failures).
//!
//! ## Reference Resolution
//!
//! Schemas are self-contained. Internal `#/definitions/...` references are
//! resolved by the `jsonschema` crate; remote `$ref` URIs are refused rather
//! than fetched.

use std::fmt;

use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;
use thiserror::Error;

use crate::error::SchemaError;

/// Retriever that refuses every external reference.
///
/// Keeps validator construction free of network access.
struct NoRemoteRetriever;

impl Retrieve for NoRemoteRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external schema references are not supported: {}", uri.as_str()).into())
    }
}

/// A configuration did not conform to its schema.
#[derive(Error, Debug, Clone)]
#[error("configuration does not match schema '{schema_name}':\n{violations}")]
pub struct ValidationError {
    /// Name of the schema that was validated against.
    pub schema_name: String,
    /// Structured list of individual violations.
    pub violations: ValidationViolations,
}

impl ValidationError {
    /// Returns true if any violation message or path mentions `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.violations
            .violations()
            .iter()
            .any(|v| v.message.contains(needle) || v.instance_path.contains(needle))
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating value in the configuration.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Compile a Draft 7 validator for `document`.
///
/// The `$schema` key is informational and removed before compilation, so a
/// document that names another draft is still checked as Draft 7.
///
/// # Errors
///
/// Returns [`SchemaError::Invalid`] if the document fails the Draft 7
/// meta-schema check.
pub(crate) fn compile(document: &Value, schema_name: &str) -> Result<Validator, SchemaError> {
    let mut document = document.clone();
    if let Value::Object(map) = &mut document {
        map.shift_remove("$schema");
    }

    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft7);
    opts.with_retriever(NoRemoteRetriever);

    tracing::debug!(schema = schema_name, "compiling schema validator");
    opts.build(&document).map_err(|e| SchemaError::Invalid {
        schema_name: schema_name.to_string(),
        reason: e.to_string(),
    })
}

/// Validate `instance`, collecting every violation.
pub(crate) fn check(
    validator: &Validator,
    instance: &Value,
    schema_name: &str,
) -> Result<(), ValidationError> {
    let violations = ValidationViolations {
        violations: validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect(),
    };

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError {
            schema_name: schema_name.to_string(),
            violations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compile_rejects_bad_type_keyword() {
        let err = compile(&json!({"type": 12}), "broken").unwrap_err();
        assert!(matches!(err, SchemaError::Invalid { .. }));
    }

    #[test]
    fn test_schema_key_is_ignored() {
        let doc = json!({
            "$schema": "http://json-schema.org/draft/2020-12/schema#",
            "properties": {"name": {"type": "string"}}
        });
        let validator = compile(&doc, "named").unwrap();
        assert!(check(&validator, &json!({"name": "x"}), "named").is_ok());
        assert!(check(&validator, &json!({"name": 1}), "named").is_err());
    }

    #[test]
    fn test_required_violation_names_property() {
        let doc = json!({"required": ["project_name"]});
        let validator = compile(&doc, "config").unwrap();
        let err = check(&validator, &json!({}), "config").unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert!(err.mentions("project_name"));
        assert!(err.to_string().contains("(root)"));
    }

    #[test]
    fn test_all_violations_are_collected() {
        let doc = json!({
            "required": ["project_name"],
            "properties": {"port": {"type": "number"}}
        });
        let validator = compile(&doc, "config").unwrap();
        assert!(check(&validator, &json!({"project_name": "x", "port": 80}), "config").is_ok());

        let err = check(&validator, &json!({"port": "80"}), "config").unwrap_err();
        assert!(!err.violations.is_empty());
        assert_eq!(err.violations.len(), 2);
        assert_eq!(err.violations.violations().len(), 2);
    }

    #[test]
    fn test_nested_violation_has_instance_path() {
        let doc = json!({
            "properties": {
                "webexport": {"properties": {"port": {"type": "number"}}}
            }
        });
        let validator = compile(&doc, "config").unwrap();
        let err = check(&validator, &json!({"webexport": {"port": "80"}}), "config").unwrap_err();
        let v = &err.violations.violations()[0];
        assert_eq!(v.instance_path, "/webexport/port");
        assert!(v.schema_path.ends_with("/type"));
    }

    #[test]
    fn test_violation_display_format() {
        let v = Violation {
            instance_path: "/webexport/url".to_string(),
            schema_path: "/properties/webexport/properties/url/type".to_string(),
            message: r#"5 is not of types "null", "string""#.to_string(),
        };
        let display = v.to_string();
        assert!(display.contains("/webexport/url"));
        assert!(display.contains("is not of types"));
    }

    #[test]
    fn test_violation_display_root() {
        let v = Violation {
            instance_path: String::new(),
            schema_path: "/required".to_string(),
            message: r#""project_name" is a required property"#.to_string(),
        };
        assert!(v.to_string().contains("(root)"));
    }
}
