//! # Comment Rendering
//!
//! Turns a [`PropertyDump`] into the human-editable text of a configuration
//! file.
//!
//! ## Layout
//!
//! ```yaml
//! # Schema-wide description, wrapped at 70 columns.
//!
//! # Description of a root property
//! project_name: project_foo
//!
//! # Description of an object property
//! webexport:
//!   url: null                             # Description of a nested
//!                                         # property, wrapped
//!   builddir: docs/_build/html            # Local directory
//! ```
//!
//! - Root-level entries get their description as full-line comments above
//!   the key and are separated by one blank line. An entry without a
//!   description still gets a bare `#` line.
//! - Nested entries carry their description inline, padded to column
//!   `INLINE_COMMENT_COLUMN + INDENT * (level - 1)`; continuation lines are
//!   padded to the same column.
//! - Object entries emit only `key:` followed by their children one level
//!   deeper; an object with no children renders as `key: {}`.
//!
//! The output is plain YAML: comments are decoration and reading the file
//! back yields the same values.
//!
//! ## Tabular Mode
//!
//! [`render_tsv`] writes the root keys as a tab-separated header and the
//! root-level lists as columns, one row per index, stopping at the shortest
//! list.

use std::io;

use serde_json::Value;

use crate::dump::{DumpEntry, DumpValue, PropertyDump};
use crate::error::MaterializeError;

/// Total width of full-line comments, including the `# ` marker.
pub const COMMENT_WIDTH: usize = 70;

/// Column at which inline comments of level-1 entries start.
pub const INLINE_COMMENT_COLUMN: usize = 40;

/// Text width of inline comments.
pub const INLINE_COMMENT_WIDTH: usize = 30;

/// Spaces per nesting level.
pub const INDENT: usize = 2;

/// A value as it appears after `key:`.
enum Rendered {
    /// Fits on the key line.
    Inline(String),
    /// Block YAML lines placed under the key, not yet indented.
    Block(Vec<String>),
}

/// Render the commented YAML form of `dump`.
pub fn render_yaml(dump: &PropertyDump) -> Result<String, MaterializeError> {
    let mut out = String::new();

    for line in wrap(dump.header(), COMMENT_WIDTH - 2) {
        push_comment_line(&mut out, &line);
    }

    for entry in dump.entries() {
        if !out.is_empty() {
            out.push('\n');
        }
        render_root_entry(&mut out, entry)?;
    }

    tracing::debug!(bytes = out.len(), "rendered configuration");
    Ok(out)
}

fn render_root_entry(out: &mut String, entry: &DumpEntry) -> Result<(), MaterializeError> {
    if entry.description.is_empty() {
        out.push_str("#\n");
    } else {
        for line in wrap(&entry.description, COMMENT_WIDTH - 2) {
            push_comment_line(out, &line);
        }
    }

    let key = render_key(&entry.name)?;
    match &entry.value {
        DumpValue::Object(children) if children.is_empty() => {
            out.push_str(&format!("{key}: {{}}\n"));
        }
        DumpValue::Object(children) => {
            out.push_str(&format!("{key}:\n"));
            for child in children {
                render_nested_entry(out, child)?;
            }
        }
        DumpValue::Leaf(value) => match render_value(&entry.name, value)? {
            Rendered::Inline(text) => out.push_str(&format!("{key}: {text}\n")),
            Rendered::Block(lines) => {
                out.push_str(&format!("{key}:\n"));
                push_block(out, &lines, INDENT);
            }
        },
    }
    Ok(())
}

fn render_nested_entry(out: &mut String, entry: &DumpEntry) -> Result<(), MaterializeError> {
    let indent = " ".repeat(INDENT * entry.level);
    let key = render_key(&entry.name)?;

    match &entry.value {
        DumpValue::Object(children) if children.is_empty() => {
            push_with_comment(out, &format!("{indent}{key}: {{}}"), entry);
        }
        DumpValue::Object(children) => {
            push_with_comment(out, &format!("{indent}{key}:"), entry);
            for child in children {
                render_nested_entry(out, child)?;
            }
        }
        DumpValue::Leaf(value) => match render_value(&entry.name, value)? {
            Rendered::Inline(text) => {
                push_with_comment(out, &format!("{indent}{key}: {text}"), entry);
            }
            Rendered::Block(lines) => {
                push_with_comment(out, &format!("{indent}{key}:"), entry);
                push_block(out, &lines, INDENT * (entry.level + 1));
            }
        },
    }
    Ok(())
}

/// Write `head` followed by the entry's description as an inline comment.
fn push_with_comment(out: &mut String, head: &str, entry: &DumpEntry) {
    if entry.description.is_empty() {
        out.push_str(head);
        out.push('\n');
        return;
    }

    let column = INLINE_COMMENT_COLUMN + INDENT * entry.level.saturating_sub(1);
    let head_width = head.chars().count();
    let pad = if head_width < column {
        column
    } else {
        head_width + 1
    };

    for (i, line) in wrap(&entry.description, INLINE_COMMENT_WIDTH)
        .iter()
        .enumerate()
    {
        if i == 0 {
            out.push_str(&format!("{head:<pad$}# {line}\n"));
        } else {
            out.push_str(&format!("{:pad$}# {line}\n", ""));
        }
    }
}

fn push_comment_line(out: &mut String, text: &str) {
    out.push_str(&format!("# {text}\n"));
}

fn push_block(out: &mut String, lines: &[String], indent: usize) {
    let prefix = " ".repeat(indent);
    for line in lines {
        out.push_str(&prefix);
        out.push_str(line);
        out.push('\n');
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    textwrap::wrap(text, width)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

fn render_key(name: &str) -> Result<String, MaterializeError> {
    render_string(name, name)
}

/// Render a string scalar so that it reads back as the same string.
///
/// Strings that would need a multi-line block scalar fall back to a
/// double-quoted JSON string, which is also valid YAML.
fn render_string(key: &str, s: &str) -> Result<String, MaterializeError> {
    let yaml = serde_yaml::to_string(s).map_err(|e| MaterializeError::Render {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    let yaml = yaml.trim_end_matches('\n');
    if yaml.contains('\n') || yaml.starts_with('|') || yaml.starts_with('>') {
        serde_json::to_string(s).map_err(|e| MaterializeError::Render {
            key: key.to_string(),
            reason: e.to_string(),
        })
    } else {
        Ok(yaml.to_string())
    }
}

fn render_value(key: &str, value: &Value) -> Result<Rendered, MaterializeError> {
    match value {
        Value::Null => Ok(Rendered::Inline("null".to_string())),
        Value::Bool(b) => Ok(Rendered::Inline(b.to_string())),
        Value::Number(n) => Ok(Rendered::Inline(n.to_string())),
        Value::String(s) => Ok(Rendered::Inline(render_string(key, s)?)),
        Value::Array(items) if items.is_empty() => Ok(Rendered::Inline("[]".to_string())),
        Value::Object(map) if map.is_empty() => Ok(Rendered::Inline("{}".to_string())),
        Value::Array(_) | Value::Object(_) => {
            let yaml = serde_yaml::to_string(value).map_err(|e| MaterializeError::Render {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
            Ok(Rendered::Block(yaml.lines().map(str::to_string).collect()))
        }
    }
}

/// Render the root-level lists of `dump` as tab-separated rows.
///
/// # Errors
///
/// Returns [`MaterializeError::NotTabular`] if a root value is not a list
/// of scalars.
pub fn render_tsv(dump: &PropertyDump) -> Result<String, MaterializeError> {
    if dump.entries().is_empty() {
        return Ok(String::new());
    }

    let mut columns: Vec<Vec<String>> = Vec::with_capacity(dump.entries().len());
    for entry in dump.entries() {
        let value = entry.to_value();
        let items = value.as_array().ok_or_else(|| MaterializeError::NotTabular {
            key: entry.name.clone(),
            reason: format!("expected a list, found {}", nbis_core::config::value_kind(&value)),
        })?;
        let cells = items
            .iter()
            .map(|item| table_cell(&entry.name, item))
            .collect::<Result<Vec<_>, _>>()?;
        columns.push(cells);
    }
    let rows = columns.iter().map(Vec::len).min().unwrap_or(0);

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(Vec::new());
    writer
        .write_record(dump.entries().iter().map(|e| e.name.as_str()))
        .map_err(io::Error::from)?;
    for row in 0..rows {
        writer
            .write_record(columns.iter().map(|column| column[row].as_str()))
            .map_err(io::Error::from)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

fn table_cell(key: &str, value: &Value) -> Result<String, MaterializeError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(MaterializeError::NotTabular {
            key: key.to_string(),
            reason: format!(
                "list items must be scalars, found {}",
                nbis_core::config::value_kind(other)
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::parse_properties;
    use nbis_core::{parse_yaml_str, Config};
    use serde_json::json;

    fn dump(header: &str, properties: Value) -> PropertyDump {
        let nodes = parse_properties(properties.as_object().unwrap(), 0).unwrap();
        PropertyDump::from_nodes(header, &nodes, false)
    }

    fn reparse(text: &str) -> Config {
        Config::try_from(parse_yaml_str(text).unwrap()).unwrap()
    }

    #[test]
    fn root_comment_sits_above_key() {
        let d = dump(
            "",
            json!({
                "project_name": {"description": "Project name", "default": "foo"},
                "port": {"description": "HTTP port", "default": 8080}
            }),
        );
        let text = render_yaml(&d).unwrap();
        assert_eq!(
            text,
            "# Project name\nproject_name: foo\n\n# HTTP port\nport: 8080\n"
        );
    }

    #[test]
    fn undocumented_root_key_gets_bare_marker() {
        let d = dump("", json!({"port": {"default": 8080}}));
        assert_eq!(render_yaml(&d).unwrap(), "#\nport: 8080\n");
    }

    #[test]
    fn header_is_preamble() {
        let d = dump("Short description.", json!({"a": {"description": "A", "default": 1}}));
        assert_eq!(render_yaml(&d).unwrap(), "# Short description.\n\n# A\na: 1\n");
    }

    #[test]
    fn nested_entries_use_inline_comments() {
        let d = dump(
            "",
            json!({
                "webexport": {
                    "description": "webexport configuration",
                    "properties": {
                        "url": {"description": "webexport url", "default": null},
                        "port": {"description": "HTTP port number", "default": 8080}
                    }
                }
            }),
        );
        let text = render_yaml(&d).unwrap();
        let expected = format!(
            "# webexport configuration\nwebexport:\n{:<40}# webexport url\n{:<40}# HTTP port number\n",
            "  url: null", "  port: 8080"
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn long_inline_comment_wraps_under_column() {
        let d = dump(
            "",
            json!({
                "outer": {
                    "properties": {
                        "inner": {
                            "description": "a fairly long description that needs more than one line",
                            "default": 1
                        }
                    }
                }
            }),
        );
        let text = render_yaml(&d).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4, "expected wrapped comment in:\n{text}");
        assert_eq!(lines[2].find('#'), Some(INLINE_COMMENT_COLUMN));
        assert_eq!(lines[3].find('#'), Some(INLINE_COMMENT_COLUMN));
        assert!(lines[3].trim_start().starts_with("# "));
    }

    #[test]
    fn deeper_levels_shift_comment_column() {
        let d = dump(
            "",
            json!({
                "a": {"properties": {"b": {"properties": {
                    "c": {"description": "deep", "default": true}
                }}}}
            }),
        );
        let text = render_yaml(&d).unwrap();
        let line = text.lines().find(|l| l.contains("c: true")).unwrap();
        assert_eq!(line.find('#'), Some(INLINE_COMMENT_COLUMN + INDENT));
    }

    #[test]
    fn empty_object_renders_as_flow_mapping() {
        let d = dump("", json!({"section": {"description": "S", "properties": {}}}));
        let text = render_yaml(&d).unwrap();
        assert_eq!(text, "# S\nsection: {}\n");
        assert_eq!(reparse(&text).get("section"), Some(&json!({})));
    }

    #[test]
    fn ambiguous_strings_are_quoted() {
        let d = dump(
            "",
            json!({
                "a": {"default": "8080"},
                "b": {"default": "null"},
                "c": {"default": "true"},
                "d": {"default": "two\nlines"},
                "e": {"default": "x: y # z"}
            }),
        );
        let conf = reparse(&render_yaml(&d).unwrap());
        assert_eq!(conf.get("a"), Some(&json!("8080")));
        assert_eq!(conf.get("b"), Some(&json!("null")));
        assert_eq!(conf.get("c"), Some(&json!("true")));
        assert_eq!(conf.get("d"), Some(&json!("two\nlines")));
        assert_eq!(conf.get("e"), Some(&json!("x: y # z")));
    }

    #[test]
    fn collections_render_as_blocks() {
        let d = dump(
            "",
            json!({
                "profiles": {"default": {"local": "config/local", "cluster": "config/cluster"}},
                "nested": {"properties": {"opts": {"description": "options", "default": ["--delete", "-v"]}}},
                "empty": {"default": []}
            }),
        );
        let text = render_yaml(&d).unwrap();
        assert!(text.contains("profiles:\n  local: config/local\n  cluster: config/cluster\n"));
        assert!(text.contains("empty: []\n"));
        let conf = reparse(&text);
        assert_eq!(
            conf.get("profiles"),
            Some(&json!({"local": "config/local", "cluster": "config/cluster"}))
        );
        assert_eq!(conf.get_path("nested.opts"), Some(&json!(["--delete", "-v"])));
        assert_eq!(conf.get("empty"), Some(&json!([])));
    }

    #[test]
    fn tsv_zips_root_lists() {
        let d = dump(
            "",
            json!({
                "sample": {"default": ["s1", "s2", "s3"]},
                "unit": {"default": [1, 2]},
                "fq": {"default": ["a.fq", null, "c.fq"]}
            }),
        );
        assert_eq!(render_tsv(&d).unwrap(), "sample\tunit\tfq\ns1\t1\ta.fq\ns2\t2\t\n");
    }

    #[test]
    fn tsv_rejects_scalars() {
        let d = dump("", json!({"sample": {"default": "s1"}}));
        let err = render_tsv(&d).unwrap_err();
        assert!(matches!(err, MaterializeError::NotTabular { ref key, .. } if key == "sample"));
    }

    #[test]
    fn tsv_rejects_nested_objects() {
        let d = dump("", json!({"section": {"properties": {"a": {"default": 1}}}}));
        assert!(matches!(
            render_tsv(&d).unwrap_err(),
            MaterializeError::NotTabular { .. }
        ));
    }
}
