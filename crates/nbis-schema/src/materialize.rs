//! # Config Materializer
//!
//! Turns a [`SchemaModel`] into a concrete [`Config`] plus its commented text
//! form, and moves plain configuration data between files and value trees.
//!
//! ## Pipeline
//!
//! 1. Resolve every property of the schema to its default (or example).
//! 2. Replace root-level values with caller overrides. Overrides never
//!    recurse into nested objects.
//! 3. Render the resolved tree (see [`crate::render`]) and build the
//!    [`Config`] from the same tree.
//!
//! The materializer is a small `Copy` options value and keeps nothing
//! between calls.
//!
//! ## Missing Files
//!
//! [`ConfigMaterializer::load`] treats a missing file as an empty
//! configuration and logs a warning, so first-run tooling can proceed.
//! [`ConfigMaterializer::try_load`] reports it as
//! [`ConfigError::NotFound`] instead. Malformed content is an error in both.

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use nbis_core::{parse_yaml_str, Config, ConfigError};

use crate::error::MaterializeError;
use crate::model::SchemaModel;
use crate::render;

/// Text format produced by [`ConfigMaterializer::from_schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpFormat {
    /// Commented YAML.
    #[default]
    Yaml,
    /// Tab-separated table of the root-level lists.
    Tsv,
}

/// Result of materializing a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Materialized {
    /// The resolved configuration.
    pub config: Config,
    /// The commented text form of `config`.
    pub rendered: String,
}

/// Builds configurations from schemas and reads and writes plain
/// configuration files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigMaterializer {
    use_examples: bool,
    format: DumpFormat,
}

impl ConfigMaterializer {
    /// Materializer that uses declared defaults and renders YAML.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefer a property's `example` over its `default`.
    pub fn with_examples(mut self, use_examples: bool) -> Self {
        self.use_examples = use_examples;
        self
    }

    /// Select the rendered text format.
    pub fn with_format(mut self, format: DumpFormat) -> Self {
        self.format = format;
        self
    }

    /// Resolve `schema`, overlay `overrides` on the root-level keys, and
    /// render the result.
    ///
    /// # Errors
    ///
    /// Returns [`MaterializeError::NotTabular`] in tabular mode when a root
    /// value is not a list of scalars, or [`MaterializeError::Render`] if a
    /// value cannot be serialized.
    pub fn from_schema(
        &self,
        schema: &SchemaModel,
        overrides: &Config,
    ) -> Result<Materialized, MaterializeError> {
        let mut dump = schema.dump_properties(self.use_examples);
        dump.overlay_root(overrides);

        let rendered = match self.format {
            DumpFormat::Yaml => render::render_yaml(&dump)?,
            DumpFormat::Tsv => render::render_tsv(&dump)?,
        };
        let config = dump.to_config();

        tracing::debug!(
            schema = schema.name(),
            keys = config.len(),
            overrides = overrides.len(),
            use_examples = self.use_examples,
            "materialized configuration"
        );
        Ok(Materialized { config, rendered })
    }

    /// Materialize `schema` and write the rendered text to `writer`.
    pub fn from_schema_to_writer<W: Write>(
        &self,
        schema: &SchemaModel,
        overrides: &Config,
        mut writer: W,
    ) -> Result<Config, MaterializeError> {
        let Materialized { config, rendered } = self.from_schema(schema, overrides)?;
        writer.write_all(rendered.as_bytes())?;
        writer.flush()?;
        Ok(config)
    }

    /// Materialize `schema` into a new file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MaterializeError::AlreadyExists`] if `path` exists; the
    /// file is left untouched. Nothing is created when rendering fails.
    pub fn from_schema_to_path(
        &self,
        schema: &SchemaModel,
        overrides: &Config,
        path: &Path,
    ) -> Result<Config, MaterializeError> {
        let Materialized { config, rendered } = self.from_schema(schema, overrides)?;

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => MaterializeError::AlreadyExists {
                    path: path.to_path_buf(),
                },
                _ => MaterializeError::Io(e),
            })?;
        let mut writer = BufWriter::new(file);
        writer.write_all(rendered.as_bytes())?;
        writer.flush()?;

        tracing::info!(path = %path.display(), "wrote configuration");
        Ok(config)
    }

    /// Load a configuration file, treating a missing file as empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] or [`ConfigError::NotAMapping`] for
    /// malformed content and [`ConfigError::Io`] for other read failures.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        match Self::try_load(path) {
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    path = %path.display(),
                    "configuration file not found; using empty configuration"
                );
                Ok(Config::new())
            }
            other => other,
        }
    }

    /// Load a configuration file; a missing file is an error.
    pub fn try_load(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        let config = parse_config(&content, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), keys = config.len(), "loaded configuration");
        Ok(config)
    }

    /// Load a configuration from an open reader.
    ///
    /// Read failures are [`ConfigError::StreamIo`]; only malformed content
    /// is [`ConfigError::Parse`].
    pub fn load_reader<R: Read>(mut reader: R) -> Result<Config, ConfigError> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|source| ConfigError::StreamIo {
                stream: "reader",
                source,
            })?;
        parse_config(&content, "(reader)")
    }

    /// Load a configuration from YAML text.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        parse_config(content, "(string)")
    }

    /// Write `config` as plain YAML to `path`, replacing any existing file.
    pub fn save(config: &Config, path: &Path) -> Result<(), ConfigError> {
        let text = Self::to_yaml_string(config)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Write `config` as plain YAML to `writer`.
    pub fn save_to_writer<W: Write>(config: &Config, mut writer: W) -> Result<(), ConfigError> {
        let text = Self::to_yaml_string(config)?;
        writer
            .write_all(text.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|source| ConfigError::StreamIo {
                stream: "writer",
                source,
            })
    }

    /// Plain YAML text of `config`, keys in order, `null` for absent values.
    pub fn to_yaml_string(config: &Config) -> Result<String, ConfigError> {
        serde_yaml::to_string(config).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

fn parse_config(content: &str, source_name: &str) -> Result<Config, ConfigError> {
    let value = parse_yaml_str(content).map_err(|reason| ConfigError::Parse {
        source_name: source_name.to_string(),
        reason,
    })?;
    Config::try_from(value)
}
