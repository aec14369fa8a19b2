//! # Config Subcommand
//!
//! Configuration administration utilities: initialize a project
//! configuration file, show the default configuration, and print example
//! configurations for the bundled schemas.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use nbis_core::Config;
use nbis_schema::{get_schema, BundledSchema, ConfigMaterializer, MaterializeError, SchemaSource};
use serde_json::json;

use crate::Environment;

/// Arguments for the config subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Initialize a configuration file.
    ///
    /// By default saves to PROJECT_NAME.yaml in the project home directory,
    /// where PROJECT_NAME is the project name in pyproject.toml.
    Init {
        /// Configuration file name.
        #[arg(long)]
        config_file: Option<PathBuf>,
    },

    /// Show the default configuration.
    Show,

    /// Show example configuration files.
    Example {
        /// Which schema to show an example for.
        #[arg(value_enum, default_value_t = ExampleKind::Main)]
        configuration: ExampleKind,
    },
}

/// Bundled schema selected by `config example`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExampleKind {
    /// Project configuration.
    Main,
    /// Snakemake profile.
    Profile,
}

impl ExampleKind {
    pub fn schema(self) -> BundledSchema {
        match self {
            Self::Main => BundledSchema::Configuration,
            Self::Profile => BundledSchema::SnakemakeProfile,
        }
    }
}

/// Execute `nbis-admin config`.
pub fn run_config<W: Write>(args: &ConfigArgs, env: &Environment, out: &mut W) -> Result<u8> {
    tracing::debug!(command = ?args.command, "running config subcommand");
    match &args.command {
        ConfigCommand::Init { config_file } => run_init(config_file.as_deref(), env, out),
        ConfigCommand::Show => run_show(env, out),
        ConfigCommand::Example { configuration } => run_example(*configuration, env, out),
    }
}

fn project_overrides(project_name: &str) -> Config {
    Config::from_iter([("project_name".to_string(), json!(project_name))])
}

fn run_init<W: Write>(
    config_file: Option<&std::path::Path>,
    env: &Environment,
    out: &mut W,
) -> Result<u8> {
    tracing::info!("initializing configuration file");
    let project_name = env.project_name()?;
    let path = match config_file {
        Some(path) => env.home.join(path),
        None => env.home.join(format!("{project_name}.yaml")),
    };

    let schema = get_schema(BundledSchema::Configuration)?;
    match ConfigMaterializer::new().from_schema_to_path(
        &schema,
        &project_overrides(&project_name),
        &path,
    ) {
        Ok(_) => {
            writeln!(out, "wrote {}", path.display())?;
            Ok(0)
        }
        Err(e @ MaterializeError::AlreadyExists { .. }) => {
            tracing::info!("{e}");
            Ok(0)
        }
        Err(e) => Err(e).with_context(|| format!("cannot write {}", path.display())),
    }
}

fn run_show<W: Write>(env: &Environment, out: &mut W) -> Result<u8> {
    let project_name = env.project_name()?;
    let schema = get_schema(BundledSchema::Configuration)?;
    ConfigMaterializer::new().from_schema_to_writer(&schema, &project_overrides(&project_name), out)?;
    Ok(0)
}

fn run_example<W: Write>(kind: ExampleKind, env: &Environment, out: &mut W) -> Result<u8> {
    let bundled = kind.schema();
    let schema = get_schema(bundled)?;
    let overrides = match kind {
        ExampleKind::Main => project_overrides(&env.home_name()),
        ExampleKind::Profile => Config::new(),
    };

    writeln!(out)?;
    writeln!(out, "#\n# Showing example configuration for schema {}", bundled.name())?;
    writeln!(out, "# See `nbis-admin config show` for the defaults.\n#")?;
    if !schema.required().is_empty() {
        writeln!(out, "# Required fields: {}\n#", schema.required().join(","))?;
    }
    writeln!(out)?;

    ConfigMaterializer::new()
        .with_examples(true)
        .from_schema_to_writer(&schema, &overrides, &mut *out)?;
    writeln!(out)?;
    Ok(0)
}
