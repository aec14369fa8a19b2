//! # nbis-cli: The `nbis-admin` Command-Line Tool
//!
//! Provides the `nbis-admin` binary. Subcommand handlers live in their own
//! modules and receive a resolved [`Environment`].
//!
//! ## Subcommands
//!
//! - `nbis-admin config init`: write `<project>.yaml` from the bundled
//!   configuration schema.
//! - `nbis-admin config show`: print the default configuration.
//! - `nbis-admin config example [main|profile]`: print an example
//!   configuration for a bundled schema.
//!
//! ```bash
//! nbis-admin config init
//! nbis-admin --config-file ../other/other.yaml config show
//! nbis-admin -v config example profile
//! ```

pub mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nbis_core::Config;
use nbis_schema::{load_config, BundledSchema};
use serde_json::json;

/// Project name used until a configuration file says otherwise.
pub const DEFAULT_PROJECT_NAME: &str = "nbis-admin";

/// Resolved runtime context shared by all subcommands.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Project home directory.
    pub home: PathBuf,
    /// Loaded project configuration.
    pub config: Config,
}

impl Environment {
    /// Resolve the environment from the current directory.
    pub fn from_current_dir(config_file: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("cannot determine current directory")?;
        Self::resolve(&cwd, config_file)
    }

    /// Resolve the environment relative to `cwd`.
    ///
    /// With an explicit `config_file`, the home directory is the file's
    /// parent. Otherwise the home directory is `cwd` and `<dirname>.yaml` is
    /// loaded when it exists. The result is validated against the bundled
    /// configuration schema.
    pub fn resolve(cwd: &Path, config_file: Option<&Path>) -> Result<Self> {
        let defaults = Config::from_iter([("project_name".to_string(), json!(DEFAULT_PROJECT_NAME))]);

        let (home, file) = match config_file {
            Some(path) => {
                let path = cwd.join(path);
                let home = path.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.to_path_buf());
                (home, Some(path))
            }
            None => {
                let home = cwd.to_path_buf();
                let candidate = home.join(format!("{}.yaml", dir_name(&home)));
                let file = candidate.exists().then_some(candidate);
                (home, file)
            }
        };

        let config = load_config(
            file.as_deref(),
            Some(defaults),
            &BundledSchema::Configuration,
            true,
        )
        .with_context(|| match &file {
            Some(path) => format!("cannot load configuration {}", path.display()),
            None => "cannot build default configuration".to_string(),
        })?;

        tracing::debug!(
            home = %home.display(),
            file = ?file,
            keys = config.len(),
            "resolved environment"
        );
        Ok(Self { home, config })
    }

    /// Name of the home directory.
    pub fn home_name(&self) -> String {
        dir_name(&self.home)
    }

    /// Name of the project: `[project].name` from `pyproject.toml`, falling
    /// back to the home directory name.
    pub fn project_name(&self) -> Result<String> {
        match project_name_from_pyproject(&self.home)? {
            Some(name) => Ok(name),
            None => Ok(dir_name(&self.home)),
        }
    }
}

/// Read `[project].name` from `<home>/pyproject.toml`.
///
/// Returns `Ok(None)` if the file or the key is absent.
pub fn project_name_from_pyproject(home: &Path) -> Result<Option<String>> {
    let path = home.join("pyproject.toml");
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("cannot read {}", path.display())),
    };
    let doc: toml::Table = content
        .parse()
        .with_context(|| format!("cannot parse {}", path.display()))?;
    Ok(doc
        .get("project")
        .and_then(|project| project.get("name"))
        .and_then(|name| name.as_str())
        .map(str::to_string))
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string())
}
