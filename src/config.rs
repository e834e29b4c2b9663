//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/taxotree/taxotree.toml`
//! 3. Local config: `<dir>/.taxotree.toml`
//! 4. Environment variables: `TAXOTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Raw settings for intermediate parsing (every field optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub terms_file: Option<PathBuf>,
    pub max_depth: Option<usize>,
    pub max_steps: Option<usize>,
    pub published_only: Option<bool>,
    pub indent: Option<String>,
}

/// Unified configuration for taxotree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Term catalog used when no file is given on the command line
    pub terms_file: Option<PathBuf>,
    /// Default depth bound (unset: unbounded)
    pub max_depth: Option<usize>,
    /// Frames a single walk may expand before it is aborted (unset: no budget)
    pub max_steps: Option<usize>,
    /// Hide draft terms unless asked otherwise
    pub published_only: bool,
    /// Indentation unit per depth level for plain output
    pub indent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            terms_file: None,
            max_depth: None,
            max_steps: None,
            published_only: false,
            indent: "  ".into(),
        }
    }
}

/// Get the XDG config directory for taxotree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "taxotree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("taxotree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".taxotree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ApplicationError> {
    value.trim().parse().map_err(|_| ApplicationError::Config {
        message: format!("invalid value for TAXOTREE_{}: {}", key.to_uppercase(), value),
    })
}

impl Settings {
    /// Expand `~`, `$VAR` and `${VAR}` in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(path) = &self.terms_file {
            let raw = path.to_string_lossy();
            if let Ok(expanded) = shellexpand::full(raw.as_ref()) {
                self.terms_file = Some(PathBuf::from(expanded.as_ref()));
            }
        }
    }

    /// Merge overlay config onto self (base): overlay wins where specified.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            terms_file: overlay.terms_file.clone().or_else(|| self.terms_file.clone()),
            max_depth: overlay.max_depth.or(self.max_depth),
            max_steps: overlay.max_steps.or(self.max_steps),
            published_only: overlay.published_only.unwrap_or(self.published_only),
            indent: overlay.indent.clone().unwrap_or_else(|| self.indent.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.taxotree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply TAXOTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TAXOTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("terms_file") {
            settings.terms_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("max_depth") {
            settings.max_depth = Some(parse_env("max_depth", &val)?);
        }
        if let Ok(val) = config.get_string("max_steps") {
            settings.max_steps = Some(parse_env("max_steps", &val)?);
        }
        if let Ok(val) = config.get_string("published_only") {
            settings.published_only = parse_env("published_only", &val)?;
        }
        if let Ok(val) = config.get_string("indent") {
            settings.indent = val;
        }

        Ok(settings)
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}
