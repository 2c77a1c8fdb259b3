//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cmdtree/cmdtree.toml`
//! 3. Local config: `<dir>/.cmdtree.toml`
//! 4. Environment variables: `CMDTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DEFAULT_HELPER_LABEL, DEFAULT_SEPARATOR};

/// Name of the local config file.
pub const LOCAL_CONFIG_FILE: &str = ".cmdtree.toml";

/// Unified configuration for cmdtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Label the root reserves for help (default: "help")
    pub helper_label: String,
    /// Separator between label and explanation in help lines
    pub separator: String,
    /// Colored help and error output
    pub color: bool,
    /// Manifest used when none is given on the command line
    pub manifest: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            helper_label: DEFAULT_HELPER_LABEL.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            color: true,
            manifest: None,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub helper_label: Option<String>,
    pub separator: Option<String>,
    pub color: Option<bool>,
    pub manifest: Option<PathBuf>,
}

/// Get the XDG config directory for cmdtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cmdtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("cmdtree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
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

/// Expand `~`, `$VAR` and `${VAR}`; unresolvable input is kept verbatim.
fn expand(value: &str) -> String {
    shellexpand::full(value)
        .map(|expanded| expanded.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            helper_label: overlay
                .helper_label
                .clone()
                .unwrap_or_else(|| self.helper_label.clone()),
            separator: overlay
                .separator
                .clone()
                .unwrap_or_else(|| self.separator.clone()),
            color: overlay.color.unwrap_or(self.color),
            manifest: overlay.manifest.clone().or_else(|| self.manifest.clone()),
        }
    }

    fn expand_paths(&mut self) {
        if let Some(manifest) = &self.manifest {
            self.manifest = Some(PathBuf::from(expand(&manifest.to_string_lossy())));
        }
    }

    /// Load settings with layered precedence, reading the global file from
    /// the XDG config directory.
    pub fn load(local_dir: Option<&Path>) -> ApplicationResult<Self> {
        Self::load_layers(global_config_path().as_deref(), local_dir)
    }

    /// Load settings from an explicit global file (if it exists) and a local
    /// directory, then apply `CMDTREE_*` overrides.
    pub fn load_layers(global: Option<&Path>, local_dir: Option<&Path>) -> ApplicationResult<Self> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("local config: {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        current.validate()?;
        Ok(current)
    }

    /// Apply CMDTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> ApplicationResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CMDTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("helper_label") {
            settings.helper_label = val;
        }
        if let Ok(val) = config.get_string("separator") {
            settings.separator = val;
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }
        if let Ok(val) = config.get_string("manifest") {
            settings.manifest = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// The helper label must be a single token or it could never be typed.
    pub fn validate(&self) -> ApplicationResult<()> {
        if self.helper_label.is_empty() || self.helper_label.contains(char::is_whitespace) {
            return Err(ApplicationError::Config {
                message: format!("invalid helper_label '{}'", self.helper_label),
            });
        }
        Ok(())
    }

    /// Serialize to TOML (for `cmdtree config show`).
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_with_keeps_unspecified_fields() {
        let base = Settings::default();
        let overlay = RawSettings {
            helper_label: Some("aide".into()),
            ..Default::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.helper_label, "aide");
        assert_eq!(merged.separator, DEFAULT_SEPARATOR);
        assert!(merged.color);
    }

    #[test]
    fn test_validate_rejects_whitespace_label() {
        let settings = Settings {
            helper_label: "need help".into(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
