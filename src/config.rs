//! Settings module.
//!
//! Loads and validates the user's `settings.toml`. The file is read once per
//! run, before any workdir is touched; every problem with it is a
//! [`ConfigError`] and aborts the run.
//!
//! ## Location
//!
//! `<config dir>/publish/settings.toml`, i.e. `~/.config/publish/settings.toml`
//! on Linux, unless `--config` points elsewhere.
//!
//! ## Options
//!
//! ```toml
//! # Service folders created in every workdir, in this order (required).
//! services = ["flickr", "instagram"]
//!
//! # Stage new symlinks with git (the archive root must be a repository).
//! git = false
//!
//! [preview]
//! quality = 90              # JPEG quality of generated previews (1-100)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{PreviewConfig, Quality};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{0} does not exist")]
    NotFound(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("unknown service '{name}', expected one of: {}", .known.join(", "))]
    UnknownService { name: String, known: Vec<String> },
}

/// User settings loaded from `settings.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Service names, in the order their folders are created.
    pub services: Vec<String>,
    /// Whether new symlinks are staged with git.
    #[serde(default)]
    pub git: bool,
    /// Preview encoding settings.
    #[serde(default)]
    pub preview: PreviewSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewSettings {
    /// JPEG quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            quality: Quality::default().value(),
        }
    }
}

impl Settings {
    /// Validate the service list and value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.services.is_empty() {
            return Err(ConfigError::Validation(
                "services must not be empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for service in &self.services {
            validate_service_name(service)?;
            if !seen.insert(service.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "service '{service}' is listed twice"
                )));
            }
        }

        if !(1..=100).contains(&self.preview.quality) {
            return Err(ConfigError::Validation(
                "preview.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }

    /// Look up a service by name.
    pub fn service(&self, name: &str) -> Result<&str, ConfigError> {
        self.services
            .iter()
            .find(|s| *s == name)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::UnknownService {
                name: name.to_string(),
                known: self.services.clone(),
            })
    }

    pub fn preview_config(&self) -> PreviewConfig {
        PreviewConfig {
            quality: Quality::new(self.preview.quality),
            ..PreviewConfig::default()
        }
    }
}

/// A service name becomes a folder name inside each workdir, so it must be a
/// single visible path component.
fn validate_service_name(name: &str) -> Result<(), ConfigError> {
    let problem = if name.is_empty() {
        Some("must not be empty")
    } else if name.contains('/') || name.contains('\\') {
        Some("must not contain a path separator")
    } else if name.starts_with('.') {
        Some("must not start with '.'")
    } else {
        None
    };

    match problem {
        Some(problem) => Err(ConfigError::Validation(format!(
            "service name '{name}' {problem}"
        ))),
        None => Ok(()),
    }
}

/// Default settings location: `<config dir>/publish/settings.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("publish")
        .join("settings.toml")
}

/// Parse and validate settings from TOML text.
pub fn parse_settings(content: &str) -> Result<Settings, ConfigError> {
    let settings: Settings = toml::from_str(content)?;
    settings.validate()?;
    Ok(settings)
}

/// Load and validate settings from `path`.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    parse_settings(&content)
}

/// A documented stock `settings.toml`.
pub fn stock_config_toml() -> &'static str {
    r#"# publish settings
#
# Service folders created in every workdir, in this order. Each service gets
# `<service>/` with symlinks to new previews and `<service>/published/` for
# the ones you have released.
services = ["flickr", "instagram"]

# Stage new symlinks with git. The archive root must be a git repository.
git = false

[preview]
# JPEG quality of generated previews (1-100).
quality = 90
"#
}
