use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub limits: LimitsConfig,
    pub html: HtmlConfig,
}

/// What to do when wrapped constructs or link labels nest deeper than
/// `max_depth`.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DepthPolicy {
    /// Fail the whole parse with `InputTooComplex`.
    #[default]
    Reject,
    /// Leave the too-deep construct as literal text.
    Literal,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_input_bytes: usize,
    pub max_depth: usize,
    pub on_too_deep: DepthPolicy,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 64 * 1024,
            max_depth: 16,
            on_too_deep: DepthPolicy::Reject,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HtmlConfig {
    /// Prefix for every CSS class the renderer emits.
    pub class_prefix: String,
    pub links_new_tab: bool,
    pub links_nofollow: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            class_prefix: "lvzj-".to_string(),
            links_new_tab: true,
            links_nofollow: true,
        }
    }
}

impl HtmlConfig {
    pub fn class(&self, name: &str) -> String {
        format!("{}{}", self.class_prefix, name)
    }
}

impl Config {
    /// The configuration bundled with the crate (validated by the build script).
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return defaults if not found or invalid.
    pub fn load(path: &Path) -> Self {
        Self::try_load(path).unwrap_or_else(|e| {
            log::warn!("{e}; using default configuration");
            Self::compiled_default()
        })
    }

    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
