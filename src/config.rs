use directories::ProjectDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Host interaction timing and slop used for click detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClickConfig {
    pub tap_timeout_ms: u64,
    pub pressed_state_ms: u64,
    pub touch_slop: i32,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            tap_timeout_ms: 100,
            pressed_state_ms: 64,
            touch_slop: 8,
        }
    }
}

impl ClickConfig {
    pub fn new(click_timeout_ms: u64, touch_slop: i32) -> Self {
        Self {
            tap_timeout_ms: click_timeout_ms,
            pressed_state_ms: 0,
            touch_slop,
        }
    }

    /// A press longer than this is no longer a click.
    pub fn click_timeout_ms(&self) -> u64 {
        self.pressed_state_ms.saturating_add(self.tap_timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DebugConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub click: ClickConfig,
    pub debug: DebugConfig,
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "touchhelper").map(|d| d.config_dir().join("config.toml"))
}

impl Settings {
    pub fn from_toml(txt: &str, path: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(txt).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let txt = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&txt, path)?;
        info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn load_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(p) if p.exists() => Self::load(&p),
            Some(p) => {
                info!("no config at {}; using defaults", p.display());
                Ok(Self::default())
            }
            None => {
                warn!("no home directory found; using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Loads `path` when given, otherwise the per-user config.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Self::load_default(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.click.touch_slop <= 0 {
            return Err(ConfigError::Invalid(format!(
                "click.touch_slop must be positive, got {}",
                self.click.touch_slop
            )));
        }
        if self.click.click_timeout_ms() == 0 {
            return Err(ConfigError::Invalid(
                "click timeout (tap_timeout_ms + pressed_state_ms) must be positive".into(),
            ));
        }
        Ok(())
    }
}
