use crate::devices::ANDROID_SERIAL_ENV;
use crate::CONFIG_DIR;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolSettings,
    #[serde(default)]
    pub devices: DeviceSettings,
}

/// Where to find the Android SDK tools.
///
/// Bare names are looked up in `PATH`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ToolSettings {
    pub adb: String,
    pub aapt: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DeviceSettings {
    /// Environment variable holding the selected device serial
    pub serial_env: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            adb: "adb".to_string(),
            aapt: "aapt".to_string(),
        }
    }
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            serial_env: ANDROID_SERIAL_ENV.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Can't serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub static CONFIG_FILE: LazyLock<PathBuf> = LazyLock::new(|| CONFIG_DIR.join("config.toml"));

impl Config {
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        Ok(toml::from_str(&s)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }

    /// Reads `path`, restoring the default config there when it is missing or invalid.
    pub fn load_or_restore(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => {
                debug!("config: loaded {path:?}");
                return config;
            }
            Err(e) => error!("{e}"),
        }
        error!("Restoring default config file");
        let config = Self::default();
        if let Err(e) = config.save_to(path) {
            error!("Could not write config file to disk: {e}");
        }
        config
    }

    pub fn load_configuration_file() -> Self {
        Self::load_or_restore(&CONFIG_FILE)
    }
}
