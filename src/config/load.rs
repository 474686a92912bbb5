use std::{
    env,
    path::{Path, PathBuf},
};

use ::config::{Config, ConfigError, Environment, File};
use thiserror::Error;

use super::schema::Settings;

const CONFIG_PATH_ENV: &str = "CARTRIDGE_CONFIG_PATH";
const ENV_PREFIX: &str = "CARTRIDGE";
const APP_DIR: &str = "cartridge";

/// A setting that parsed but cannot be used.
#[derive(Debug, Error, PartialEq)]
pub enum InvalidSetting {
    #[error("audio.fft_size must be a power of two in 32..=32768, got {0}")]
    FftSize(usize),
    #[error("audio.initial_volume must be within [0, 1], got {0}")]
    InitialVolume(f32),
    #[error("{0} must be >= 1")]
    Zero(&'static str),
}

impl Settings {
    /// Read the optional config file, then apply `CARTRIDGE__*` environment
    /// overrides on top. Missing keys keep their struct defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(resolve_config_path().as_deref())
    }

    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), InvalidSetting> {
        let fft = self.audio.fft_size;
        if !fft.is_power_of_two() || !(32..=32768).contains(&fft) {
            return Err(InvalidSetting::FftSize(fft));
        }
        let volume = self.audio.initial_volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(InvalidSetting::InitialVolume(volume));
        }

        let counts = [
            ("ui.columns", self.ui.columns as u64),
            ("ui.block_height", u64::from(self.ui.block_height)),
            ("ui.frame_ms", self.ui.frame_ms),
        ];
        match counts.iter().find(|(_, v)| *v == 0) {
            Some((name, _)) => Err(InvalidSetting::Zero(*name)),
            None => Ok(()),
        }
    }
}

/// `$CARTRIDGE_CONFIG_PATH` when set, otherwise the XDG location.
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `$XDG_CONFIG_HOME/cartridge/config.toml`, or `~/.config/cartridge/config.toml`
/// when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|d| d.join(APP_DIR).join("config.toml"))
}
