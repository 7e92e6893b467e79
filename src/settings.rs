//! Layered run settings: built-in defaults, an optional TOML file, then
//! `SST_*` environment variables (`__` separates nested keys, e.g.
//! `SST_WEATHER__TIMEOUT_SECS`). CLI flags are applied on top by the caller.

use crate::error::Result;
use crate::utils::constants::{
    BULLE_LAT, BULLE_LON, COMPRESSION_SNAPPY, DEFAULT_INPUT_DIR, DEFAULT_LOG_DIR,
    DEFAULT_OUTPUT_FILE, DEFAULT_WEATHER_TIMEOUT_SECS, WEATHER_ARCHIVE_URL,
};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub log_dir: PathBuf,
    pub output_file: PathBuf,

    #[validate(length(min = 1))]
    pub compression: String,

    #[validate(nested)]
    pub weather: WeatherSettings,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WeatherSettings {
    pub enabled: bool,

    #[validate(length(min = 1))]
    pub base_url: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,
}

impl Settings {
    /// Load settings; a missing file is not an error
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("input_dir", DEFAULT_INPUT_DIR)?
            .set_default("log_dir", DEFAULT_LOG_DIR)?
            .set_default("output_file", DEFAULT_OUTPUT_FILE)?
            .set_default("compression", COMPRESSION_SNAPPY)?
            .set_default("weather.enabled", true)?
            .set_default("weather.base_url", WEATHER_ARCHIVE_URL)?
            .set_default("weather.latitude", BULLE_LAT)?
            .set_default("weather.longitude", BULLE_LON)?
            .set_default("weather.timeout_secs", DEFAULT_WEATHER_TIMEOUT_SECS as i64)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix("SST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            compression: COMPRESSION_SNAPPY.to_string(),
            weather: WeatherSettings::default(),
        }
    }
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: WEATHER_ARCHIVE_URL.to_string(),
            latitude: BULLE_LAT,
            longitude: BULLE_LON,
            timeout_secs: DEFAULT_WEATHER_TIMEOUT_SECS,
        }
    }
}
