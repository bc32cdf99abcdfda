use anyhow::{Context, Result};
use config::{Config, File, FileFormat};
use log::{debug, info, LevelFilter};
use serde::Deserialize;
use std::fs;
use std::path::Path;

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct StationConfig {
    /// Seconds between reporting cycles.
    pub interval: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdafruitIoConfig {
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThingSpeakConfig {
    pub enabled: bool,
    pub channel_id: u64,
    pub write_api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self { interval: 60 }
    }
}

impl Default for AdafruitIoConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for ThingSpeakConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            channel_id: 0,
            write_api_key: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(rename = "STATION", default)]
    pub station: StationConfig,
    #[serde(rename = "ADAFRUIT_IO", default)]
    pub adafruit_io: AdafruitIoConfig,
    #[serde(rename = "THINGSPEAK", default)]
    pub thingspeak: ThingSpeakConfig,
    #[serde(rename = "LOGGING", default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            station: StationConfig::default(),
            adafruit_io: AdafruitIoConfig::default(),
            thingspeak: ThingSpeakConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Self::from_file("config.ini")
    }

    pub fn get_log_level(&self) -> LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();
        debug!("Loading configuration from {}", config_path.display());

        let config = Config::builder()
            .add_source(File::from(config_path).format(FileFormat::Ini))
            .build()
            .context(format!("Failed to load config from {}", config_path.display()))?;

        let app_config: AppConfig = config.try_deserialize()
            .context("Failed to deserialize config")?;

        Ok(app_config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_path = path.as_ref();
        let config_str = format!(
            "[STATION]\ninterval = {}\n\n[ADAFRUIT_IO]\nenabled = {}\n\n[THINGSPEAK]\nenabled = {}\nchannel_id = {}\nwrite_api_key = {}\n\n[LOGGING]\nlevel = {}\n",
            self.station.interval,
            self.adafruit_io.enabled,
            self.thingspeak.enabled,
            self.thingspeak.channel_id,
            self.thingspeak.write_api_key,
            self.logging.level
        );

        fs::write(config_path, config_str)
            .context(format!("Failed to save config to {}", config_path.display()))?;

        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.station.interval, 60);
        assert!(config.adafruit_io.enabled);
        assert!(!config.thingspeak.enabled);
        assert_eq!(config.thingspeak.channel_id, 0);
        assert_eq!(config.thingspeak.write_api_key, "");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let config_content = "[STATION]\ninterval = 30\n\n[ADAFRUIT_IO]\nenabled = false\n\n[THINGSPEAK]\nenabled = true\nchannel_id = 123456\nwrite_api_key = ABCDEF0123456789\n\n[LOGGING]\nlevel = debug\n";

        temp_file.write_all(config_content.as_bytes()).unwrap();
        let config_path = temp_file.path();

        let config = AppConfig::from_file(config_path).unwrap();

        assert_eq!(config.station.interval, 30);
        assert!(!config.adafruit_io.enabled);
        assert!(config.thingspeak.enabled);
        assert_eq!(config.thingspeak.channel_id, 123456);
        assert_eq!(config.thingspeak.write_api_key, "ABCDEF0123456789");
        assert_eq!(config.get_log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_save_config() {
        let mut config = AppConfig::default();
        config.station.interval = 120;
        config.thingspeak.enabled = true;
        config.thingspeak.channel_id = 654321;
        config.thingspeak.write_api_key = "KEY".to_string();
        config.logging.level = "warn".to_string();

        let temp_file = NamedTempFile::new().unwrap();
        let config_path = temp_file.path();

        config.save(config_path).unwrap();

        let loaded_config = AppConfig::from_file(config_path).unwrap();

        assert_eq!(loaded_config.station.interval, 120);
        assert!(loaded_config.thingspeak.enabled);
        assert_eq!(loaded_config.thingspeak.channel_id, 654321);
        assert_eq!(loaded_config.thingspeak.write_api_key, "KEY");
        assert_eq!(loaded_config.logging.level, "warn");
    }
}
