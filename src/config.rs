use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use config::{Config, ConfigError, Environment};

use crate::storage::TableFormat;

pub const DEFAULT_SELLING_URL: &str =
    "https://auctions.yahoo.co.jp/openuser/jp/show/mystatus?select=selling";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub log_level: String,
    pub cookies_file: PathBuf,
    pub scraper: ScraperConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScraperConfig {
    pub selling_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub format: TableFormat,
}

impl Settings {
    /// Defaults, then `config/default.yaml`, then `APP_`-prefixed variables
    /// with `__` between nested keys, e.g. `APP_SCRAPER__TIMEOUT_SECS`.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_environment(environment())
    }

    fn with_environment(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("log_level", "info")?
            .set_default("cookies_file", "cookies.json")?
            .set_default("scraper.selling_url", DEFAULT_SELLING_URL)?
            .set_default("scraper.timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("storage.data_dir", "data")?
            .set_default("storage.format", "csv")?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.scraper.timeout_secs)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            cookies_file: PathBuf::from("cookies.json"),
            scraper: ScraperConfig {
                selling_url: DEFAULT_SELLING_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("data"),
                format: TableFormat::Csv,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Map;

    fn variables(pairs: &[(&str, &str)]) -> Environment {
        let source: Map<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        environment().source(Some(source))
    }

    #[test]
    fn defaults_use_sixty_second_timeout() {
        let settings = Settings::default();
        assert_eq!(settings.timeout(), Duration::from_secs(60));
        assert_eq!(settings.storage.format, TableFormat::Csv);
    }

    #[test]
    fn nested_keys_are_overridden_from_the_environment() {
        let settings = Settings::with_environment(variables(&[
            ("APP_SCRAPER__TIMEOUT_SECS", "7"),
            ("APP_STORAGE__FORMAT", "parquet"),
            ("APP_LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(settings.timeout(), Duration::from_secs(7));
        assert_eq!(settings.storage.format, TableFormat::Parquet);
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn unprefixed_variables_are_ignored() {
        let settings =
            Settings::with_environment(variables(&[("SCRAPER__TIMEOUT_SECS", "7")])).unwrap();
        assert_eq!(settings.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
