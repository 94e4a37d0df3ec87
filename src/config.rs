use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::core::distance::DistanceFormula;
use crate::core::search::DEFAULT_SHARD_COUNT;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub source: SourceSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    pub csv_url: String,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl SourceSettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_refresh_interval_secs() -> u64 { 600 }
fn default_request_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_shard_count")]
    pub shard_count: usize,
    #[serde(default)]
    pub distance_formula: DistanceFormula,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            shard_count: default_shard_count(),
            distance_formula: DistanceFormula::default(),
        }
    }
}

fn default_shard_count() -> usize { DEFAULT_SHARD_COUNT }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with VENUES_)
    /// 5. CSV_URL for the catalog source
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., VENUES__SOURCE__CSV_URL -> source.csv_url
            .add_source(
                Environment::with_prefix("VENUES")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(substitute_env_vars(settings)?)
    }

    /// Deserialize and check settings from an already layered config
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.source.refresh_interval_secs == 0 {
            return Err(ConfigError::Message(
                "source.refresh_interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Apply well-known environment variables on top of the layered config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(csv_url) = std::env::var("CSV_URL") {
        if !csv_url.is_empty() {
            builder = builder.set_override("source.csv_url", csv_url)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        Settings::from_config(
            Config::builder()
                .add_source(File::from_str(toml, FileFormat::Toml))
                .build()?,
        )
    }

    #[test]
    fn test_minimal_settings_use_defaults() {
        let settings = from_toml(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [source]
            csv_url = "https://example.com/venues.csv"
            "#,
        )
        .unwrap();

        assert_eq!(settings.source.refresh_interval(), Duration::from_secs(600));
        assert_eq!(settings.source.request_timeout(), Duration::from_secs(30));
        assert_eq!(settings.search.shard_count, 10);
        assert_eq!(settings.search.distance_formula, DistanceFormula::Haversine);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, "json");
    }

    #[test]
    fn test_search_overrides() {
        let settings = from_toml(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [source]
            csv_url = "http://localhost/venues.csv"
            refresh_interval_secs = 60

            [search]
            shard_count = 4
            distance_formula = "equirectangular"
            "#,
        )
        .unwrap();

        assert_eq!(settings.source.refresh_interval_secs, 60);
        assert_eq!(settings.search.shard_count, 4);
        assert_eq!(settings.search.distance_formula, DistanceFormula::Equirectangular);
    }

    #[test]
    fn test_missing_source_url_is_an_error() {
        let result = from_toml(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [source]
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_refresh_interval_is_rejected() {
        let result = from_toml(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [source]
            csv_url = "http://localhost/venues.csv"
            refresh_interval_secs = 0
            "#,
        );

        match result {
            Err(ConfigError::Message(message)) => assert!(message.contains("refresh_interval_secs")),
            other => panic!("expected a config error, got {:?}", other),
        }
    }
}
