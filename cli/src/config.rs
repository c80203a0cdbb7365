use std::path::Path;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use fleet_core::{ApiConfig, DEFAULT_BASE_URL};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// One of `compact`, `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
fn default_log_format() -> String {
    "compact".to_string()
}

impl Config {
    /// Load configuration from defaults, a file and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. built-in defaults
    /// 2. `file` if given, otherwise `fleet.toml` in the working directory (optional)
    /// 3. environment variables with FLEET__ prefix, e.g. `FLEET__API__BASE_URL`
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = match file {
            Some(path) => defaults()?.add_source(File::from(path)),
            None => defaults()?.add_source(File::with_name("fleet").required(false)),
        };
        let cfg: Self = builder
            .add_source(Environment::with_prefix("FLEET").separator("__"))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from defaults plus `overrides`, without touching files or the
    /// environment.
    #[cfg(test)]
    pub fn load_for_test(toml: &str, overrides: &[(&str, &str)]) -> Result<Self, ConfigError> {
        let mut builder =
            defaults()?.add_source(File::from_str(toml, config::FileFormat::Toml));
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Replace the service address, e.g. from `--base-url`, and check it
    /// like any other source.
    pub fn with_base_url(mut self, base_url: String) -> Result<Self, ConfigError> {
        self.api.base_url = base_url;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Message(format!(
                "api.base_url must be an http(s) URL, got '{url}'"
            )));
        }
        Ok(())
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("api.base_url", DEFAULT_BASE_URL)?
        .set_default("logging.level", default_log_level())?
        .set_default("logging.format", default_log_format())
}
