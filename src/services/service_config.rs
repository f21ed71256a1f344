use std::env;
use std::fs;

use serde::Deserialize;
use thiserror::Error;

pub const BASE_URL_ENV: &str = "BANNER_SIM_URL";
pub const TIMEOUT_ENV: &str = "BANNER_SIM_TIMEOUT_SECS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("base_url must start with http:// or https://, got '{0}'")]
    InvalidBaseUrl(String),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

/// Where the simulation service lives and how the chart is sized.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            chart_width: 900,
            chart_height: 600,
        }
    }
}

impl ServiceConfig {
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Defaults, then the optional YAML file, then the environment, then `url_override`.
    pub fn load(config_path: Option<&str>, url_override: Option<&str>) -> Result<Self, ConfigError> {
        let config = match config_path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        let mut config = config.apply_env(|name| env::var(name).ok())?;
        if let Some(url) = url_override {
            config.base_url = url.to_string();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            self.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: TIMEOUT_ENV,
                value: raw.clone(),
            })?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::NotPositive("timeout_secs"));
        }
        if self.chart_width == 0 {
            return Err(ConfigError::NotPositive("chart_width"));
        }
        if self.chart_height == 0 {
            return Err(ConfigError::NotPositive("chart_height"));
        }
        Ok(())
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
