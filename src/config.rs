//! Configuration for the directory client and server
//!
//! Both configs load from YAML and can be overridden from the environment.
//! They are passed explicitly to `RemoteClient::new` and `HttpServer::new`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_API_URL: &str = "DIRECTORY_API_URL";
pub const ENV_API_KEY: &str = "DIRECTORY_API_KEY";
pub const ENV_ADDRESS: &str = "DIRECTORY_ADDRESS";
pub const ENV_PORT: &str = "DIRECTORY_PORT";
pub const ENV_ROSTER_CSV: &str = "DIRECTORY_ROSTER_CSV";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where the directory service lives and how to authenticate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Sent verbatim in the `Authorization` header
    pub api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            api_key: String::new(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }

    /// Apply `DIRECTORY_API_URL` and `DIRECTORY_API_KEY`
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_URL) {
            self.base_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = key;
        }
        self
    }

    /// Absolute URL of a route
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Directory service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Required in the `Authorization` header of every protected route
    pub api_key: String,
    /// CSV loaded at startup, if any
    pub roster_csv: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 5000,
            api_key: String::new(),
            roster_csv: None,
        }
    }
}

impl ServerConfig {
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }

    /// Apply `DIRECTORY_ADDRESS`, `DIRECTORY_PORT`, `DIRECTORY_API_KEY` and
    /// `DIRECTORY_ROSTER_CSV`
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        if let Some(address) = lookup(ENV_ADDRESS) {
            self.address = address;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_PORT.to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(path) = lookup(ENV_ROSTER_CSV) {
            self.roster_csv = Some(PathBuf::from(path));
        }
        Ok(self)
    }

    /// `address:port`, as handed to the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}
