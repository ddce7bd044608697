//! Client configuration: backend origin, request timeout, storage location.

use std::{env, path::PathBuf, time::Duration};

use url::Url;

use crate::{
    error::{ClientError, ClientResult}, storage::StorageType
};

pub const DEFAULT_ORIGIN: &str = "https://api.bigbrother.example";

pub const ENV_ORIGIN: &str = "BB_API_ORIGIN";
pub const ENV_TIMEOUT_SECS: &str = "BB_API_TIMEOUT_SECS";
pub const ENV_STORAGE_PATH: &str = "BB_STORAGE_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin every resource path is appended to.
    pub origin: Url,
    /// Per-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub storage: StorageType,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            origin: Url::parse(DEFAULT_ORIGIN).expect("default origin is a valid url"),
            timeout: None,
            storage: StorageType::File(default_storage_path()),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `BB_API_ORIGIN`, `BB_API_TIMEOUT_SECS` and
    /// `BB_STORAGE_PATH` when set and non-empty.
    pub fn from_env() -> ClientResult<Self> {
        let mut config = Self::default();
        if let Some(origin) = non_empty_env(ENV_ORIGIN) {
            config = config.with_origin(&origin)?;
        }
        if let Some(secs) = non_empty_env(ENV_TIMEOUT_SECS) {
            config.timeout = Some(parse_timeout(&secs)?);
        }
        if let Some(path) = non_empty_env(ENV_STORAGE_PATH) {
            config.storage = StorageType::File(PathBuf::from(path));
        }
        Ok(config)
    }

    pub fn with_origin(mut self, origin: &str) -> ClientResult<Self> {
        self.origin = parse_origin(origin)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_storage(mut self, storage: StorageType) -> Self {
        self.storage = storage;
        self
    }
}

/// Only http(s) origins with a host are accepted.
pub fn parse_origin(origin: &str) -> ClientResult<Url> {
    let url = Url::parse(origin.trim()).map_err(|e| ClientError::Config(format!("invalid origin '{}': {}", origin, e)))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ClientError::Config(format!("origin must be an http(s) url: {}", origin)));
    }
    Ok(url)
}

pub fn parse_timeout(secs: &str) -> ClientResult<Duration> {
    match secs.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(ClientError::Config(format!("timeout must be a positive number of seconds: {}", secs))),
        Ok(n) => Ok(Duration::from_secs(n)),
    }
}

pub fn default_storage_path() -> PathBuf {
    preferred_data_dir().join("bigbrother").join("storage.json")
}

fn preferred_data_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| fallback_home().join(".local/share"))
}

fn fallback_home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
