//! Connection settings shared by the extension and distant clients.
//!
//! Defaults can be overridden from a JSON file, from environment variables,
//! or from the REAPER ExtState, where the extension keeps its copy.
use crate::{
    errors::{ReapyError, ReapyResult},
    Call, Host,
};
use log::debug;
use serde_derive::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

/// ExtState section holding the extension settings.
pub const EXT_STATE_SECTION: &str = "reapy";
/// ExtState key of the serialized [Config].
pub const EXT_STATE_KEY: &str = "config";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 2306,
        }
    }
}
impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.address())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            connect_timeout_ms: 5000,
            request_timeout_ms: 10000,
        }
    }
}
impl Config {
    /// Read config from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> ReapyResult<Self> {
        let path = path.as_ref();
        debug!("load config from {:?}", path);
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ReapyResult<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn from_json(text: &str) -> ReapyResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Override fields with `REAPY_HOST`, `REAPY_PORT` and
    /// `REAPY_TIMEOUT_MS`.
    pub fn with_env(self) -> ReapyResult<Self> {
        self.with_vars(|key| std::env::var(key).ok())
    }

    fn with_vars(
        mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> ReapyResult<Self> {
        if let Some(host) = var("REAPY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("REAPY_PORT") {
            self.server.port = port.parse().map_err(|_| {
                ReapyError::Config(format!("REAPY_PORT: {}", port))
            })?;
        }
        if let Some(timeout) = var("REAPY_TIMEOUT_MS") {
            self.request_timeout_ms = timeout.parse().map_err(|_| {
                ReapyError::Config(format!("REAPY_TIMEOUT_MS: {}", timeout))
            })?;
        }
        Ok(self)
    }

    /// Config persisted in the host ExtState, if any.
    pub fn stored_in_host(host: &dyn Host) -> ReapyResult<Option<Self>> {
        let has = host
            .call(Call::HasExtState {
                section: EXT_STATE_SECTION.to_string(),
                key: EXT_STATE_KEY.to_string(),
            })?
            .into_bool()?;
        if !has {
            return Ok(None);
        }
        let text = host
            .call(Call::GetExtState {
                section: EXT_STATE_SECTION.to_string(),
                key: EXT_STATE_KEY.to_string(),
            })?
            .into_string()?;
        Self::from_json(&text).map(Some)
    }

    /// Config persisted in the host ExtState, or default if none.
    pub fn load_from_host(host: &dyn Host) -> ReapyResult<Self> {
        Ok(Self::stored_in_host(host)?.unwrap_or_default())
    }

    /// Like [Config::load_from_host], but writes the defaults to the host
    /// when nothing is stored yet, so they can be edited.
    pub fn load_or_init_in_host(host: &dyn Host) -> ReapyResult<Self> {
        match Self::stored_in_host(host)? {
            Some(config) => Ok(config),
            None => {
                let config = Self::default();
                config.save_to_host(host)?;
                Ok(config)
            }
        }
    }

    pub fn save_to_host(&self, host: &dyn Host) -> ReapyResult<()> {
        host.call(Call::SetExtState {
            section: EXT_STATE_SECTION.to_string(),
            key: EXT_STATE_KEY.to_string(),
            value: serde_json::to_string(self)?,
            persist: true,
        })?
        .into_unit()
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
