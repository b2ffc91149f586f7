use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::client::Connection;

/// Environment variable for the service base URL.
pub const URL_ENV: &str = "ARTIFACTORY_URL";
/// Environment variable for the basic-auth username.
pub const USERNAME_ENV: &str = "ARTIFACTORY_AUTH_USERNAME";
/// Environment variable for the basic-auth password.
pub const PASSWORD_ENV: &str = "ARTIFACTORY_AUTH_PASSWORD";

/// Provider settings loaded from `~/.config/artifacts/config.toml`, then
/// overridden by environment and command line.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the storage service, e.g. `https://repo.example.com/artifactory`.
    #[serde(default)]
    pub url: Option<String>,
    /// Username for basic auth. Requires `password`.
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ProviderConfig {
    /// Fields set in `other` replace ours.
    pub fn merge(mut self, other: ProviderConfig) -> Self {
        if other.url.is_some() {
            self.url = other.url;
        }
        if other.username.is_some() {
            self.username = other.username;
        }
        if other.password.is_some() {
            self.password = other.password;
        }
        self
    }

    /// Values from the `ARTIFACTORY_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            url: get(URL_ENV),
            username: get(USERNAME_ENV),
            password: get(PASSWORD_ENV),
        }
    }

    /// Validate into a `Connection`: `url` is required and a username must
    /// come with a password.
    pub fn connection(&self) -> Result<Connection> {
        let url = self
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .with_context(|| {
                format!(
                    "no service URL configured (set `url` in the config file, {} or --url)",
                    URL_ENV
                )
            })?;
        let conn = Connection::new(url, self.username.as_deref(), self.password.as_deref())?;
        Ok(conn)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("artifacts")?;
    Ok(xdg_dirs.get_config_file("config.toml"))
}

/// Load configuration from disk. A missing file yields an empty config; no
/// file is written since there is no usable default URL.
pub fn load() -> Result<ProviderConfig> {
    load_from(&config_path()?)
}

pub fn load_from(path: &Path) -> Result<ProviderConfig> {
    if !path.exists() {
        tracing::debug!("no config file at {}", path.display());
        return Ok(ProviderConfig::default());
    }
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: ProviderConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

/// File, then environment, then `overrides` (typically command-line flags).
pub fn resolve(overrides: ProviderConfig) -> Result<ProviderConfig> {
    Ok(load()?.merge(ProviderConfig::from_env()).merge(overrides))
}
