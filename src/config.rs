//! Runtime configuration.
//!
//! Sources, later ones win:
//! - built-in defaults
//! - `config.toml` (or the file named by `GATEHOUSE_CONFIG`)
//! - `GATEHOUSE_*` environment variables, nested with `__`
//!   (e.g. `GATEHOUSE_BASIC__SECRET_KEY`)

use axum_extra::extract::cookie::Key;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::GatehouseError;

pub const CONFIG_PATH_ENV: &str = "GATEHOUSE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";
const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub basic: BasicConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Key material for the session and flash cookies. Empty means a random
    /// key per process.
    pub secret_key: String,
    /// Drop the `Secure` cookie attribute so plain-HTTP development works.
    pub insecure_cookie: bool,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite://gatehouse.db".to_string(),
            loglevel: "info".to_string(),
            secret_key: String::new(),
            insecure_cookie: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, GatehouseError> {
        let config: Self = Self::figment().extract()?;
        Ok(config)
    }

    pub fn figment() -> Figment {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("GATEHOUSE_").split("__"))
    }

    /// Build the cookie key. `None` when no secret is configured.
    pub fn cookie_key(&self) -> Result<Option<Key>, GatehouseError> {
        let secret = self.basic.secret_key.as_bytes();
        if secret.is_empty() {
            return Ok(None);
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(GatehouseError::InvalidSecretKey);
        }
        Ok(Some(Key::derive_from(secret)))
    }
}
