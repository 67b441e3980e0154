//! Service configuration: optional YAML file, then `.env` / environment overrides.

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::exchange::bingx::{BingxClient, BingxCredentials, BINGX_API_URL};

pub const API_KEY_ENV: &str = "BINGX_API_KEY";
pub const SECRET_KEY_ENV: &str = "BINGX_SECRET_KEY";
pub const BASE_URL_ENV: &str = "BINGX_BASE_URL";
pub const RECV_WINDOW_ENV: &str = "BINGX_RECV_WINDOW_MS";

const PLACEHOLDER_API_KEY: &str = "your_api_key";
const PLACEHOLDER_SECRET_KEY: &str = "your_secret_key";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BingxSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub recv_window_ms: Option<u64>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    BINGX_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for BingxSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            secret_key: None,
            base_url: default_base_url(),
            recv_window_ms: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ServiceConfig {
    #[serde(default)]
    pub bingx: BingxSettings,
}

impl ServiceConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("invalid service config")
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Environment values win over whatever the file set
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(api_key) = lookup(API_KEY_ENV) {
            self.bingx.api_key = Some(api_key);
        }
        if let Some(secret_key) = lookup(SECRET_KEY_ENV) {
            self.bingx.secret_key = Some(secret_key);
        }
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            self.bingx.base_url = base_url;
        }
        if let Some(recv_window) = lookup(RECV_WINDOW_ENV) {
            match recv_window.parse() {
                Ok(ms) => self.bingx.recv_window_ms = Some(ms),
                Err(_) => warn!("⚠️ Ignoring {}={}: not a number", RECV_WINDOW_ENV, recv_window),
            }
        }
    }

    /// Configured key pair, or placeholders the exchange will reject
    pub fn credentials(&self) -> BingxCredentials {
        let set = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
        match (set(&self.bingx.api_key), set(&self.bingx.secret_key)) {
            (Some(api_key), Some(secret_key)) => BingxCredentials::new(api_key, secret_key),
            _ => {
                warn!(
                    "⚠️ {} / {} not set, using placeholder credentials",
                    API_KEY_ENV, SECRET_KEY_ENV
                );
                BingxCredentials::new(PLACEHOLDER_API_KEY, PLACEHOLDER_SECRET_KEY)
            }
        }
    }

    pub fn build_client(&self) -> BingxClient {
        BingxClient::new(self.credentials())
            .with_api_url(self.bingx.base_url.clone())
            .with_recv_window(self.bingx.recv_window_ms)
            .with_timeout(Duration::from_secs(self.bingx.timeout_secs))
    }
}

/// Load `path` (if any), then `.env`, then the process environment
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    dotenvy::dotenv().ok();

    let mut config = match path {
        Some(path) => ServiceConfig::from_yaml_file(path)?,
        None => ServiceConfig::default(),
    };
    config.apply_env(|key| std::env::var(key).ok());

    Ok(config)
}
