//! Configuration types and loading
//!
//! Precedence: CLI `--config` > CONFIG_PATH env var > `vk-login.toml`.
//! The app secret comes from the VK_CLIENT_SECRET env var or `secret_file`,
//! never from the TOML itself.

use common::Secret;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use url::Url;
use vk_api::{ApiConfig, NameCase};

/// Env var holding the app secret
pub const SECRET_ENV: &str = "VK_CLIENT_SECRET";

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    #[serde(default)]
    pub api: ApiConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
}

/// Application registration at vk.com/apps
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub app_id: String,
    pub callback_url: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(skip)]
    pub secret: Option<Secret<String>>,
    /// File containing the app secret (alternative to VK_CLIENT_SECRET)
    #[serde(default)]
    pub secret_file: Option<PathBuf>,
}

/// Local callback receiver
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// What to fetch once logged in
#[derive(Debug, Default, Deserialize)]
pub struct LookupConfig {
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub name_case: NameCase,
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from a TOML file, then resolve the app secret.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if config.app.app_id.trim().is_empty() {
            return Err(common::Error::Config("app.app_id must not be empty".into()));
        }

        let callback = Url::parse(&config.app.callback_url).map_err(|e| {
            common::Error::Config(format!(
                "app.callback_url is not a valid URL ({}): {e}",
                config.app.callback_url
            ))
        })?;
        if callback.cannot_be_a_base() {
            return Err(common::Error::Config(format!(
                "app.callback_url must be a hierarchical URL, got: {}",
                config.app.callback_url
            )));
        }

        if config.server.timeout_secs == 0 {
            return Err(common::Error::Config(
                "server.timeout_secs must be greater than 0".into(),
            ));
        }

        // Env var takes precedence over file
        if let Ok(secret) = std::env::var(SECRET_ENV) {
            config.app.secret = Some(Secret::new(secret));
        } else if let Some(ref secret_file) = config.app.secret_file {
            let secret = std::fs::read_to_string(secret_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read secret_file {}: {e}",
                    secret_file.display()
                ))
            })?;
            let secret = secret.trim().to_owned();
            if !secret.is_empty() {
                config.app.secret = Some(Secret::new(secret));
            }
        }

        if config.app.secret.is_none() {
            return Err(common::Error::Config(format!(
                "app secret missing: set {SECRET_ENV} or app.secret_file"
            )));
        }

        Ok(config)
    }

    /// Path component of the callback URL, used as the route to serve.
    pub fn callback_path(&self) -> String {
        Url::parse(&self.app.callback_url)
            .map(|url| url.path().to_owned())
            .unwrap_or_else(|_| "/callback".to_owned())
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("vk-login.toml")
    }
}
