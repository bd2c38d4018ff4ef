use super::credentials::AdminCredentials;
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use std::{fs, path::Path, path::PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com";

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub retries: usize,
    pub retry_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            retries: 2,
            retry_delay_ms: 500,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// How long panel messages stay visible.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct MessageConfig {
    /// Conversion and single rate results.
    pub result_secs: u64,
    /// Prompts, errors and the quota message.
    pub notice_secs: u64,
}

impl Default for MessageConfig {
    fn default() -> Self {
        MessageConfig {
            result_secs: 10,
            notice_secs: 3,
        }
    }
}

impl MessageConfig {
    pub fn result_ttl(&self) -> Duration {
        Duration::from_secs(self.result_secs)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub messages: MessageConfig,
}

impl AppConfig {
    /// Loads the default config file, falling back to defaults when it does
    /// not exist.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "xrate")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

/// Secrets read from the environment and an optional dotenv file.
#[derive(Debug, Clone)]
pub struct Secrets {
    api_key: Option<String>,
    pub admin: AdminCredentials,
}

impl Secrets {
    pub const API_KEY: &'static str = "API_KEY";
    pub const ADMIN: &'static str = "ADMIN";
    pub const PASSWORD: &'static str = "PASSWORD";

    /// Reads secrets from the process environment, then from `env_file`
    /// (default `.env` in the working directory). Environment variables win
    /// over file entries. A missing default file is not an error.
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        let file_vars = match env_file {
            Some(path) => read_env_file(path)?,
            None => {
                let path = Path::new(".env");
                if path.exists() {
                    read_env_file(path)?
                } else {
                    debug!("No .env file in working directory");
                    HashMap::new()
                }
            }
        };

        Ok(Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| file_vars.get(key).cloned())
        }))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let admin = AdminCredentials::new(non_empty(Self::ADMIN), non_empty(Self::PASSWORD));
        if !admin.is_configured() {
            warn!("ADMIN or PASSWORD is not set, quota checks will be refused");
        }
        Secrets {
            api_key: non_empty(Self::API_KEY),
            admin,
        }
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow!("API_KEY is not set. Add it to the environment or to a .env file")
        })
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    debug!("Reading secrets from {}", path.display());
    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to read env file: {}", path.display()))?;
    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) =
            item.with_context(|| format!("Failed to parse env file: {}", path.display()))?;
        vars.insert(key, value);
    }
    Ok(vars)
}
