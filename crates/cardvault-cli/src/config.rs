//! Configuration file and effective settings.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use cardvault_core::UserId;
use cardvault_file::FileStore;
use cardvault_scryfall::{
    ApiUrl, DEFAULT_API_URL, FetchClient, RateLimiter, RetryPolicy, ScryfallGateway,
};
use cardvault_server::TokenMap;

use crate::cli::GlobalArgs;

const CONFIG_FILE: &str = "config.json";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "cardvault").context("Could not determine config directory")
}

/// Settings read from `config.json`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address `serve` binds to.
    pub listen: String,
    pub data_dir: Option<PathBuf>,
    pub scryfall_url: String,
    pub min_interval_ms: u64,
    pub retry_backoff_ms: u64,
    pub request_timeout_secs: u64,
    /// Bearer token to user id.
    pub tokens: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:3000".to_string(),
            data_dir: None,
            scryfall_url: DEFAULT_API_URL.to_string(),
            min_interval_ms: RateLimiter::DEFAULT_INTERVAL.as_millis() as u64,
            retry_backoff_ms: RetryPolicy::default().backoff.as_millis() as u64,
            request_timeout_secs: 30,
            tokens: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Read the config file, if any, and apply command line overrides.
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let path = match &args.config {
            Some(path) => path.clone(),
            None => project_dirs()?.config_dir().join(CONFIG_FILE),
        };

        let mut settings = Self::read(&path)?;
        if let Some(dir) = &args.data_dir {
            settings.data_dir = Some(dir.clone());
        }
        if let Some(url) = &args.scryfall_url {
            settings.scryfall_url = url.clone();
        }
        Ok(settings)
    }

    /// Parse `path`; a missing file yields the defaults.
    fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }

    pub fn store(&self) -> Result<FileStore> {
        Ok(FileStore::new(self.data_dir()?))
    }

    pub fn gateway(&self) -> Result<ScryfallGateway> {
        let api = ApiUrl::new(&self.scryfall_url).context("Invalid Scryfall URL")?;
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(self.min_interval_ms)));
        let retry = RetryPolicy {
            backoff: Duration::from_millis(self.retry_backoff_ms),
            ..RetryPolicy::default()
        };
        let fetch = FetchClient::new(
            limiter,
            retry,
            Duration::from_secs(self.request_timeout_secs),
        )
        .context("Failed to create HTTP client")?;
        Ok(ScryfallGateway::new(api, fetch))
    }

    /// Validated token map for the HTTP API.
    pub fn token_map(&self) -> Result<TokenMap> {
        self.tokens
            .iter()
            .map(|(token, user)| -> Result<(String, UserId)> {
                let user = UserId::new(user.as_str())
                    .with_context(|| format!("Invalid user id '{}' in tokens", user))?;
                Ok((token.clone(), user))
            })
            .collect()
    }
}
