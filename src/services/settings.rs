//! Settings persistence
//!
//! Stores the GitHub username in `~/.contribgraph/settings.json`.

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::types::{ContribError, Result};

/// Default host for profile and calendar URLs
pub const DEFAULT_BASE_URL: &str = "https://github.com";

/// Environment variable overriding the configured username
pub const USER_ENV_VAR: &str = "CONTRIBGRAPH_USER";

/// Persisted user settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            username: None,
            base_url: default_base_url(),
        }
    }
}

impl Settings {
    /// Configured username, ignoring blank values
    pub fn username(&self) -> Option<&str> {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

/// Read access to settings, looked up fresh on every pipeline run
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<Settings>;
}

/// File-backed settings
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    /// Settings at the default location (`~/.contribgraph/settings.json`)
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: app_dir()?.join("settings.json"),
        })
    }

    /// Settings at a custom path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a username. Blank names are rejected.
    pub fn set_username(&self, username: &str) -> Result<Settings> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ContribError::Config("username must not be empty".into()));
        }
        let mut settings = self.load()?;
        settings.username = Some(username.to_string());
        self.save(&settings)?;
        Ok(settings)
    }

    /// Remove the stored username
    pub fn clear_username(&self) -> Result<Settings> {
        let mut settings = self.load()?;
        settings.username = None;
        self.save(&settings)?;
        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| ContribError::Config(format!("Serialization failed: {}", e)))?;
        fs::write(&self.path, content)?;
        log::debug!("saved settings to {}", self.path.display());
        Ok(())
    }
}

impl SettingsStore for SettingsService {
    /// Missing file means defaults; an unreadable or corrupt file is an error
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| {
            ContribError::Config(format!(
                "Invalid settings file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// Settings with a username taken from the command line or environment
pub struct UsernameOverride<S> {
    inner: S,
    username: Option<String>,
}

impl<S: SettingsStore> UsernameOverride<S> {
    pub fn new(inner: S, username: Option<String>) -> Self {
        let username = username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        Self { inner, username }
    }

    /// Override from `--user`, falling back to `CONTRIBGRAPH_USER`
    pub fn from_env(inner: S, cli_username: Option<String>) -> Self {
        Self::from_sources(inner, cli_username, std::env::var(USER_ENV_VAR).ok())
    }

    /// First non-blank of the flag and environment values
    fn from_sources(inner: S, cli_username: Option<String>, env_username: Option<String>) -> Self {
        let username = non_blank(cli_username).or_else(|| non_blank(env_username));
        Self::new(inner, username)
    }
}

impl<S: SettingsStore> SettingsStore for UsernameOverride<S> {
    fn load(&self) -> Result<Settings> {
        let mut settings = self.inner.load()?;
        if let Some(username) = &self.username {
            settings.username = Some(username.clone());
        }
        Ok(settings)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Application directory (`~/.contribgraph`)
pub fn app_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new()
        .ok_or_else(|| ContribError::Config("Cannot determine home directory".into()))?;
    Ok(base_dirs.home_dir().join(".contribgraph"))
}
