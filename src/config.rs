use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_API_URL: &str = "https://notehub-public.goit.study/api";

/// Environment variable holding the bearer token
pub const TOKEN_ENV: &str = "NOTEHUB_TOKEN";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Base URL of the NoteHub API
  pub api_url: String,
  /// Notes requested per page
  pub per_page: u32,
  /// Minutes a fetched page stays fresh
  pub stale_minutes: u64,
  /// Quiet period before a search term is applied
  pub debounce_ms: u64,
  /// Bearer token; the environment variable takes precedence
  pub token: Option<String>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api_url: DEFAULT_API_URL.to_string(),
      per_page: 12,
      stale_minutes: 5,
      debounce_ms: 500,
      token: None,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./notehub.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/notehub/config.yaml
  ///
  /// Without any file the defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("notehub.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("notehub").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    let mut config: Self = serde_yaml::from_str(contents)?;
    config.per_page = config.per_page.max(1);
    Ok(config)
  }

  /// Get the API token.
  ///
  /// Checks NOTEHUB_TOKEN first, then the `token` config field. Blank values
  /// count as unset.
  pub fn api_token(&self) -> Result<String, ConfigError> {
    std::env::var(TOKEN_ENV)
      .ok()
      .or_else(|| self.token.clone())
      .filter(|t| !t.trim().is_empty())
      .ok_or(ConfigError::MissingToken)
  }

  pub fn stale_time(&self) -> Duration {
    Duration::from_secs(self.stale_minutes * 60)
  }

  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.debounce_ms)
  }
}
