use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub flickr: FlickrConfig,
  pub cache: CacheConfig,
  pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlickrConfig {
  /// Flickr REST endpoint
  pub endpoint: String,
  /// Photos fetched per page
  pub per_page: u32,
}

impl Default for FlickrConfig {
  fn default() -> Self {
    Self {
      endpoint: "https://api.flickr.com/services/rest/".to_string(),
      per_page: 20,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// Persist the home feed between runs
  pub enabled: bool,
  /// Seconds before the cached home feed expires
  pub ttl_secs: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      ttl_secs: 5 * 60,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
  /// Quiet period after the last keystroke before a search is dispatched
  pub debounce_ms: u64,
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self { debounce_ms: 800 }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./flickgrid.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/flickgrid/config.yaml
  ///
  /// Every setting has a default, so a missing file just yields them.
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
    let local = PathBuf::from("flickgrid.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("flickgrid").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// Get the Flickr API key from environment variables.
  ///
  /// Checks FLICKGRID_API_KEY first, then FLICKR_API_KEY as fallback.
  pub fn get_api_key() -> Result<String> {
    std::env::var("FLICKGRID_API_KEY")
      .or_else(|_| std::env::var("FLICKR_API_KEY"))
      .map_err(|_| {
        eyre!(
          "Flickr API key not found. Set FLICKGRID_API_KEY or FLICKR_API_KEY environment variable."
        )
      })
  }
}
