use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::FavoriteCity;
use crate::normalize::DEFAULT_SEARCH_LIMIT;

pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,

    /// Maximum number of city candidates requested from geocoding.
    pub search_limit: usize,

    /// Example TOML:
    /// base_url = "http://localhost:8080"
    pub base_url: Option<String>,

    pub favorites_path: Option<PathBuf>,

    /// Location used by `show` when none is given.
    pub default_location: Option<FavoriteCity>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            search_limit: DEFAULT_SEARCH_LIMIT,
            base_url: None,
            favorites_path: None,
            default_location: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "skyview", "skyview")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Favorites file: the configured override, else `favorites.json` in the data directory.
    pub fn favorites_file_path(&self) -> Result<PathBuf> {
        match &self.favorites_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join("favorites.json")),
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// API key from the environment if set, else from the file.
    pub fn api_key(&self) -> Result<String> {
        let from_env = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
        Self::resolve_api_key(from_env, self.api_key.as_deref())
    }

    fn resolve_api_key(from_env: Option<String>, from_file: Option<&str>) -> Result<String> {
        from_env
            .or_else(|| from_file.map(str::to_owned))
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `skyview configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn default_location(&self) -> Result<&FavoriteCity> {
        self.default_location.as_ref().ok_or_else(|| {
            anyhow!(
                "No location given and no default location configured.\n\
                 Hint: pass `--lat/--lon`, `--city` or `--favorite`, or run `skyview configure`."
            )
        })
    }
}
