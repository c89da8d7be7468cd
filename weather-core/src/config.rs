use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use crate::{
    dispatcher::WeatherQueryDispatcher,
    gazetteer::Gazetteer,
    query::{Endpoint, OPENWEATHER_CURRENT_URL},
    resolver::{AliasTable, CityResolver},
    transport::{HttpTransport, http::DEFAULT_TIMEOUT_SECS},
};

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

fn default_country_code() -> String {
    "IN".to_string()
}

fn default_base_url() -> String {
    OPENWEATHER_CURRENT_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// country_code = "IN"
///
/// [aliases]
/// poona = "pune"
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Appended to free-text queries, e.g. `q=Shimla,IN`.
    #[serde(default = "default_country_code")]
    pub country_code: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// JSON gazetteer to use instead of the bundled one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gazetteer_path: Option<PathBuf>,

    /// Extra colloquial names on top of the built-in aliases.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            country_code: default_country_code(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            gazetteer_path: None,
            aliases: HashMap::new(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("country_code", &self.country_code)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("gazetteer_path", &self.gazetteer_path)
            .field("aliases", &self.aliases)
            .finish()
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    /// `OPENWEATHER_API_KEY` takes precedence over the stored key.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;

        if let Ok(key) = std::env::var(API_KEY_ENV)
            && !key.trim().is_empty()
        {
            cfg.api_key = Some(key);
        }

        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
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

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Returns the API key or a hint on how to configure one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `weather configure` or set {API_KEY_ENV}."
                )
            })
    }

    /// Configured gazetteer file, or the bundled dataset.
    pub fn gazetteer(&self) -> Result<Gazetteer> {
        match &self.gazetteer_path {
            Some(path) => Gazetteer::load(path),
            None => Gazetteer::bundled(),
        }
    }

    pub fn alias_table(&self) -> AliasTable {
        AliasTable::with_extra(&self.aliases)
    }

    /// Resolver over the configured gazetteer; a missing or corrupt file is an error.
    pub fn city_resolver(&self) -> Result<CityResolver> {
        Ok(CityResolver::new(Arc::new(self.gazetteer()?), self.alias_table()))
    }

    pub fn endpoint(&self) -> Result<Endpoint> {
        Endpoint::new(&self.base_url, self.require_api_key()?)
    }

    /// Dispatcher talking HTTP to the configured endpoint.
    pub fn dispatcher(&self) -> Result<WeatherQueryDispatcher> {
        let transport = HttpTransport::new(Duration::from_secs(self.timeout_secs))?;
        Ok(WeatherQueryDispatcher::new(
            self.endpoint()?,
            self.country_code.clone(),
            Box::new(transport),
        ))
    }
}
