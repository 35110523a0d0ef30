use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_VIACEP_BASE_URL: &str = "http://viacep.com.br";
pub const DEFAULT_WEATHERAPI_BASE_URL: &str = "http://api.weatherapi.com/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Service configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// weather_api_key = "..."
/// listen_addr = "127.0.0.1:8080"
/// request_timeout_secs = 5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Secret for WeatherAPI.com; required before any lookup can run.
    pub weather_api_key: Option<String>,

    pub viacep_base_url: String,
    pub weatherapi_base_url: String,

    /// Upper bound for each outbound request.
    pub request_timeout_secs: u64,

    pub listen_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weather_api_key: None,
            viacep_base_url: DEFAULT_VIACEP_BASE_URL.to_string(),
            weatherapi_base_url: DEFAULT_WEATHERAPI_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

impl Config {
    /// Load config from the platform config directory, or return defaults if
    /// the file doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
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
        let dirs = ProjectDirs::from("dev", "cep-weather", "cep-weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlay values from environment-style variables. `lookup` is usually
    /// `|k| std::env::var(k).ok()`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("WEATHER_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.weather_api_key = Some(key);
        }
        if let Some(url) = lookup("VIACEP_BASE_URL") {
            self.viacep_base_url = url;
        }
        if let Some(url) = lookup("WEATHERAPI_BASE_URL") {
            self.weatherapi_base_url = url;
        }
        if let Some(secs) = lookup("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("REQUEST_TIMEOUT_SECS is not a number: {secs:?}"))?;
        }
        if let Some(addr) = lookup("LISTEN_ADDR") {
            self.listen_addr = addr;
        }

        Ok(())
    }

    /// Returns the WeatherAPI key, or an error explaining how to set one.
    pub fn weather_api_key(&self) -> Result<&str> {
        self.weather_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No WeatherAPI key configured.\n\
                     Hint: run `cep-weather configure` or set WEATHER_API_KEY."
                )
            })
    }

    pub fn set_weather_api_key(&mut self, api_key: String) {
        self.weather_api_key = Some(api_key);
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
