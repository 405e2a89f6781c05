use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::fetcher::gemini;
use crate::scripture;
use crate::store::DEFAULT_PROFILE_ID;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Content generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key for the Gemini API
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model name (e.g., "gemini-2.5-flash")
    pub model: String,
    /// API base URL
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: gemini::DEFAULT_MODEL.to_string(),
            base_url: gemini::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Scripture lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptureConfig {
    pub base_url: String,
    /// Translation code (e.g., "kjv", "web")
    pub translation: String,
}

impl Default for ScriptureConfig {
    fn default() -> Self {
        Self {
            base_url: scripture::DEFAULT_BASE_URL.to_string(),
            translation: scripture::DEFAULT_TRANSLATION.to_string(),
        }
    }
}

/// Remote mirror configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Simulated round-trip latency in milliseconds
    pub latency_ms: u64,
    /// URL probed to decide whether the session starts online
    pub health_url: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            latency_ms: crate::store::DEFAULT_LATENCY.as_millis() as u64,
            health_url: None,
        }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the profile record
    pub data_dir: ConfigValue<PathBuf>,
    /// Identifier of the profile record
    pub profile_id: ConfigValue<String>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    pub gemini: GeminiConfig,
    pub scripture: ScriptureConfig,
    pub remote: RemoteConfig,
    /// Start sessions offline regardless of the probe
    pub offline: bool,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    profile_id: Option<String>,
    gemini: Option<GeminiConfig>,
    scripture: Option<ScriptureConfig>,
    remote: Option<RemoteConfig>,
    offline: Option<bool>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut profile_id =
            ConfigValue::new(DEFAULT_PROFILE_ID.to_string(), ConfigSource::Default);
        let mut config_file = None;
        let mut gemini = GeminiConfig::default();
        let mut scripture = ScriptureConfig::default();
        let mut remote = RemoteConfig::default();
        let mut offline = false;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(id) = file_config.profile_id {
                profile_id = ConfigValue::new(id, ConfigSource::File);
            }
            if let Some(g) = file_config.gemini {
                gemini = g;
            }
            if let Some(s) = file_config.scripture {
                scripture = s;
            }
            if let Some(r) = file_config.remote {
                remote = r;
            }
            if let Some(o) = file_config.offline {
                offline = o;
            }
        }

        // Apply environment variable overrides
        if let Ok(dir) = std::env::var("DAILYBREAD_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(id) = std::env::var("DAILYBREAD_PROFILE_ID") {
            profile_id = ConfigValue::new(id, ConfigSource::Environment);
        }
        if let Ok(key) =
            std::env::var("DAILYBREAD_GEMINI_API_KEY").or_else(|_| std::env::var("GEMINI_API_KEY"))
        {
            gemini.api_key = Some(key);
        }
        if let Ok(model) = std::env::var("DAILYBREAD_GEMINI_MODEL") {
            gemini.model = model;
        }
        if let Ok(value) = std::env::var("DAILYBREAD_OFFLINE") {
            offline = is_truthy(&value);
        }

        Ok(Self {
            data_dir,
            profile_id,
            config_file,
            gemini,
            scripture,
            remote,
            offline,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/dailybread/
    /// - macOS: ~/Library/Application Support/dailybread/
    /// - Windows: %APPDATA%/dailybread/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dailybread")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/dailybread/
    /// - macOS: ~/Library/Application Support/dailybread/
    /// - Windows: %APPDATA%/dailybread/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dailybread")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
