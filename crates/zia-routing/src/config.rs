//! Configuration types for routing, execution, oracle, and search settings.

use crate::error::{Result, RoutingError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use zia_core::Capability;

/// Env var key for the Gemini API key.
const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Env var key for the search API key.
const ENV_SEARCH_API_KEY: &str = "GOOGLE_SEARCH_API_KEY";
/// Env var key for the custom search engine id.
const ENV_SEARCH_CSE_ID: &str = "GOOGLE_CSE_ID";

/// Complete orchestrator configuration.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Single-task routing configuration
    pub routing: RouterConfig,
    /// Multi-step execution configuration
    pub execution: ExecutionConfig,
    /// Oracle configuration
    pub oracle: OracleConfig,
    /// Web search handler configuration
    pub search: SearchConfig,
}

/// Single-task routing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Type used when a request matches nothing else
    pub default_type: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_type: Capability::LlmResponse.as_str().to_owned(),
        }
    }
}

/// Multi-step execution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Longest decomposition accepted; longer plans fall back to the original task
    pub max_subtasks: usize,
    /// Maximum number of sub-tasks dispatched at once in concurrent mode
    pub max_concurrent: usize,
    /// Per-dispatch timeout in seconds (0 disables)
    pub dispatch_timeout_seconds: u64,
    /// Return every result instead of only the last on full success
    pub return_all_results: bool,
}

impl ExecutionConfig {
    /// Dispatch timeout, if enabled.
    pub fn dispatch_timeout(&self) -> Option<Duration> {
        (self.dispatch_timeout_seconds > 0)
            .then(|| Duration::from_secs(self.dispatch_timeout_seconds))
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_subtasks: 16,
            max_concurrent: 8,
            dispatch_timeout_seconds: 120,
            return_all_results: false,
        }
    }
}

/// Oracle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Whether the oracle is consulted at all
    pub enabled: bool,
    /// Model name
    pub model: String,
    /// Timeout in seconds for each oracle call
    pub timeout_seconds: u64,
    /// API key; falls back to `GEMINI_API_KEY`
    pub api_key: Option<String>,
}

impl OracleConfig {
    /// Timeout applied to each oracle call.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "gemini-1.5-flash-latest".to_owned(),
            timeout_seconds: 30,
            api_key: None,
        }
    }
}

/// Web search handler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search API key; falls back to `GOOGLE_SEARCH_API_KEY`
    pub api_key: Option<String>,
    /// Custom search engine id; falls back to `GOOGLE_CSE_ID`
    pub cse_id: Option<String>,
    /// Results requested when a task doesn't say
    pub default_results: usize,
    /// Upper bound on requested results
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            cse_id: None,
            default_results: 3,
            max_results: 10,
        }
    }
}

impl RoutingConfig {
    /// Get the default config directory path (`~/.zia`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_dir() -> Result<PathBuf> {
        use dirs::home_dir;
        let home = home_dir()
            .ok_or_else(|| RoutingError::Config("Could not determine home directory".to_owned()))?;
        Ok(home.join(".zia"))
    }

    /// Get the default config file path (`~/.zia/config.toml`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location, creating it with defaults if missing
    ///
    /// # Errors
    /// Returns an error if the config cannot be read or created
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            let config = Self::default();
            config.save_to_file(&config_path)?;
            Ok(config)
        }
    }

    /// Load config from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self> {
        use toml::from_str;
        let contents = fs::read_to_string(path)
            .map_err(|error| RoutingError::Config(format!("Failed to read config: {error}")))?;
        from_str(&contents)
            .map_err(|error| RoutingError::Config(format!("Failed to parse config: {error}")))
    }

    /// Save config to a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        use toml::to_string_pretty;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = to_string_pretty(self)
            .map_err(|error| RoutingError::Config(format!("Failed to serialize config: {error}")))?;

        let header = "# Zia Configuration File\n\
                      # This file is automatically generated on first run\n\
                      # Edit this file to customize your settings\n\n";

        fs::write(path, format!("{header}{contents}"))?;

        Ok(())
    }

    /// Gemini API key, checking config first, then the environment
    pub fn oracle_api_key(&self) -> Option<String> {
        self.oracle
            .api_key
            .clone()
            .or_else(|| env::var(ENV_GEMINI_API_KEY).ok())
            .filter(|key| !key.is_empty())
    }

    /// Search API key, checking config first, then the environment
    pub fn search_api_key(&self) -> Option<String> {
        self.search
            .api_key
            .clone()
            .or_else(|| env::var(ENV_SEARCH_API_KEY).ok())
            .filter(|key| !key.is_empty())
    }

    /// Custom search engine id, checking config first, then the environment
    pub fn search_cse_id(&self) -> Option<String> {
        self.search
            .cse_id
            .clone()
            .or_else(|| env::var(ENV_SEARCH_CSE_ID).ok())
            .filter(|id| !id.is_empty())
    }
}
