//! Configuration management for Lotlift.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration.
///
/// This is loaded from `~/.config/lotlift/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Page scan behavior settings
    pub scan: ScanConfig,
    /// Ollama integration settings
    pub ollama: OllamaConfig,
    /// Image download settings
    pub download: DownloadConfig,
    /// Form replay behavior settings
    pub replay: ReplayConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `LOTLIFT_HEADLESS`: Override browser headless mode (true/false)
    /// - `LOTLIFT_OLLAMA_URL`: Override the Ollama server URL
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        // Override from environment
        if let Ok(val) = std::env::var("LOTLIFT_HEADLESS") {
            if let Ok(headless) = val.parse() {
                config.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Ok(val) = std::env::var("LOTLIFT_OLLAMA_URL") {
            if !val.is_empty() {
                tracing::debug!("Override ollama.url from env: {}", val);
                config.ollama.url = val;
            }
        }

        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/lotlift/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "lotlift", "lotlift").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Honors `LOTLIFT_DATA_DIR`, otherwise uses XDG base directories:
    /// `~/.local/share/lotlift`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        if let Ok(dir) = std::env::var("LOTLIFT_DATA_DIR") {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        let dirs =
            ProjectDirs::from("com", "lotlift", "lotlift").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Navigation timeout in seconds
    pub navigation_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            navigation_timeout_secs: 30,
        }
    }
}

/// Page scan behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Milliseconds to let the page settle after navigation
    pub settle_ms: u64,
    /// Clicks issued to a gallery's next-arrow while harvesting
    pub gallery_advance_clicks: u32,
    /// Delay between gallery advance clicks in milliseconds
    pub gallery_click_delay_ms: u64,
    /// Delay after each lazy-load scroll in milliseconds
    pub scroll_delay_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            settle_ms: 1500,
            gallery_advance_clicks: 25,
            gallery_click_delay_ms: 100,
            scroll_delay_ms: 200,
        }
    }
}

/// Ollama integration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Ollama server URL
    pub url: String,
    /// Request timeout in seconds; generation on CPU can be slow
    pub request_timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434".to_string(),
            request_timeout_secs: 120,
        }
    }
}

/// Image download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Delay between downloads in milliseconds
    pub delay_ms: u64,
    /// Directory downloads are placed under; data dir when unset
    pub dir: Option<PathBuf>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            delay_ms: 100,
            dir: None,
        }
    }
}

/// Form replay behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// How long to poll for a labeled control in milliseconds
    pub resolve_timeout_ms: u64,
    /// Interval between resolution polls in milliseconds
    pub resolve_interval_ms: u64,
    /// How long to wait for a dropdown popup in milliseconds
    pub popup_wait_ms: u64,
    /// Pause between interaction steps within a field in milliseconds
    pub step_pause_ms: u64,
    /// Pause between fields in milliseconds
    pub field_pause_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            resolve_timeout_ms: 12_000,
            resolve_interval_ms: 150,
            popup_wait_ms: 3_000,
            step_pause_ms: 300,
            field_pause_ms: 400,
        }
    }
}
