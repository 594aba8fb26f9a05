//! Configuration system
//!
//! TOML configuration for the shell: which window-management policy to
//! run and the shape of the headless demo scene.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Headless demo scene settings
    pub demo: DemoConfig,
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Window-management policy: "tiling" or "fullscreen"
    pub window_manager: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            window_manager: "tiling".to_string(),
        }
    }
}

/// Headless demo scene settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Display width in pixels
    pub display_width: i32,
    /// Display height in pixels
    pub display_height: i32,
    /// Number of demo sessions to open
    pub sessions: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            display_width: 1920,
            display_height: 1080,
            sessions: 2,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path.map(PathBuf::from).or_else(Self::find_config_file);

        match config_path {
            Some(path) if path.exists() => {
                info!("Loading configuration from {:?}", path);
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {:?}", path))?;

                let config: Config = toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config file: {:?}", path))?;

                Ok(config)
            },
            Some(path) => {
                warn!("Config file not found at {:?}, using defaults", path);
                Ok(Self::default())
            },
            None => {
                info!("No config file found, using defaults");
                Ok(Self::default())
            },
        }
    }

    /// Find the configuration file
    fn find_config_file() -> Option<PathBuf> {
        // Check in order of preference
        let candidates = [
            dirs::config_dir().map(|p| p.join("tessella/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/tessella/config.toml")),
            Some(PathBuf::from("/etc/tessella/config.toml")),
        ];

        candidates.into_iter().flatten().find(|p| p.exists())
    }

    /// Generate default configuration as a string
    pub fn default_config_string() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}
