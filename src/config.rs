//! Launcher configuration loading
//!
//! Reads `devtray.toml` from the executable's directory when present and
//! falls back to built-in defaults otherwise. The defaults describe the
//! standard two-service dev stack: a backend on port 4000 and a Vite
//! frontend on port 5173.

use crate::error::{AppError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Configuration filename, looked up next to the executable
const CONFIG_FILENAME: &str = "devtray.toml";

/// Launcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Managed services, in menu order
    #[serde(default = "default_services")]
    pub services: Vec<ServiceConfig>,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Path to the tray icon image, relative to the working directory
    #[serde(default = "default_icon_path")]
    pub icon_path: PathBuf,

    /// Liveness poll period in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Delay before the browser is opened on startup, in milliseconds
    #[serde(default = "default_browser_delay")]
    pub browser_delay_ms: u64,
}

fn default_icon_path() -> PathBuf {
    PathBuf::from("frontend/public/undertale-sans.jpg")
}

fn default_poll_interval() -> u64 {
    2000
}

fn default_browser_delay() -> u64 {
    2000
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            icon_path: default_icon_path(),
            poll_interval_ms: default_poll_interval(),
            browser_delay_ms: default_browser_delay(),
        }
    }
}

/// One managed service: how to launch it and where it serves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Logical service name, also the menu label (capitalized)
    pub name: String,

    /// Launch command, argv style; the first element is the program
    pub command: Vec<String>,

    /// URL the service binds to, opened from its menu item
    pub url: String,

    /// Open this service's URL in the browser once at startup
    #[serde(default)]
    pub open_on_start: bool,
}

/// Build the shell command that runs `npm run dev` inside `dir`
pub fn dev_server_command(dir: &str) -> Vec<String> {
    #[cfg(windows)]
    {
        vec![
            "cmd".to_string(),
            "/c".to_string(),
            format!("cd {} && npm run dev", dir),
        ]
    }
    #[cfg(not(windows))]
    {
        vec![
            "sh".to_string(),
            "-c".to_string(),
            format!("cd {} && npm run dev", dir),
        ]
    }
}

fn default_services() -> Vec<ServiceConfig> {
    vec![
        ServiceConfig {
            name: "backend".to_string(),
            command: dev_server_command("backend"),
            url: "http://localhost:4000/".to_string(),
            open_on_start: false,
        },
        ServiceConfig {
            name: "frontend".to_string(),
            command: dev_server_command("frontend"),
            url: "http://localhost:5173/".to_string(),
            open_on_start: true,
        },
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum log file size in bytes
    #[serde(default = "default_max_log_size")]
    pub max_file_size: u64,

    /// Number of rotated log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: u32,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_size() -> u64 {
    5 * 1024 * 1024
}

fn default_max_log_files() -> u32 {
    3
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_file_size: default_max_log_size(),
            max_files: default_max_log_files(),
        }
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            services: default_services(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Locates and loads the configuration file
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a config manager rooted at the executable's directory,
    /// falling back to the working directory
    pub fn new() -> Self {
        let base = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            config_path: base.join(CONFIG_FILENAME),
        }
    }

    /// Get the config file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Get the log directory
    pub fn log_dir(&self) -> PathBuf {
        self.config_path
            .parent()
            .map(|d| d.join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    /// Load configuration from file, using defaults when absent
    pub fn load(&self) -> Result<LauncherConfig> {
        if !self.config_path.exists() {
            return Ok(LauncherConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| AppError::ConfigError(format!("Could not read config: {}", e)))?;

        let config: LauncherConfig = toml::from_str(&content)
            .map_err(|e| AppError::ConfigError(format!("Could not parse config: {}", e)))?;

        info!("Loaded config from {:?}", self.config_path);
        Ok(config)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_services() {
        let config = LauncherConfig::default();
        assert_eq!(config.services.len(), 2);
        assert_eq!(config.services[0].name, "backend");
        assert_eq!(config.services[1].name, "frontend");
        assert!(config.services[1].open_on_start);
        assert!(!config.services[0].open_on_start);
    }

    #[test]
    fn test_dev_server_command_shape() {
        let cmd = dev_server_command("backend");
        assert_eq!(cmd.len(), 3);
        assert!(cmd[2].contains("cd backend"));
        assert!(cmd[2].contains("npm run dev"));
    }
}
