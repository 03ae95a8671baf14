//! Bootstrap configuration and root folder resolution
//!
//! Settings sources, highest priority first:
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "SCHOOLOPS_ROOT_FOLDER";

/// Environment variable pointing at an explicit TOML config file
pub const CONFIG_FILE_ENV: &str = "SCHOOLOPS_CONFIG";

/// Database file name created inside the root folder
pub const DEFAULT_DATABASE_FILE: &str = "schoolops.db";

/// Bootstrap configuration loaded from TOML
///
/// Every field is optional; a missing file is equivalent to an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database and service state
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Explicit database path (relative paths resolve against the root folder)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration, degrading to defaults when no file is available
    ///
    /// A missing file only produces a warning. A file that exists but does
    /// not parse is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => config_file_path(),
        };

        match path {
            Some(path) if path.exists() => {
                let config = Self::from_file(&path)?;
                info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Some(path) => {
                warn!(
                    "Config file {} not found, using built-in defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            None => {
                warn!("No config directory available, using built-in defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Locate the TOML config file
///
/// `SCHOOLOPS_CONFIG` wins; otherwise `<config_dir>/schoolops/config.toml`.
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_FILE_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir().map(|d| d.join("schoolops").join("config.toml"))
}

/// Resolve the root folder using the documented priority order
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Database path for a resolved root folder
pub fn database_path(root_folder: &Path, toml_config: &TomlConfig) -> PathBuf {
    match &toml_config.database_path {
        Some(path) if path.is_absolute() => path.clone(),
        Some(path) => root_folder.join(path),
        None => root_folder.join(DEFAULT_DATABASE_FILE),
    }
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/schoolops (or /var/lib/schoolops for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("schoolops"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/schoolops"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("schoolops"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/schoolops"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("schoolops"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\schoolops"))
    } else {
        PathBuf::from("./schoolops_data")
    }
}
