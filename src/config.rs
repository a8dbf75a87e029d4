//! Runtime configuration. Connection details live in a TOML file under the
//! platform config directory instead of being baked into the binary, and a
//! couple of environment variables override the file for one-off runs.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Overrides the location of `config.toml`.
pub const CONFIG_ENV: &str = "CUSTOMER_MANAGER_CONFIG";
/// Overrides `database.path`.
pub const DATABASE_ENV: &str = "CUSTOMER_MANAGER_DB";

const APPLICATION: &str = "customer-manager";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "customers.sqlite";
const LOG_FILE_NAME: &str = "customer-manager.log";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file holding the `customers` table. Defaults to the platform
    /// data directory.
    pub path: Option<PathBuf>,

    /// Create the data directory and the `customers` table when missing.
    /// When off, a missing file or table leaves the store disconnected.
    pub create_schema: bool,

    /// How long a statement waits on a locked database before failing.
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, used when `RUST_LOG` is unset.
    pub level: String,

    /// Log file. Defaults to the platform data directory.
    pub file: Option<PathBuf>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            create_schema: true,
            busy_timeout_ms: 5000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load the config from `CUSTOMER_MANAGER_CONFIG` or the default location,
    /// then apply environment overrides. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        let path = match env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => Self::default_config_path()?,
        };

        let mut config = Self::load_from(&path)?;
        if let Some(db) = env::var_os(DATABASE_ENV) {
            config.database.path = Some(PathBuf::from(db));
        }
        Ok(config)
    }

    /// Read a specific config file without consulting the environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Database file, falling back to the platform data directory.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database.path {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(DB_FILE_NAME)),
        }
    }

    /// Log file, falling back to the platform data directory.
    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.logging.file {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(LOG_FILE_NAME)),
        }
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", APPLICATION)
        .ok_or_else(|| anyhow!("could not locate home directory"))
}
