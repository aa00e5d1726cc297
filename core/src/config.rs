//! Configuration loading for duty tracking
//!
//! A config file holds display options and the task list:
//!
//! ```toml
//! [todo]
//! hide_in_duties = true
//!
//! [timers]
//! hide_seconds = true
//!
//! [[task]]
//! id = "roulette"
//! name = "Duty Roulette"
//! schedule = "daily"
//! kind = { type = "threshold", threshold = 1 }
//! ```
//!
//! User files live under `<config dir>/dutykeeper`.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use dutykeeper_types::{TimerOptions, TodoOptions};
use serde::{Deserialize, Serialize};

use crate::task::TaskConfig;

/// File name of the main config inside [`default_config_dir`].
pub const CONFIG_FILE_NAME: &str = "dutykeeper.toml";

/// Errors that can occur during config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Serialize error for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        source: toml::ser::Error,
    },

    #[error("Duplicate task id '{0}'")]
    DuplicateTask(String),

    #[error("Invalid task '{id}': {reason}")]
    InvalidTask { id: String, reason: String },
}

/// Everything a user can configure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyConfig {
    #[serde(default)]
    pub todo: TodoOptions,

    #[serde(default)]
    pub timers: TimerOptions,

    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskConfig>,
}

impl DutyConfig {
    /// Check every task and reject duplicate ids.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for task in &self.tasks {
            task.validate()?;
            if !seen.insert(task.id.as_str()) {
                return Err(ConfigError::DuplicateTask(task.id.clone()));
            }
        }
        Ok(())
    }

    pub fn task(&self, id: &str) -> Option<&TaskConfig> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

/// Load and validate a config file
pub fn load_file(path: &Path) -> Result<DutyConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: DutyConfig = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    config.validate()?;
    tracing::debug!(path = %path.display(), tasks = config.tasks.len(), "Loaded duty config");
    Ok(config)
}

/// Save a config to a TOML file
pub fn save_file(path: &Path, config: &DutyConfig) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    fs::write(path, contents).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Get the default user config directory
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dutykeeper"))
}

/// Get the default config file path
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join(CONFIG_FILE_NAME))
}
