use crate::paths;
use log::{trace, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine default config directory")]
    NoConfigDir,

    #[error("Failed to access config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where a newly attached container is placed in its parent's focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusPriority {
    /// Behind every existing sibling
    #[default]
    Lowest,
    /// Ahead of every existing sibling
    Highest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The path the config file was loaded from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Whether to save the layout after applying moves and load it when none is given
    pub persistence: bool,
    /// Focus priority given to containers attached to a new parent
    pub new_child_focus: FocusPriority,
    /// Whether to check every tree invariant after each move
    pub validate_after_move: bool,
}

static CURRENT_CONFIG: Lazy<Arc<RwLock<Config>>> =
    Lazy::new(|| Arc::new(RwLock::new(Config::default())));

impl Config {
    pub fn load(config_path: Option<&Path>, save: bool) -> ConfigResult<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => paths::default_config_path().ok_or(ConfigError::NoConfigDir)?,
        };

        if !path.exists() {
            Config::default().save_to_file(&path)?;
            trace!("Created default config file at: {}", path.display());
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        let mut config = Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        config.config_path = Some(path.clone());

        // Writing it back fills in any fields the file was missing
        if save {
            if let Err(e) = config.save_to_file(&path) {
                warn!("Failed to update config file with missing fields: {e}");
            }
        }

        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document means every field takes its default
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(contents)
    }

    pub fn set_config(config: Config) {
        *CURRENT_CONFIG.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    pub fn current() -> RwLockReadGuard<'static, Config> {
        CURRENT_CONFIG.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn update<F>(f: F)
    where
        F: FnOnce(&mut Config),
    {
        f(&mut CURRENT_CONFIG.write().unwrap_or_else(PoisonError::into_inner));
    }

    pub fn reset() {
        Self::set_config(Config::default());
    }

    pub fn persistence() -> bool {
        Self::current().persistence
    }

    pub fn save_to_file(&self, path: &Path) -> ConfigResult<()> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let header = "# TreeWM Configuration File\n# This file contains your TreeWM settings.\n\n";
        let serialized_config = serde_yaml::to_string(self)?;
        fs::write(path, format!("{header}{serialized_config}")).map_err(io_error)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: None,
            persistence: false,
            new_child_focus: FocusPriority::Lowest,
            validate_after_move: true,
        }
    }
}
