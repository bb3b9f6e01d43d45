//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. `config.toml` in the platform config directory
//! 3. `FINDDUP_*` environment variables (e.g. `FINDDUP_THREADS=4`)
//! 4. Command-line flags (applied by the caller)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::scanner::{HashAlgorithm, DEFAULT_CHUNK_SIZE};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "FINDDUP_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Files hashed concurrently.
    pub threads: usize,
    /// Recursion depth.
    pub depth: usize,
    /// Duplicate count above which a warning is logged.
    pub limit: usize,
    /// Content digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Hashing read chunk size in bytes.
    pub chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: 1,
            depth: 20,
            limit: 5000,
            algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Config {
    /// Load from the default config file and environment.
    ///
    /// Any failure falls back to defaults.
    #[must_use]
    pub fn load() -> Self {
        let path = Self::config_path().ok();
        match Self::load_from(path.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Load from an explicit config file (if any) and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or a value has the wrong type.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config = Self::figment(path).extract()?;
        Ok(config)
    }

    /// The layered provider stack without the CLI layer.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Save to the default platform-specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory is unknown or unwritable.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save as TOML to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Get the default platform-specific configuration path.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "finddup", "finddup")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }
}
