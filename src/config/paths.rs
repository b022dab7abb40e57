//! Path management for tally-chart
//!
//! ## Path Resolution Order
//!
//! 1. `TALLY_CHART_DIR` environment variable (if set)
//! 2. The platform configuration directory joined with `tally-chart`
//!    (`~/.config/tally-chart`, `%APPDATA%\tally-chart`, ...)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::TallyError;

/// Environment variable overriding the base directory
pub const DIR_ENV_VAR: &str = "TALLY_CHART_DIR";

/// Manages all paths used by tally-chart
#[derive(Debug, Clone)]
pub struct TallyPaths {
    base_dir: PathBuf,
}

impl TallyPaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, TallyError> {
        let base_dir = match std::env::var(DIR_ENV_VAR) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create TallyPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the transaction snapshot
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), TallyError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| TallyError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| TallyError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, TallyError> {
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("tally-chart"))
        .ok_or_else(|| TallyError::Config("Could not determine home directory".into()))
}
