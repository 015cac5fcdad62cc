//! Configuration management for binderpack
//!
//! Settings are loaded from environment variables with sensible defaults.
//!
//! # Environment Variables
//!
//! - `BINDERPACK_BUILDPACKS`: Comma-separated registry order, e.g.
//!   `haskell,python,base` - default: the built-in order
//! - `BINDERPACK_BINDER_DIR`: Configuration subdirectory - default: "binder"
//! - `BINDERPACK_LOG_LEVEL`: Logging level - default: "info"
//! - `BINDERPACK_LOG_JSON`: Emit JSON log lines (`true`/`false`) - default: false
//!
//! # Example
//!
//! ```no_run
//! use binderpack::BinderpackConfig;
//!
//! let config = BinderpackConfig::default();
//! config.validate().expect("Invalid configuration");
//! let registry = config.registry().expect("Invalid buildpack list");
//! ```

use crate::buildpack::BuildPackId;
use crate::error::BuildPackError;
use crate::registry::BuildPackRegistry;
use crate::repository::DEFAULT_BINDER_DIR;
use std::env;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// A configured buildpack name is not known
    #[error("Invalid buildpack list: {0}")]
    InvalidBuildPack(#[from] BuildPackError),
}

/// Main configuration structure for binderpack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinderpackConfig {
    /// Registry order override; `None` uses the built-in order
    pub buildpacks: Option<Vec<String>>,

    /// Subdirectory holding configuration files
    pub binder_dir: String,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for BinderpackConfig {
    /// Loads from `BINDERPACK_*` environment variables, falling back to defaults
    fn default() -> Self {
        let buildpacks = env::var("BINDERPACK_BUILDPACKS").ok().map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        });

        let binder_dir =
            env::var("BINDERPACK_BINDER_DIR").unwrap_or_else(|_| DEFAULT_BINDER_DIR.to_string());

        let log_level = env::var("BINDERPACK_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let log_json = env::var("BINDERPACK_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            buildpacks,
            binder_dir,
            log_level,
            log_json,
        }
    }
}

impl BinderpackConfig {
    /// Validates the configuration
    ///
    /// An explicit buildpack list without a catch-all is allowed; dispatch
    /// then reports unmatched repositories as an error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.binder_dir.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Binder directory must not be empty".to_string(),
            ));
        }

        if let Some(names) = &self.buildpacks {
            if names.is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "Buildpack list must not be empty".to_string(),
                ));
            }
            for name in names {
                if BuildPackId::from_name(name).is_none() {
                    return Err(BuildPackError::UnknownBuildPack(name.clone()).into());
                }
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Builds the registry this configuration describes
    pub fn registry(&self) -> Result<BuildPackRegistry, ConfigError> {
        match &self.buildpacks {
            Some(names) => Ok(BuildPackRegistry::from_names(names.as_slice())?),
            None => Ok(BuildPackRegistry::with_defaults()),
        }
    }
}

impl fmt::Display for BinderpackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Binderpack Configuration:")?;
        match &self.buildpacks {
            Some(names) => writeln!(f, "  Buildpacks: {}", names.join(", "))?,
            None => writeln!(f, "  Buildpacks: (default order)")?,
        }
        writeln!(f, "  Binder Dir: {}", self.binder_dir)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Log JSON: {}", self.log_json)?;
        Ok(())
    }
}
