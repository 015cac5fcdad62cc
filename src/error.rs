//! Error types for buildpack detection, dispatch and plan execution

use crate::buildpack::ExecutionUser;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the buildpack core
///
/// A missing configuration file is never an error; it surfaces as
/// [`crate::repository::ConfigFile::Absent`].
#[derive(Debug, Error)]
pub enum BuildPackError {
    /// A genuine I/O fault (e.g. permission denied) while probing the repository
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The registry was exhausted without any buildpack claiming the repository
    #[error("No buildpack matched the repository (tried: {})", .tried.join(", "))]
    NoBuildPackMatched { tried: Vec<String> },

    /// The registry has no entries at all
    #[error("Buildpack registry is empty")]
    EmptyRegistry,

    /// A registry entry named a buildpack that does not exist
    #[error("Unknown buildpack: {0}")]
    UnknownBuildPack(String),

    /// A step returned non-zero; remaining steps were not run
    #[error("Step {index} (user {user}) failed: {message}")]
    StepFailed {
        index: usize,
        user: ExecutionUser,
        message: String,
    },
}

pub type Result<T, E = BuildPackError> = std::result::Result<T, E>;
