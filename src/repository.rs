//! Repository accessor
//!
//! Configuration files live in a conventional `binder/` subdirectory when it
//! exists, otherwise at the repository root. Every buildpack probe goes through
//! [`Repository::binder_path`], so the two layouts are indistinguishable to
//! detection code.

use crate::error::{BuildPackError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_BINDER_DIR: &str = "binder";

/// Result of reading a configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigFile {
    Absent,
    Present(String),
}

impl ConfigFile {
    /// Trimmed contents, with an absent file read as the empty string
    pub fn into_trimmed(self) -> String {
        match self {
            ConfigFile::Absent => String::new(),
            ConfigFile::Present(content) => content.trim().to_string(),
        }
    }
}

/// A source repository, immutable for the duration of a build
#[derive(Clone)]
pub struct Repository {
    root: PathBuf,
    config_dir: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl Repository {
    pub fn new(root: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self::with_binder_dir(root, DEFAULT_BINDER_DIR, fs)
    }

    pub fn with_binder_dir(
        root: impl Into<PathBuf>,
        binder_dir: &str,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        let root = root.into();
        let binder = root.join(binder_dir);
        let config_dir = if fs.is_dir(&binder) {
            binder
        } else {
            root.clone()
        };

        Self {
            root,
            config_dir,
            fs,
        }
    }

    /// Opens a repository on the local disk
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Arc::new(RealFileSystem::new()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory configuration files are resolved against
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn binder_path(&self, name: &str) -> PathBuf {
        self.config_dir.join(name)
    }

    /// `binder_path` relative to the repository root, as build scripts see it
    pub fn relative_binder_path(&self, name: &str) -> String {
        let path = self.binder_path(name);
        path.strip_prefix(&self.root)
            .unwrap_or(&path)
            .display()
            .to_string()
    }

    pub fn path_exists(&self, name: &str) -> bool {
        self.fs.exists(&self.binder_path(name))
    }

    pub fn read_text(&self, name: &str) -> Result<ConfigFile> {
        let path = self.binder_path(name);
        match self.fs.read_to_string(&path) {
            Ok(content) => Ok(ConfigFile::Present(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ConfigFile::Absent),
            Err(source) => Err(BuildPackError::Io { path, source }),
        }
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.root)
            .field("config_dir", &self.config_dir)
            .finish()
    }
}
