//! Buildpack capability set
//!
//! A buildpack decides whether it applies to a repository and, if so, produces
//! the ordered shell steps that turn the repository into a runnable image:
//!
//! - **build** steps set up the environment and do not depend on repository
//!   contents (toolchains, kernels, system libraries)
//! - **assemble** steps are repository specific (installing the repo's own
//!   requirements)
//! - **post-build** steps run the repository's `postBuild` hook last
//!
//! Specialized buildpacks embed the buildpack they extend and call its
//! producers first, appending their own output. `detect` and
//! `default_command` are replaced outright rather than combined.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::collections::BTreeSet;
use std::fmt;

/// Identity a step runs as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionUser {
    #[serde(rename = "root")]
    Root,
    /// The unprivileged notebook user, resolved by the executor
    #[serde(rename = "${NB_USER}")]
    NotebookUser,
}

impl ExecutionUser {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionUser::Root => "root",
            ExecutionUser::NotebookUser => "${NB_USER}",
        }
    }
}

impl fmt::Display for ExecutionUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One shell fragment and the user it runs as. The script is opaque data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub user: ExecutionUser,
    pub script: String,
}

impl Step {
    pub fn new(user: ExecutionUser, script: impl Into<String>) -> Self {
        Self {
            user,
            script: script.into(),
        }
    }

    pub fn root(script: impl Into<String>) -> Self {
        Self::new(ExecutionUser::Root, script)
    }

    pub fn user(script: impl Into<String>) -> Self {
        Self::new(ExecutionUser::NotebookUser, script)
    }
}

/// Joins commands into one `&&`-chained script with line continuations
pub fn chain(commands: &[&str]) -> String {
    commands.join(" && \\\n")
}

/// Buildpack identifiers, in no particular order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildPackId {
    Docker,
    Base,
    Python,
    Conda,
    Julia,
    R,
    Haskell,
}

impl BuildPackId {
    pub fn name(&self) -> &'static str {
        match self {
            BuildPackId::Docker => "docker",
            BuildPackId::Base => "base",
            BuildPackId::Python => "python",
            BuildPackId::Conda => "conda",
            BuildPackId::Julia => "julia",
            BuildPackId::R => "r",
            BuildPackId::Haskell => "haskell",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all_variants()
            .iter()
            .copied()
            .find(|id| id.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn all_variants() -> &'static [Self] {
        &[
            BuildPackId::Docker,
            BuildPackId::Base,
            BuildPackId::Python,
            BuildPackId::Conda,
            BuildPackId::Julia,
            BuildPackId::R,
            BuildPackId::Haskell,
        ]
    }
}

impl fmt::Display for BuildPackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Once-populated cache for a value read from the repository.
///
/// A failed read leaves the cache empty; a successful one is never recomputed.
#[derive(Debug, Default)]
pub struct Memo(OnceCell<String>);

impl Memo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_try_init(&self, init: impl FnOnce() -> Result<String>) -> Result<&str> {
        if let Some(value) = self.0.get() {
            return Ok(value.as_str());
        }
        let value = init()?;
        Ok(self.0.get_or_init(|| value).as_str())
    }

    #[cfg(test)]
    pub fn is_computed(&self) -> bool {
        self.0.get().is_some()
    }
}

/// One strategy for turning a repository into build instructions.
///
/// An instance is bound to a single repository for its whole lifetime.
pub trait BuildPack {
    fn id(&self) -> BuildPackId;

    /// Whether this buildpack applies to the bound repository.
    ///
    /// Must be side-effect free. A missing marker file yields `Ok(false)`;
    /// only genuine I/O faults are errors.
    fn detect(&self) -> Result<bool>;

    /// Trimmed contents of the runtime marker file, or `""` if absent. Memoized.
    fn runtime(&self) -> Result<&str>;

    /// System packages the executor must provide before any step runs
    fn packages(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    /// Environment variables, in declaration order
    fn env(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Directories prepended to `PATH`, highest priority last
    fn path(&self) -> Vec<String> {
        Vec::new()
    }

    /// Steps that do not depend on repository contents
    fn build_scripts(&self) -> Vec<Step>;

    /// Repository-specific steps
    fn assemble_scripts(&self) -> Result<Vec<Step>>;

    /// Steps that run after everything else, e.g. the repository's `postBuild`
    fn post_build_scripts(&self) -> Result<Vec<Step>> {
        Ok(Vec::new())
    }

    /// argv for the image's interactive entry point
    fn default_command(&self) -> Vec<String>;

    /// Repository-supplied Dockerfile the executor builds verbatim, relative
    /// to the repository root. When set, the step lists are empty.
    fn dockerfile(&self) -> Option<String> {
        None
    }
}
