//! Buildpack registry and dispatcher
//!
//! The registry is an ordered list of buildpack ids. Dispatch instantiates
//! each entry against the repository in order and binds the first one whose
//! `detect` holds; order is therefore part of the contract, and more specific
//! buildpacks must precede the generic ones that would otherwise shadow them.

use crate::buildpack::{BuildPack, BuildPackId};
use crate::buildpacks::{
    BaseBuildPack, CondaBuildPack, DockerBuildPack, HaskellBuildPack, JuliaBuildPack,
    PythonBuildPack, RBuildPack,
};
use crate::error::{BuildPackError, Result};
use crate::repository::Repository;
use tracing::{debug, info};

impl BuildPackId {
    /// Creates a fresh instance of this buildpack bound to `repo`
    pub fn instantiate<'a>(&self, repo: &'a Repository) -> Box<dyn BuildPack + 'a> {
        match self {
            BuildPackId::Docker => Box::new(DockerBuildPack::new(repo)),
            BuildPackId::Base => Box::new(BaseBuildPack::new(repo)),
            BuildPackId::Python => Box::new(PythonBuildPack::new(repo)),
            BuildPackId::Conda => Box::new(CondaBuildPack::new(repo)),
            BuildPackId::Julia => Box::new(JuliaBuildPack::new(repo)),
            BuildPackId::R => Box::new(RBuildPack::new(repo)),
            BuildPackId::Haskell => Box::new(HaskellBuildPack::new(repo)),
        }
    }

    /// Whether this buildpack detects every repository
    pub fn is_catch_all(&self) -> bool {
        matches!(self, BuildPackId::Base)
    }
}

/// Ordered registry of buildpacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPackRegistry {
    entries: Vec<BuildPackId>,
}

impl BuildPackRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::from_ids([
            BuildPackId::Docker,
            BuildPackId::Julia,
            BuildPackId::R,
            BuildPackId::Haskell,
            BuildPackId::Conda,
            BuildPackId::Python,
            BuildPackId::Base,
        ])
    }

    pub fn from_ids(ids: impl IntoIterator<Item = BuildPackId>) -> Self {
        let mut registry = Self::new();
        for id in ids {
            registry.register(id);
        }
        registry
    }

    /// Parses a registry from buildpack names, keeping their order
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let ids = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                BuildPackId::from_name(name)
                    .ok_or_else(|| BuildPackError::UnknownBuildPack(name.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_ids(ids))
    }

    /// Appends a buildpack at the lowest priority
    pub fn register(&mut self, id: BuildPackId) {
        self.entries.push(id);
    }

    pub fn ids(&self) -> &[BuildPackId] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether dispatch over this registry can never fail to bind
    pub fn has_catch_all(&self) -> bool {
        self.entries.iter().any(BuildPackId::is_catch_all)
    }
}

impl Default for BuildPackRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Selects exactly one buildpack for a repository
pub struct Dispatcher {
    registry: BuildPackRegistry,
}

impl Dispatcher {
    pub fn new(registry: BuildPackRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &BuildPackRegistry {
        &self.registry
    }

    /// Binds the first buildpack in registry order that detects `repo`.
    ///
    /// Candidates that do not detect are dropped. An I/O fault during
    /// detection aborts dispatch; exhausting the registry is
    /// [`BuildPackError::NoBuildPackMatched`].
    pub fn select<'a>(&self, repo: &'a Repository) -> Result<Box<dyn BuildPack + 'a>> {
        if self.registry.is_empty() {
            return Err(BuildPackError::EmptyRegistry);
        }

        let mut tried = Vec::with_capacity(self.registry.len());
        for id in self.registry.ids() {
            let candidate = id.instantiate(repo);
            if candidate.detect()? {
                info!(buildpack = %id, repo = %repo.root().display(), "Buildpack selected");
                return Ok(candidate);
            }
            debug!(buildpack = %id, "Buildpack did not detect");
            tried.push(id.name().to_string());
        }

        Err(BuildPackError::NoBuildPackMatched { tried })
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(BuildPackRegistry::with_defaults())
    }
}
