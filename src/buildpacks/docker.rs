//! Docker buildpack: the repository ships its own `Dockerfile`

use crate::buildpack::{BuildPack, BuildPackId, Step};
use crate::error::Result;
use crate::repository::Repository;

const DOCKERFILE: &str = "Dockerfile";

/// Hands a repository-supplied `Dockerfile` to the executor untouched.
///
/// Standalone: it layers on nothing, contributes no packages, environment or
/// steps, and leaves the entry point to the Dockerfile's own `CMD`.
pub struct DockerBuildPack<'a> {
    repo: &'a Repository,
}

impl<'a> DockerBuildPack<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Self { repo }
    }
}

impl BuildPack for DockerBuildPack<'_> {
    fn id(&self) -> BuildPackId {
        BuildPackId::Docker
    }

    fn detect(&self) -> Result<bool> {
        Ok(self.repo.path_exists(DOCKERFILE))
    }

    fn runtime(&self) -> Result<&str> {
        Ok("")
    }

    fn build_scripts(&self) -> Vec<Step> {
        Vec::new()
    }

    fn assemble_scripts(&self) -> Result<Vec<Step>> {
        Ok(Vec::new())
    }

    fn default_command(&self) -> Vec<String> {
        Vec::new()
    }

    fn dockerfile(&self) -> Option<String> {
        Some(self.repo.relative_binder_path(DOCKERFILE))
    }
}
