//! Python buildpack: virtualenv + notebook, repository requirements via pip

use super::base::BaseBuildPack;
use crate::buildpack::{chain, BuildPack, BuildPackId, Memo, Step};
use crate::error::Result;
use crate::repository::Repository;
use std::collections::BTreeSet;

pub struct PythonBuildPack<'a> {
    base: BaseBuildPack<'a>,
    runtime: Memo,
}

impl<'a> PythonBuildPack<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Self {
            base: BaseBuildPack::new(repo),
            runtime: Memo::new(),
        }
    }

    pub fn repository(&self) -> &'a Repository {
        self.base.repository()
    }

    /// Python version requested by `runtime.txt` (`python-X.Y`), if any
    pub fn python_version(&self) -> Result<Option<&str>> {
        Ok(self.runtime()?.strip_prefix("python-"))
    }
}

impl BuildPack for PythonBuildPack<'_> {
    fn id(&self) -> BuildPackId {
        BuildPackId::Python
    }

    fn detect(&self) -> Result<bool> {
        let repo = self.repository();
        if repo.path_exists("requirements.txt") || repo.path_exists("setup.py") {
            return Ok(true);
        }
        Ok(self.python_version()?.is_some())
    }

    fn runtime(&self) -> Result<&str> {
        self.runtime
            .get_or_try_init(|| Ok(self.repository().read_text("runtime.txt")?.into_trimmed()))
    }

    fn packages(&self) -> BTreeSet<String> {
        let mut packages = self.base.packages();
        packages.extend(
            ["python3", "python3-dev", "python3-venv"]
                .iter()
                .map(|p| p.to_string()),
        );
        packages
    }

    fn env(&self) -> Vec<(String, String)> {
        let mut env = self.base.env();
        env.push(("VENV_PATH".to_string(), "${APP_BASE}/venv".to_string()));
        env
    }

    fn path(&self) -> Vec<String> {
        let mut path = self.base.path();
        path.push("${VENV_PATH}/bin".to_string());
        path
    }

    fn build_scripts(&self) -> Vec<Step> {
        let mut steps = self.base.build_scripts();
        steps.push(Step::root(chain(&[
            "python3 -m venv ${VENV_PATH}",
            "chown -R ${NB_USER}:${NB_USER} ${VENV_PATH}",
        ])));
        steps.push(Step::user(chain(&[
            "pip install --no-cache-dir --upgrade pip",
            "pip install --no-cache-dir notebook ipykernel",
        ])));
        steps
    }

    fn assemble_scripts(&self) -> Result<Vec<Step>> {
        let repo = self.repository();
        let mut steps = self.base.assemble_scripts()?;

        if repo.path_exists("requirements.txt") {
            steps.push(Step::user(format!(
                "pip install --no-cache-dir -r \"{}\"",
                repo.relative_binder_path("requirements.txt")
            )));
        }
        if repo.path_exists("setup.py") {
            steps.push(Step::user("pip install --no-cache-dir ."));
        }

        Ok(steps)
    }

    fn post_build_scripts(&self) -> Result<Vec<Step>> {
        self.base.post_build_scripts()
    }

    fn default_command(&self) -> Vec<String> {
        self.base.default_command()
    }
}
