//! Conda buildpack: miniconda environment from `environment.yml`

use super::base::BaseBuildPack;
use crate::buildpack::{chain, BuildPack, BuildPackId, Memo, Step};
use crate::error::Result;
use crate::repository::Repository;
use std::collections::BTreeSet;

const MINICONDA_URL: &str = "https://repo.anaconda.com/miniconda/Miniconda3-latest-Linux-x86_64.sh";

pub struct CondaBuildPack<'a> {
    base: BaseBuildPack<'a>,
    runtime: Memo,
}

impl<'a> CondaBuildPack<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Self {
            base: BaseBuildPack::new(repo),
            runtime: Memo::new(),
        }
    }

    pub fn repository(&self) -> &'a Repository {
        self.base.repository()
    }
}

impl BuildPack for CondaBuildPack<'_> {
    fn id(&self) -> BuildPackId {
        BuildPackId::Conda
    }

    fn detect(&self) -> Result<bool> {
        Ok(self.repository().path_exists("environment.yml"))
    }

    fn runtime(&self) -> Result<&str> {
        self.runtime
            .get_or_try_init(|| Ok(self.repository().read_text("runtime.txt")?.into_trimmed()))
    }

    fn packages(&self) -> BTreeSet<String> {
        self.base.packages()
    }

    fn env(&self) -> Vec<(String, String)> {
        let mut env = self.base.env();
        env.push(("CONDA_DIR".to_string(), "${APP_BASE}/conda".to_string()));
        env
    }

    fn path(&self) -> Vec<String> {
        let mut path = self.base.path();
        path.push("${CONDA_DIR}/bin".to_string());
        path
    }

    fn build_scripts(&self) -> Vec<Step> {
        let download = format!("curl -sSL {} -o /tmp/miniconda.sh", MINICONDA_URL);
        let mut steps = self.base.build_scripts();
        steps.push(Step::root(chain(&[
            download.as_str(),
            "bash /tmp/miniconda.sh -b -p ${CONDA_DIR}",
            "rm /tmp/miniconda.sh",
            "chown -R ${NB_USER}:${NB_USER} ${CONDA_DIR}",
        ])));
        steps.push(Step::user(chain(&[
            "conda install --yes --quiet notebook ipykernel",
            "conda clean --all --yes",
        ])));
        steps
    }

    fn assemble_scripts(&self) -> Result<Vec<Step>> {
        let repo = self.repository();
        let mut steps = self.base.assemble_scripts()?;

        if repo.path_exists("environment.yml") {
            let update = format!(
                "conda env update -n root -f \"{}\"",
                repo.relative_binder_path("environment.yml")
            );
            steps.push(Step::user(chain(&[update.as_str(), "conda clean --all --yes"])));
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
