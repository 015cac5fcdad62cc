//! R buildpack: IRkernel on top of the python environment, CRAN pinned to a
//! snapshot date taken from `runtime.txt` (`r-YYYY-MM-DD`)

use super::python::PythonBuildPack;
use crate::buildpack::{chain, BuildPack, BuildPackId, Step};
use crate::error::Result;
use crate::repository::Repository;
use chrono::NaiveDate;
use std::collections::BTreeSet;

const CRAN_SNAPSHOT_BASE: &str = "https://packagemanager.posit.co/cran";

pub struct RBuildPack<'a> {
    base: PythonBuildPack<'a>,
}

impl<'a> RBuildPack<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Self {
            base: PythonBuildPack::new(repo),
        }
    }

    pub fn repository(&self) -> &'a Repository {
        self.base.repository()
    }

    /// Snapshot date from `runtime.txt`, `None` if the runtime is not a
    /// well-formed `r-YYYY-MM-DD`
    pub fn checkpoint_date(&self) -> Result<Option<NaiveDate>> {
        Ok(self
            .runtime()?
            .strip_prefix("r-")
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()))
    }

    fn snapshot_url(date: NaiveDate) -> String {
        format!("{}/{}", CRAN_SNAPSHOT_BASE, date.format("%Y-%m-%d"))
    }
}

impl BuildPack for RBuildPack<'_> {
    fn id(&self) -> BuildPackId {
        BuildPackId::R
    }

    fn detect(&self) -> Result<bool> {
        Ok(self.checkpoint_date()?.is_some())
    }

    fn runtime(&self) -> Result<&str> {
        self.base.runtime()
    }

    fn packages(&self) -> BTreeSet<String> {
        let mut packages = self.base.packages();
        packages.extend(
            ["r-base", "r-base-dev", "libssl-dev", "libxml2-dev", "libcurl4-openssl-dev"]
                .iter()
                .map(|p| p.to_string()),
        );
        packages
    }

    fn env(&self) -> Vec<(String, String)> {
        self.base.env()
    }

    fn path(&self) -> Vec<String> {
        self.base.path()
    }

    fn build_scripts(&self) -> Vec<Step> {
        let mut steps = self.base.build_scripts();
        steps.push(Step::root(chain(&[
            "mkdir -p /usr/local/lib/R/site-library",
            "chown -R ${NB_USER}:${NB_USER} /usr/local/lib/R/site-library",
        ])));
        steps.push(Step::user(chain(&[
            "R --quiet -e \"install.packages('IRkernel', repos='https://cloud.r-project.org')\"",
            "R --quiet -e \"IRkernel::installspec(prefix='${VENV_PATH}')\"",
        ])));
        steps
    }

    fn assemble_scripts(&self) -> Result<Vec<Step>> {
        let repo = self.repository();
        let mut steps = self.base.assemble_scripts()?;

        if let Some(date) = self.checkpoint_date()? {
            steps.push(Step::user(format!(
                "echo \"options(repos = c(CRAN='{}'))\" > ${{HOME}}/.Rprofile",
                Self::snapshot_url(date)
            )));
        }
        if repo.path_exists("install.R") {
            steps.push(Step::user(format!(
                "Rscript \"{}\"",
                repo.relative_binder_path("install.R")
            )));
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
