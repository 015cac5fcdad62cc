//! Haskell buildpack: stack, IHaskell and the repository's own `stack build`
//!
//! Layered on the python buildpack for Jupyter, but detected independently:
//! a `stack.yaml` is enough, no python marker file is required.

use super::python::PythonBuildPack;
use crate::buildpack::{chain, BuildPack, BuildPackId, Memo, Step};
use crate::error::Result;
use crate::repository::Repository;
use std::collections::BTreeSet;

const STACK_MANIFEST: &str = "stack.yaml";

pub struct HaskellBuildPack<'a> {
    base: PythonBuildPack<'a>,
    runtime: Memo,
}

impl<'a> HaskellBuildPack<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Self {
            base: PythonBuildPack::new(repo),
            runtime: Memo::new(),
        }
    }

    pub fn repository(&self) -> &'a Repository {
        self.base.repository()
    }

    /// The python layer this buildpack extends
    pub fn base(&self) -> &PythonBuildPack<'a> {
        &self.base
    }
}

impl BuildPack for HaskellBuildPack<'_> {
    fn id(&self) -> BuildPackId {
        BuildPackId::Haskell
    }

    fn detect(&self) -> Result<bool> {
        Ok(self.repository().path_exists(STACK_MANIFEST))
    }

    /// Contents of `stack.yaml`, not `runtime.txt`
    fn runtime(&self) -> Result<&str> {
        self.runtime
            .get_or_try_init(|| Ok(self.repository().read_text(STACK_MANIFEST)?.into_trimmed()))
    }

    fn packages(&self) -> BTreeSet<String> {
        let mut packages = self.base.packages();
        packages.extend(
            [
                "libblas-dev",
                "libcairo2-dev",
                "liblapack-dev",
                "libmagic-dev",
                "libpango1.0-dev",
                "libzmq3-dev",
            ]
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
            "apt-get update",
            "apt-get install -y libmagic-dev",
            "apt-get install -y libblas-dev",
            "apt-get install -y liblapack-dev",
            "apt-get install -y libcairo2-dev",
            "apt-get install -y libpango1.0-dev",
            "apt-get install -y libzmq3-dev",
            "curl -sSL https://get.haskellstack.org/ | sh",
        ])));
        steps.push(Step::user(chain(&[
            "git clone https://github.com/gibiansky/IHaskell",
            "cd IHaskell",
            "stack install gtk2hs-buildtools",
            "stack install --fast",
            "ihaskell install --stack",
        ])));
        steps
    }

    fn assemble_scripts(&self) -> Result<Vec<Step>> {
        let mut steps = self.base.assemble_scripts()?;
        steps.push(Step::user(chain(&["stack setup", "stack build"])));
        Ok(steps)
    }

    fn post_build_scripts(&self) -> Result<Vec<Step>> {
        self.base.post_build_scripts()
    }

    fn default_command(&self) -> Vec<String> {
        ["stack", "exec", "--", "jupyter", "notebook", "--ip", "0.0.0.0"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}
