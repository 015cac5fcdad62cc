//! Script assembly: linearizes a bound buildpack into the ordered step list
//! handed to an executor

use crate::buildpack::{BuildPack, BuildPackId, Step};
use crate::error::{BuildPackError, Result};
use crate::registry::Dispatcher;
use crate::repository::Repository;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Everything an executor needs to build the image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    pub buildpack: BuildPackId,
    pub runtime: String,
    pub packages: BTreeSet<String>,
    pub env: Vec<(String, String)>,
    pub path: Vec<String>,
    /// Build steps, then assemble steps, then post-build steps
    pub steps: Vec<Step>,
    pub default_command: Vec<String>,
    /// Repository Dockerfile to build verbatim instead of running `steps`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,
}

impl BuildPlan {
    pub fn assemble(buildpack: &dyn BuildPack) -> Result<Self> {
        let build = buildpack.build_scripts();
        let assemble = buildpack.assemble_scripts()?;
        let post_build = buildpack.post_build_scripts()?;

        debug!(
            buildpack = %buildpack.id(),
            build = build.len(),
            assemble = assemble.len(),
            post_build = post_build.len(),
            "Assembled steps"
        );

        let mut steps = Vec::with_capacity(build.len() + assemble.len() + post_build.len());
        steps.extend(build);
        steps.extend(assemble);
        steps.extend(post_build);

        Ok(Self {
            buildpack: buildpack.id(),
            runtime: buildpack.runtime()?.to_string(),
            packages: buildpack.packages(),
            env: buildpack.env(),
            path: buildpack.path(),
            steps,
            default_command: buildpack.default_command(),
            dockerfile: buildpack.dockerfile(),
        })
    }

    /// Dispatches `repo` and assembles the bound buildpack's plan
    pub fn for_repository(dispatcher: &Dispatcher, repo: &Repository) -> Result<Self> {
        let buildpack = dispatcher.select(repo)?;
        Self::assemble(buildpack.as_ref())
    }

    /// Runs every step in order, stopping at the first failure
    pub fn execute(&self, executor: &mut dyn Executor) -> Result<()> {
        for (index, step) in self.steps.iter().enumerate() {
            debug!(index, user = %step.user, "Running step");
            executor
                .run(step)
                .map_err(|message| BuildPackError::StepFailed {
                    index,
                    user: step.user,
                    message,
                })?;
        }
        info!(buildpack = %self.buildpack, steps = self.steps.len(), "Build finished");
        Ok(())
    }
}

/// Runs a single step. Implemented by whatever actually builds the image.
pub trait Executor {
    /// Runs `step`; an `Err` means the script exited non-zero
    fn run(&mut self, step: &Step) -> std::result::Result<(), String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildpack::ExecutionUser;
    use crate::buildpacks::{BaseBuildPack, HaskellBuildPack};
    use crate::fs::MockFileSystem;
    use std::sync::Arc;

    #[derive(Default)]
    struct FailingAt {
        fail_at: Option<usize>,
        ran: Vec<Step>,
    }

    impl Executor for FailingAt {
        fn run(&mut self, step: &Step) -> std::result::Result<(), String> {
            if self.fail_at == Some(self.ran.len()) {
                return Err("exit status 1".to_string());
            }
            self.ran.push(step.clone());
            Ok(())
        }
    }

    fn haskell_repo() -> Repository {
        let fs = MockFileSystem::new();
        fs.add_file("stack.yaml", "resolver: lts-18.0");
        fs.add_file("postBuild", "echo done");
        Repository::new("/mock", Arc::new(fs))
    }

    #[test]
    fn test_phases_in_order() {
        let repo = haskell_repo();
        let bp = HaskellBuildPack::new(&repo);
        let plan = BuildPlan::assemble(&bp).unwrap();

        let mut expected = bp.build_scripts();
        expected.extend(bp.assemble_scripts().unwrap());
        expected.extend(bp.post_build_scripts().unwrap());

        assert_eq!(plan.steps, expected);
        assert_eq!(plan.steps.last().unwrap().user, ExecutionUser::NotebookUser);
        assert!(plan.steps.last().unwrap().script.contains("./postBuild"));
        assert_eq!(plan.runtime, "resolver: lts-18.0");
    }

    #[test]
    fn test_execute_runs_all_steps() {
        let repo = haskell_repo();
        let plan = BuildPlan::assemble(&BaseBuildPack::new(&repo)).unwrap();
        let mut executor = FailingAt::default();

        plan.execute(&mut executor).unwrap();
        assert_eq!(executor.ran, plan.steps);
    }

    #[test]
    fn test_execute_aborts_on_failure() {
        let repo = haskell_repo();
        let plan = BuildPlan::assemble(&HaskellBuildPack::new(&repo)).unwrap();
        let mut executor = FailingAt {
            fail_at: Some(1),
            ..Default::default()
        };

        match plan.execute(&mut executor) {
            Err(BuildPackError::StepFailed { index, user, message }) => {
                assert_eq!(index, 1);
                assert_eq!(user, plan.steps[1].user);
                assert_eq!(message, "exit status 1");
            }
            other => panic!("Expected StepFailed, got {:?}", other),
        }
        assert_eq!(executor.ran.len(), 1);
    }

    #[test]
    fn test_plan_serializes() {
        let repo = haskell_repo();
        let plan = BuildPlan::assemble(&HaskellBuildPack::new(&repo)).unwrap();
        let json = serde_json::to_value(&plan).unwrap();

        assert_eq!(json["buildpack"], "haskell");
        assert_eq!(json["default_command"][0], "stack");
        assert_eq!(json["steps"][0]["user"], "root");
        assert!(json.get("dockerfile").is_none());
    }

    #[test]
    fn test_docker_plan_carries_dockerfile() {
        let fs = MockFileSystem::new();
        fs.add_file("binder/Dockerfile", "FROM python:3.11");
        fs.add_file("requirements.txt", "numpy");
        let repo = Repository::new("/mock", Arc::new(fs));

        let plan = BuildPlan::for_repository(&Dispatcher::default(), &repo).unwrap();
        assert_eq!(plan.buildpack, BuildPackId::Docker);
        assert_eq!(plan.dockerfile.as_deref(), Some("binder/Dockerfile"));
        assert!(plan.steps.is_empty());
        assert!(plan.default_command.is_empty());

        let mut executor = FailingAt {
            fail_at: Some(0),
            ..Default::default()
        };
        plan.execute(&mut executor).unwrap();
        assert!(executor.ran.is_empty());
    }
}
