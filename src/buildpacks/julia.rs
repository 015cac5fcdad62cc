//! Julia buildpack, layered on conda so notebooks share the conda Jupyter

use super::conda::CondaBuildPack;
use crate::buildpack::{chain, BuildPack, BuildPackId, Step};
use crate::error::Result;
use crate::repository::Repository;
use std::collections::BTreeSet;

const JULIA_VERSION: &str = "1.9.4";

pub struct JuliaBuildPack<'a> {
    base: CondaBuildPack<'a>,
}

impl<'a> JuliaBuildPack<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Self {
            base: CondaBuildPack::new(repo),
        }
    }

    pub fn repository(&self) -> &'a Repository {
        self.base.repository()
    }

    /// Packages named in a legacy `REQUIRE` file, without the `julia` pin,
    /// `@platform` tags or version bounds
    pub fn required_packages(&self) -> Result<Vec<String>> {
        let content = self.repository().read_text("REQUIRE")?.into_trimmed();
        Ok(content
            .lines()
            .filter_map(|line| line.split_whitespace().find(|token| !token.starts_with('@')))
            .filter(|name| !name.starts_with('#') && *name != "julia")
            .map(str::to_string)
            .collect())
    }
}

impl BuildPack for JuliaBuildPack<'_> {
    fn id(&self) -> BuildPackId {
        BuildPackId::Julia
    }

    fn detect(&self) -> Result<bool> {
        let repo = self.repository();
        Ok(repo.path_exists("Project.toml") || repo.path_exists("REQUIRE"))
    }

    fn runtime(&self) -> Result<&str> {
        self.base.runtime()
    }

    fn packages(&self) -> BTreeSet<String> {
        self.base.packages()
    }

    fn env(&self) -> Vec<(String, String)> {
        let mut env = self.base.env();
        env.extend(
            [
                ("JULIA_PATH", "${APP_BASE}/julia"),
                ("JULIA_DEPOT_PATH", "${JULIA_PATH}/pkg"),
                ("JULIA_VERSION", JULIA_VERSION),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        env
    }

    fn path(&self) -> Vec<String> {
        let mut path = self.base.path();
        path.push("${JULIA_PATH}/bin".to_string());
        path
    }

    fn build_scripts(&self) -> Vec<Step> {
        let minor = JULIA_VERSION
            .rsplit_once('.')
            .map(|(minor, _)| minor)
            .unwrap_or(JULIA_VERSION);
        let download = format!(
            "curl -sSL https://julialang-s3.julialang.org/bin/linux/x64/{}/julia-{}-linux-x86_64.tar.gz \
             | tar -xz -C ${{JULIA_PATH}} --strip-components 1",
            minor, JULIA_VERSION
        );

        let mut steps = self.base.build_scripts();
        steps.push(Step::root(chain(&[
            "mkdir -p ${JULIA_PATH}",
            download.as_str(),
            "mkdir -p ${JULIA_DEPOT_PATH}",
            "chown -R ${NB_USER}:${NB_USER} ${JULIA_PATH}",
        ])));
        steps.push(Step::user(
            "julia -e 'using Pkg; Pkg.add(\"IJulia\"); using IJulia; installkernel(\"Julia\")'",
        ));
        steps
    }

    fn assemble_scripts(&self) -> Result<Vec<Step>> {
        let repo = self.repository();
        let mut steps = self.base.assemble_scripts()?;

        if repo.path_exists("Project.toml") {
            let project = repo
                .relative_binder_path("Project.toml")
                .trim_end_matches("Project.toml")
                .trim_end_matches('/')
                .to_string();
            let project = if project.is_empty() { ".".to_string() } else { project };
            steps.push(Step::user(format!(
                "julia --project={} -e 'using Pkg; Pkg.instantiate(); Pkg.precompile()'",
                project
            )));
        } else {
            let packages = self.required_packages()?;
            if !packages.is_empty() {
                let adds: Vec<String> = packages
                    .iter()
                    .map(|p| format!("Pkg.add(\"{}\")", p))
                    .collect();
                steps.push(Step::user(format!(
                    "julia -e 'using Pkg; {}; Pkg.precompile()'",
                    adds.join("; ")
                )));
            }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use std::sync::Arc;

    fn repo_with(files: &[(&str, &str)]) -> Repository {
        let fs = MockFileSystem::new();
        for (path, content) in files {
            fs.add_file(path, content);
        }
        Repository::new("/mock", Arc::new(fs))
    }

    #[test]
    fn test_detect_without_environment_yml() {
        let repo = repo_with(&[("Project.toml", "[deps]\n")]);
        let julia = JuliaBuildPack::new(&repo);

        assert!(julia.detect().unwrap());
        assert!(!CondaBuildPack::new(&repo).detect().unwrap());
    }

    #[test]
    fn test_project_instantiate_in_binder_dir() {
        let repo = repo_with(&[("binder/Project.toml", "[deps]\n")]);
        let steps = JuliaBuildPack::new(&repo).assemble_scripts().unwrap();

        assert_eq!(
            steps.last().unwrap().script,
            "julia --project=binder -e 'using Pkg; Pkg.instantiate(); Pkg.precompile()'"
        );
    }

    #[test]
    fn test_project_at_root() {
        let repo = repo_with(&[("Project.toml", "[deps]\n")]);
        let steps = JuliaBuildPack::new(&repo).assemble_scripts().unwrap();
        assert!(steps.last().unwrap().script.starts_with("julia --project=. "));
    }

    #[test]
    fn test_require_packages() {
        let repo = repo_with(&[("REQUIRE", "julia 0.6\nPlots 0.12\n# comment\nDataFrames\n")]);
        let julia = JuliaBuildPack::new(&repo);

        assert_eq!(julia.required_packages().unwrap(), vec!["Plots", "DataFrames"]);
        assert_eq!(
            julia.assemble_scripts().unwrap().last().unwrap().script,
            "julia -e 'using Pkg; Pkg.add(\"Plots\"); Pkg.add(\"DataFrames\"); Pkg.precompile()'"
        );
    }

    #[test]
    fn test_require_skips_platform_tags() {
        let repo = repo_with(&[(
            "REQUIRE",
            "julia 0.6\n@windows WinRPM\n@osx @unix Homebrew 0.5\nJSON\n",
        )]);
        let julia = JuliaBuildPack::new(&repo);

        assert_eq!(julia.required_packages().unwrap(), vec!["WinRPM", "Homebrew", "JSON"]);
    }

    #[test]
    fn test_build_scripts_extend_conda() {
        let repo = repo_with(&[]);
        let conda = CondaBuildPack::new(&repo).build_scripts();
        let julia = JuliaBuildPack::new(&repo).build_scripts();

        assert_eq!(&julia[..conda.len()], &conda[..]);
        assert!(julia[conda.len()].script.contains("julia-1.9.4-linux-x86_64.tar.gz"));
        assert!(julia[conda.len()].script.contains("/x64/1.9/"));
    }
}
