//! Base buildpack: the catch-all every repository falls back to

use crate::buildpack::{chain, BuildPack, BuildPackId, Step};
use crate::error::Result;
use crate::repository::Repository;
use std::collections::BTreeSet;

const BASE_PACKAGES: &[&str] = &[
    "bash",
    "bzip2",
    "ca-certificates",
    "curl",
    "file",
    "gettext-base",
    "git",
    "less",
    "locales",
    "openssl",
    "unzip",
    "xz-utils",
];

/// Environment shared by every image: locale, notebook user, application base.
///
/// Specialized buildpacks build on top of this one and never replace its
/// detection: it claims every repository, so it must come last in a registry.
pub struct BaseBuildPack<'a> {
    repo: &'a Repository,
}

impl<'a> BaseBuildPack<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &'a Repository {
        self.repo
    }

    /// Packages listed in `apt.txt`, skipping blank lines and comments
    pub fn apt_packages(&self) -> Result<Vec<String>> {
        let content = self.repo.read_text("apt.txt")?.into_trimmed();
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect())
    }
}

impl BuildPack for BaseBuildPack<'_> {
    fn id(&self) -> BuildPackId {
        BuildPackId::Base
    }

    fn detect(&self) -> Result<bool> {
        Ok(true)
    }

    fn runtime(&self) -> Result<&str> {
        Ok("")
    }

    fn packages(&self) -> BTreeSet<String> {
        BASE_PACKAGES.iter().map(|p| p.to_string()).collect()
    }

    fn env(&self) -> Vec<(String, String)> {
        [
            ("APP_BASE", "/srv"),
            ("LANG", "en_US.UTF-8"),
            ("LANGUAGE", "en_US.UTF-8"),
            ("LC_ALL", "en_US.UTF-8"),
            ("SHELL", "/bin/bash"),
            ("USER", "${NB_USER}"),
            ("HOME", "/home/${NB_USER}"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn path(&self) -> Vec<String> {
        vec!["${HOME}/.local/bin".to_string()]
    }

    fn build_scripts(&self) -> Vec<Step> {
        vec![
            Step::root(chain(&[
                "echo \"en_US.UTF-8 UTF-8\" > /etc/locale.gen",
                "locale-gen",
            ])),
            Step::root(chain(&[
                "groupadd --gid ${NB_UID} ${NB_USER}",
                "useradd --comment \"Default user\" --create-home --gid ${NB_UID} \
                 --no-log-init --shell /bin/bash --uid ${NB_UID} ${NB_USER}",
                "mkdir -p ${APP_BASE}",
                "chown -R ${NB_USER}:${NB_USER} ${APP_BASE}",
            ])),
        ]
    }

    fn assemble_scripts(&self) -> Result<Vec<Step>> {
        let packages = self.apt_packages()?;
        if packages.is_empty() {
            return Ok(Vec::new());
        }

        let install = format!(
            "apt-get install --yes --no-install-recommends {}",
            packages.join(" ")
        );
        Ok(vec![Step::root(chain(&[
            "apt-get -qq update",
            install.as_str(),
            "apt-get -qq purge",
            "apt-get -qq clean",
            "rm -rf /var/lib/apt/lists/*",
        ]))])
    }

    fn post_build_scripts(&self) -> Result<Vec<Step>> {
        if !self.repo.path_exists("postBuild") {
            return Ok(Vec::new());
        }

        let script = self.repo.relative_binder_path("postBuild");
        let chmod = format!("chmod +x {}", script);
        let run = format!("./{}", script);
        Ok(vec![Step::user(chain(&[chmod.as_str(), run.as_str()]))])
    }

    fn default_command(&self) -> Vec<String> {
        ["jupyter", "notebook", "--ip", "0.0.0.0"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}
