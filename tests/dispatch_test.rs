//! Dispatch over on-disk repositories
//!
//! Covers registry priority, fall-through to the catch-all, and misconfigured
//! registries.

use binderpack::buildpacks::{HaskellBuildPack, PythonBuildPack};
use binderpack::{BuildPack, BuildPackError, BuildPackId, BuildPackRegistry, Dispatcher, Repository};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use yare::parameterized;

fn create_repo(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }
    dir
}

fn select(root: &Path, registry: BuildPackRegistry) -> Result<BuildPackId, BuildPackError> {
    let repo = Repository::open(root);
    Dispatcher::new(registry)
        .select(&repo)
        .map(|buildpack| buildpack.id())
}

#[parameterized(
    haskell = { &[("stack.yaml", "resolver: lts-18.0")], BuildPackId::Haskell },
    haskell_in_binder = { &[("binder/stack.yaml", "resolver: lts-18.0")], BuildPackId::Haskell },
    python_requirements = { &[("requirements.txt", "numpy")], BuildPackId::Python },
    python_setup = { &[("setup.py", "from setuptools import setup")], BuildPackId::Python },
    python_runtime = { &[("runtime.txt", "python-3.10")], BuildPackId::Python },
    conda = { &[("environment.yml", "dependencies: []")], BuildPackId::Conda },
    julia_project = { &[("Project.toml", "[deps]")], BuildPackId::Julia },
    julia_require = { &[("REQUIRE", "julia 0.6")], BuildPackId::Julia },
    r = { &[("runtime.txt", "r-2023-06-15")], BuildPackId::R },
    r_bad_date_is_base = { &[("runtime.txt", "r-someday")], BuildPackId::Base },
    nothing = { &[("README.md", "# hi")], BuildPackId::Base },
    haskell_beats_python = { &[("stack.yaml", "resolver: lts-18.0"), ("requirements.txt", "numpy")], BuildPackId::Haskell },
    julia_beats_conda = { &[("Project.toml", "[deps]"), ("environment.yml", "dependencies: []")], BuildPackId::Julia },
    r_beats_python = { &[("runtime.txt", "r-2023-06-15"), ("requirements.txt", "numpy")], BuildPackId::R },
    docker = { &[("Dockerfile", "FROM python:3.11")], BuildPackId::Docker },
    docker_beats_python = { &[("Dockerfile", "FROM python:3.11"), ("requirements.txt", "numpy")], BuildPackId::Docker },
    binder_dir_shadows_root = { &[("binder/apt.txt", "curl"), ("requirements.txt", "numpy")], BuildPackId::Base },
)]
fn test_default_registry_selection(files: &[(&str, &str)], expected: BuildPackId) {
    let repo = create_repo(files);
    assert_eq!(
        select(repo.path(), BuildPackRegistry::with_defaults()).unwrap(),
        expected
    );
}

#[test]
fn test_permuting_registry_only_matters_when_both_detect() {
    let both = create_repo(&[("stack.yaml", "resolver: lts-18.0"), ("requirements.txt", "numpy")]);
    let only_haskell = create_repo(&[("stack.yaml", "resolver: lts-18.0")]);

    let forward = || BuildPackRegistry::from_ids([BuildPackId::Haskell, BuildPackId::Python, BuildPackId::Base]);
    let reversed = || BuildPackRegistry::from_ids([BuildPackId::Python, BuildPackId::Haskell, BuildPackId::Base]);

    assert_eq!(select(both.path(), forward()).unwrap(), BuildPackId::Haskell);
    assert_eq!(select(both.path(), reversed()).unwrap(), BuildPackId::Python);

    assert_eq!(select(only_haskell.path(), forward()).unwrap(), BuildPackId::Haskell);
    assert_eq!(select(only_haskell.path(), reversed()).unwrap(), BuildPackId::Haskell);
}

#[test]
fn test_catch_all_first_shadows_everything() {
    let repo = create_repo(&[("stack.yaml", "resolver: lts-18.0")]);
    let registry = BuildPackRegistry::from_ids([BuildPackId::Base, BuildPackId::Haskell]);
    assert_eq!(select(repo.path(), registry).unwrap(), BuildPackId::Base);
}

#[test]
fn test_no_catch_all_reports_no_match() {
    let repo = create_repo(&[("README.md", "# hi")]);
    let registry = BuildPackRegistry::from_ids([BuildPackId::Haskell, BuildPackId::Conda]);

    match select(repo.path(), registry) {
        Err(BuildPackError::NoBuildPackMatched { tried }) => {
            assert_eq!(tried, vec!["haskell", "conda"]);
        }
        other => panic!("Expected NoBuildPackMatched, got {:?}", other),
    }
}

#[test]
fn test_missing_markers_are_not_errors() {
    let repo_dir = create_repo(&[]);
    let repo = Repository::open(repo_dir.path());

    for id in BuildPackId::all_variants() {
        let buildpack = id.instantiate(&repo);
        assert_eq!(buildpack.detect().unwrap(), id.is_catch_all(), "{}", id);
        assert_eq!(buildpack.runtime().unwrap(), "", "{}", id);
    }
}

#[test]
fn test_runtime_is_memoized_across_file_changes() {
    let repo_dir = create_repo(&[("stack.yaml", "resolver: lts-18.0\n")]);
    let repo = Repository::open(repo_dir.path());
    let haskell = HaskellBuildPack::new(&repo);

    let first = haskell.runtime().unwrap().to_string();
    fs::write(repo_dir.path().join("stack.yaml"), "resolver: lts-22.0\n").unwrap();
    let second = haskell.runtime().unwrap();

    assert_eq!(first, "resolver: lts-18.0");
    assert_eq!(second, first);

    // A fresh instance sees the new contents
    assert_eq!(HaskellBuildPack::new(&repo).runtime().unwrap(), "resolver: lts-22.0");
}

#[test]
fn test_runtime_memoized_even_when_absent() {
    let repo_dir = create_repo(&[("requirements.txt", "numpy")]);
    let repo = Repository::open(repo_dir.path());
    let python = PythonBuildPack::new(&repo);

    assert_eq!(python.runtime().unwrap(), "");
    fs::write(repo_dir.path().join("runtime.txt"), "python-3.11").unwrap();
    assert_eq!(python.runtime().unwrap(), "");
}

#[cfg(unix)]
#[test]
fn test_unreadable_marker_aborts_dispatch() {
    use std::os::unix::fs::PermissionsExt;

    let repo_dir = create_repo(&[("runtime.txt", "r-2023-06-15")]);
    let path = repo_dir.path().join("runtime.txt");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores file permissions; nothing to observe there
    if fs::read_to_string(&path).is_ok() {
        return;
    }

    let result = select(repo_dir.path(), BuildPackRegistry::with_defaults());
    assert!(matches!(result, Err(BuildPackError::Io { .. })));
}
