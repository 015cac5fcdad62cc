//! Command handlers. Each returns the process exit code.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error};

use super::commands::{CliArgs, ListArgs, RepoArgs};
use super::output::{DetectionReport, OutputFormatter};
use crate::config::BinderpackConfig;
use crate::fs::RealFileSystem;
use crate::plan::BuildPlan;
use crate::registry::{BuildPackRegistry, Dispatcher};
use crate::repository::Repository;

/// Loads the environment configuration with the global logging flags applied.
///
/// `--log-level` beats `--verbose`, which beats `--quiet`.
pub fn load_config(args: &CliArgs) -> BinderpackConfig {
    let mut config = BinderpackConfig::default();
    let level = if let Some(level) = &args.log_level {
        Some(level.to_lowercase())
    } else if args.verbose {
        Some("debug".to_string())
    } else if args.quiet {
        Some("error".to_string())
    } else {
        None
    };
    if let Some(level) = level {
        config.log_level = level;
    }
    config
}

fn resolve_config(
    base: &BinderpackConfig,
    buildpacks: Option<&Vec<String>>,
    binder_dir: Option<&String>,
) -> Result<BinderpackConfig> {
    let mut config = base.clone();
    if let Some(names) = buildpacks {
        config.buildpacks = Some(names.clone());
    }
    if let Some(dir) = binder_dir {
        config.binder_dir = dir.clone();
    }
    config.validate()?;
    debug!("{}", config);
    Ok(config)
}

fn open_repository(path: Option<&PathBuf>, config: &BinderpackConfig) -> Result<Repository> {
    let root = match path {
        Some(p) => p.clone(),
        None => env::current_dir().context("Failed to determine current directory")?,
    };
    if !root.is_dir() {
        anyhow::bail!("Repository path is not a directory: {}", root.display());
    }
    Ok(Repository::with_binder_dir(
        root,
        &config.binder_dir,
        Arc::new(RealFileSystem::new()),
    ))
}

fn run_detect(args: &RepoArgs, base: &BinderpackConfig) -> Result<String> {
    let config = resolve_config(base, args.buildpacks.as_ref(), args.binder_dir.as_ref())?;
    let repo = open_repository(args.repository_path.as_ref(), &config)?;
    let dispatcher = Dispatcher::new(config.registry()?);

    let buildpack = dispatcher.select(&repo)?;
    let report = DetectionReport {
        repository: repo.root().display().to_string(),
        buildpack: buildpack.id(),
        runtime: buildpack.runtime()?.to_string(),
    };
    OutputFormatter::new(args.format.into()).format_detection(&report)
}

fn run_plan(args: &RepoArgs, base: &BinderpackConfig) -> Result<String> {
    let config = resolve_config(base, args.buildpacks.as_ref(), args.binder_dir.as_ref())?;
    let repo = open_repository(args.repository_path.as_ref(), &config)?;
    let dispatcher = Dispatcher::new(config.registry()?);

    let plan = BuildPlan::for_repository(&dispatcher, &repo)
        .with_context(|| format!("Failed to plan build for {}", repo.root().display()))?;
    OutputFormatter::new(args.format.into()).format_plan(&plan)
}

fn run_list(args: &ListArgs, base: &BinderpackConfig) -> Result<String> {
    let registry = match &args.buildpacks {
        Some(names) => BuildPackRegistry::from_names(names.as_slice())?,
        None => resolve_config(base, None, None)?.registry()?,
    };
    OutputFormatter::new(args.format.into()).format_registry(registry.ids())
}

fn report(result: Result<String>) -> i32 {
    match result {
        Ok(output) => {
            print!("{}", output);
            0
        }
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

pub fn handle_detect(args: &RepoArgs, config: &BinderpackConfig) -> i32 {
    report(run_detect(args, config))
}

pub fn handle_plan(args: &RepoArgs, config: &BinderpackConfig) -> i32 {
    report(run_plan(args, config))
}

pub fn handle_list(args: &ListArgs, config: &BinderpackConfig) -> i32 {
    report(run_list(args, config))
}
