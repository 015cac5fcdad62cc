//! Output formatting for JSON, YAML and human-readable text

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write;

use crate::buildpack::BuildPackId;
use crate::plan::BuildPlan;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Result of the `detect` command
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub repository: String,
    pub buildpack: BuildPackId,
    pub runtime: String,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_detection(&self, report: &DetectionReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(report),
            OutputFormat::Yaml => to_yaml(report),
            OutputFormat::Human => {
                let mut out = String::new();
                writeln!(out, "Repository: {}", report.repository)?;
                writeln!(out, "Buildpack:  {}", report.buildpack)?;
                if !report.runtime.is_empty() {
                    writeln!(out, "Runtime:    {}", report.runtime)?;
                }
                Ok(out)
            }
        }
    }

    pub fn format_plan(&self, plan: &BuildPlan) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(plan),
            OutputFormat::Yaml => to_yaml(plan),
            OutputFormat::Human => Ok(format_plan_human(plan)?),
        }
    }

    pub fn format_registry(&self, ids: &[BuildPackId]) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(&ids),
            OutputFormat::Yaml => to_yaml(&ids),
            OutputFormat::Human => {
                let mut out = String::new();
                for (i, id) in ids.iter().enumerate() {
                    let marker = if id.is_catch_all() { " (catch-all)" } else { "" };
                    writeln!(out, "{:>2}. {}{}", i + 1, id, marker)?;
                }
                Ok(out)
            }
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")
}

fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).context("Failed to serialize output to YAML")
}

fn format_plan_human(plan: &BuildPlan) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Buildpack: {}", plan.buildpack)?;
    if !plan.runtime.is_empty() {
        writeln!(out, "Runtime:   {}", plan.runtime)?;
    }
    if let Some(dockerfile) = &plan.dockerfile {
        writeln!(out, "Dockerfile: {}", dockerfile)?;
        return Ok(out);
    }
    writeln!(out, "Command:   {}", plan.default_command.join(" "))?;

    if !plan.packages.is_empty() {
        let packages: Vec<&str> = plan.packages.iter().map(String::as_str).collect();
        writeln!(out, "Packages:  {}", packages.join(" "))?;
    }

    if !plan.env.is_empty() {
        writeln!(out, "\nEnvironment:")?;
        for (key, value) in &plan.env {
            writeln!(out, "  {}={}", key, value)?;
        }
    }

    writeln!(out, "\nSteps:")?;
    for (i, step) in plan.steps.iter().enumerate() {
        writeln!(out, "[{}] as {}", i + 1, step.user)?;
        for line in step.script.lines() {
            writeln!(out, "    {}", line)?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildpack::Step;

    fn sample_plan() -> BuildPlan {
        BuildPlan {
            buildpack: BuildPackId::Haskell,
            runtime: "resolver: lts-18.0".to_string(),
            packages: ["curl".to_string()].into_iter().collect(),
            env: vec![("APP_BASE".to_string(), "/srv".to_string())],
            path: vec![],
            steps: vec![
                Step::root("apt-get update"),
                Step::user("stack setup && \\\nstack build"),
            ],
            default_command: vec!["stack".to_string(), "exec".to_string()],
            dockerfile: None,
        }
    }

    #[test]
    fn test_plan_human() {
        let out = OutputFormatter::new(OutputFormat::Human)
            .format_plan(&sample_plan())
            .unwrap();

        assert!(out.contains("Buildpack: haskell"));
        assert!(out.contains("Runtime:   resolver: lts-18.0"));
        assert!(out.contains("[1] as root\n    apt-get update"));
        assert!(out.contains("[2] as ${NB_USER}\n    stack setup && \\\n    stack build"));
    }

    #[test]
    fn test_docker_plan_human() {
        let plan = BuildPlan {
            buildpack: BuildPackId::Docker,
            runtime: String::new(),
            packages: Default::default(),
            env: vec![],
            path: vec![],
            steps: vec![],
            default_command: vec![],
            dockerfile: Some("binder/Dockerfile".to_string()),
        };
        let out = OutputFormatter::new(OutputFormat::Human).format_plan(&plan).unwrap();
        assert_eq!(out, "Buildpack: docker\nDockerfile: binder/Dockerfile\n");
    }

    #[test]
    fn test_plan_json_round_trips() {
        let plan = sample_plan();
        let out = OutputFormatter::new(OutputFormat::Json).format_plan(&plan).unwrap();
        let parsed: BuildPlan = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, plan);
    }

    #[test]
    fn test_plan_yaml() {
        let out = OutputFormatter::new(OutputFormat::Yaml)
            .format_plan(&sample_plan())
            .unwrap();
        assert!(out.contains("buildpack: haskell"));
    }

    #[test]
    fn test_registry_human_marks_catch_all() {
        let out = OutputFormatter::new(OutputFormat::Human)
            .format_registry(&[BuildPackId::Python, BuildPackId::Base])
            .unwrap();
        assert_eq!(out, " 1. python\n 2. base (catch-all)\n");
    }

    #[test]
    fn test_detection_json() {
        let report = DetectionReport {
            repository: "/tmp/repo".to_string(),
            buildpack: BuildPackId::Conda,
            runtime: String::new(),
        };
        let out = OutputFormatter::new(OutputFormat::Json)
            .format_detection(&report)
            .unwrap();
        assert!(out.contains("\"buildpack\": \"conda\""));
    }
}
