use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Select a buildpack for a repository and plan its image build
#[derive(Parser, Debug)]
#[command(
    name = "binderpack",
    about = "Select a buildpack for a repository and plan its image build",
    version,
    long_about = "binderpack inspects a repository's configuration files, selects the first \
                  matching buildpack in priority order, and emits the ordered build steps \
                  and default command for an interactive-computing image."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Show which buildpack applies to a repository",
        long_about = "Runs detection over the registry in priority order and reports the \
                      first buildpack that claims the repository.\n\n\
                      Examples:\n  \
                      binderpack detect\n  \
                      binderpack detect /path/to/repo --format json"
    )]
    Detect(RepoArgs),

    #[command(
        about = "Print the full build plan for a repository",
        long_about = "Selects a buildpack and prints its build, assemble and post-build \
                      steps in execution order, plus the default command.\n\n\
                      Examples:\n  \
                      binderpack plan /path/to/repo\n  \
                      binderpack plan --buildpacks haskell,python,base -f yaml"
    )]
    Plan(RepoArgs),

    #[command(about = "List buildpacks in registry order")]
    List(ListArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RepoArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to repository (defaults to current directory)"
    )]
    pub repository_path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        long,
        value_name = "NAMES",
        value_delimiter = ',',
        help = "Registry order override, e.g. haskell,python,base"
    )]
    pub buildpacks: Option<Vec<String>>,

    #[arg(long, value_name = "DIR", help = "Configuration subdirectory (default: binder)")]
    pub binder_dir: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub buildpacks: Option<Vec<String>>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_detect_args() {
        let args = CliArgs::parse_from(["binderpack", "detect"]);
        match args.command {
            Commands::Detect(repo_args) => {
                assert_eq!(repo_args.format, OutputFormatArg::Human);
                assert!(repo_args.repository_path.is_none());
                assert!(repo_args.buildpacks.is_none());
                assert!(repo_args.binder_dir.is_none());
            }
            _ => panic!("Expected Detect command"),
        }
    }

    #[test]
    fn test_plan_with_buildpacks() {
        let args = CliArgs::parse_from([
            "binderpack",
            "plan",
            "/tmp/repo",
            "--buildpacks",
            "haskell,python",
            "-f",
            "json",
        ]);
        match args.command {
            Commands::Plan(repo_args) => {
                assert_eq!(repo_args.repository_path, Some(PathBuf::from("/tmp/repo")));
                assert_eq!(
                    repo_args.buildpacks,
                    Some(vec!["haskell".to_string(), "python".to_string()])
                );
                assert_eq!(repo_args.format, OutputFormatArg::Json);
            }
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = CliArgs::try_parse_from(["binderpack", "-q", "-v", "list"]);
        assert!(result.is_err());
    }
}
