use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::ConfigOverrides;
use crate::tracker::ExecutionSelector;

#[derive(Parser, Clone, Debug)]
#[clap(
    name = "pipeline-lens",
    about = "Follow an AWS CodePipeline execution and stream its CodeBuild logs",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Name of the pipeline to trace
    #[clap(long, short, env = "PIPELINE_LENS_NAME")]
    pub name: String,

    /// Start a new execution of the pipeline and trace it
    #[clap(long, conflicts_with = "execution_id")]
    pub run: bool,

    /// Trace this execution instead of the latest one
    #[clap(long)]
    pub execution_id: Option<String>,

    /// Print the current position once instead of following the execution
    #[clap(long)]
    pub no_follow: bool,

    /// AWS profile to use
    #[clap(long)]
    pub profile: Option<String>,

    /// AWS region to use
    #[clap(long)]
    pub region: Option<String>,

    /// Configuration file, defaults to the user's config directory
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// More diagnostics on stderr (-v, -vv, -vvv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn execution_selector(&self) -> ExecutionSelector {
        match (&self.execution_id, self.run) {
            (Some(id), _) => ExecutionSelector::Id(id.clone()),
            (None, true) => ExecutionSelector::Start,
            (None, false) => ExecutionSelector::Latest,
        }
    }

    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_file: self.config.clone(),
            profile: self.profile.clone(),
            region: self.region.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["pipeline-lens", "--name", "api"], ExecutionSelector::Latest)]
    #[case(&["pipeline-lens", "--name", "api", "--run"], ExecutionSelector::Start)]
    #[case(
        &["pipeline-lens", "--name", "api", "--execution-id", "exec-1"],
        ExecutionSelector::Id("exec-1".into())
    )]
    fn selects_execution(#[case] args: &[&str], #[case] expected: ExecutionSelector) {
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.execution_selector(), expected);
    }

    #[test]
    fn run_conflicts_with_execution_id() {
        let err = Cli::try_parse_from([
            "pipeline-lens",
            "--name",
            "api",
            "--run",
            "--execution-id",
            "exec-1",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn overrides_carry_aws_flags() {
        let cli = Cli::try_parse_from([
            "pipeline-lens",
            "--name",
            "api",
            "--profile",
            "ci",
            "--region",
            "eu-west-1",
            "--config",
            "/tmp/lens.toml",
            "-vv",
            "--no-follow",
        ])
        .unwrap();

        let overrides = cli.config_overrides();
        assert_eq!(overrides.profile.as_deref(), Some("ci"));
        assert_eq!(overrides.region.as_deref(), Some("eu-west-1"));
        assert_eq!(overrides.config_file, Some(PathBuf::from("/tmp/lens.toml")));
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_follow);
    }
}
