//! CLI argument structures

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Remove old versions of a project's Lambda functions
#[derive(Parser)]
#[command(name = "lambda-prune")]
#[command(about = "lambda-prune - Delete old Lambda function versions, keeping aliased and recent ones", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the project manifest (default: search upwards from the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Prune old versions of the project's functions
    Prune(PruneArgs),

    /// Hook run after a deployment; prunes only with --prune
    PostDeploy {
        /// Prune after deploying
        #[arg(short, long)]
        prune: bool,

        #[command(flatten)]
        args: PruneArgs,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct PruneArgs {
    /// Functions to prune (default: functions under the current directory)
    #[arg(value_name = "FUNCTION")]
    pub names: Vec<String>,

    /// Only prune deployments of this stage
    #[arg(short, long)]
    pub stage: Option<String>,

    /// Only prune in this region
    #[arg(short, long)]
    pub region: Option<String>,

    /// Prune every function of the project
    #[arg(short, long)]
    pub all: bool,

    /// Number of recent versions to keep (default: from the manifest, else 3)
    #[arg(short = 'n', long = "number", value_name = "N")]
    pub number: Option<usize>,

    /// Show what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
