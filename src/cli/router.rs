//! Command routing and execution

use crate::app::AppConfig;
use crate::cli::args::{Commands, PruneArgs};
use crate::config::{find_manifest, load_project, Project, ProjectModel, MANIFEST_NAMES};
use crate::error::{ErrorCode, PruneError};
use crate::provider::AwsLambdaProvider;
use crate::prune::{PruneOrchestrator, PruneRequest, RunReport};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Execute a CLI command based on the parsed arguments
pub async fn execute_command(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Prune(args) => run_prune(args, config).await,
        Commands::PostDeploy { prune, args } => {
            if !prune {
                debug!("post-deploy without --prune, nothing to do");
                return Ok(());
            }
            if !args.json {
                println!("------------------------");
            }
            run_prune(args, config).await
        }
    }
}

async fn run_prune(args: PruneArgs, config: &AppConfig) -> Result<()> {
    let manifest = locate_manifest(config)?;
    let project = load_project(&manifest).await?;

    let working_dir = tokio::fs::canonicalize(&config.working_dir)
        .await
        .unwrap_or_else(|_| config.working_dir.clone());
    let request = build_request(&args, &project, &working_dir);
    debug!("Prune request: {:?}", request);

    let provider = AwsLambdaProvider::with_stage_profiles(project.stage_profiles());
    let progress = if args.json {
        ProgressBar::hidden()
    } else {
        spinner()
    };

    let report = PruneOrchestrator::new(&project, &provider, project.prune.clone())
        .with_progress(progress)
        .run(&request)
        .await?;

    print_report(&report, args.json)?;

    let failures = report.failures();
    if !failures.is_empty() {
        return Err(PruneError::other(format!("Failed to prune {} item(s)", failures.len())).into());
    }
    Ok(())
}

fn locate_manifest(config: &AppConfig) -> Result<PathBuf, PruneError> {
    if let Some(path) = &config.project {
        return Ok(path.clone());
    }
    find_manifest(&config.working_dir).ok_or_else(|| {
        PruneError::config_with_code(
            ErrorCode::CONFIG_NOT_FOUND,
            format!(
                "No {} found in {} or any parent directory",
                MANIFEST_NAMES.join(" / "),
                config.working_dir.display()
            ),
        )
    })
}

/// Translate CLI arguments into a prune request
///
/// Functions under `working_dir` are passed along for runs that name none.
pub fn build_request(args: &PruneArgs, project: &Project, working_dir: &Path) -> PruneRequest {
    PruneRequest {
        names: args.names.clone(),
        all: args.all,
        region: args.region.clone(),
        stage: args.stage.clone(),
        keep_count: args.number,
        dry_run: args.dry_run,
        context_functions: project
            .functions_in_context(working_dir)
            .into_iter()
            .map(|f| f.name.clone())
            .collect(),
    }
}

fn spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        bar.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
    }
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}
