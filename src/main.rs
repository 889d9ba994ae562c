use clap::Parser;
use lambda_prune::app::{handle_fatal_error, init_logging, AppConfig};
use lambda_prune::cli::{execute_command, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::new(cli.verbose) {
        Ok(config) => config.with_project(cli.project),
        Err(e) => handle_fatal_error(e, cli.verbose),
    };
    init_logging(&config);

    if let Err(e) = execute_command(cli.command, &config).await {
        handle_fatal_error(e, config.verbose);
    }
}
