use clap::Parser;
use colored::Colorize;

use nixbom_cli::cli::{Cli, Commands};
use nixbom_cli::commands;
use nixbom_cli::error::CliError;
use nixbom_cli::logging;
use nixbom_cli::output::OutputWriter;
use nixbom_core::config::{GeneralConfig, NixbomConfig};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let general = logging::apply_log_level_override(
        logging_config(&cli).await,
        cli.log_level.as_deref(),
    )?;
    logging::init_tracing(&general).map_err(|e| CliError::Config(e.to_string()))?;
    nixbom_core::metrics::describe_all();

    tracing::debug!(config = %cli.config.display(), "nixbom starting");

    let writer = OutputWriter::new(cli.output);
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, &cli.config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}

/// `[general]` from the config file, or defaults when it cannot be loaded.
///
/// Load errors are reported later by the command itself.
async fn logging_config(cli: &Cli) -> GeneralConfig {
    NixbomConfig::load_or_default(&cli.config)
        .await
        .map(|config| config.general)
        .unwrap_or_default()
}
