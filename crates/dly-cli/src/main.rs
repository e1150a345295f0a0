use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dly_cli::commands::{analyze, entries};
use dly_cli::{Cli, Commands, Config};

/// Load configuration, honoring an explicit `--config` path.
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Analyze {
            date,
            to,
            input,
            mode,
            json,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            analyze::run(&config, *date, *to, input.as_deref(), *mode, *json)?;
        }
        Some(Commands::Entries { date, input, json }) => {
            let config = load_config(cli.config.as_deref())?;
            entries::run(&config, *date, input.as_deref(), *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
