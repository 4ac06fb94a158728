// ABOUTME: Entry point for the ucdeploy CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use ucdeploy::build::Provenance;
use ucdeploy::config::{self, Config};
use ucdeploy::error::Result;
use ucdeploy::output::{Output, OutputMode};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    // Failures are reported in the format the command asked for.
    let mode = match &cli.command {
        Commands::Publish { output, .. } => *output,
        _ => OutputMode::default(),
    };

    let result = run(cli).await;

    if let Err(e) = result {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::discover(&env::current_dir()?),
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { url, force } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, url.as_deref(), force)?;
            println!("Created {}", config::CONFIG_FILENAME);
            Ok(())
        }
        Commands::Publish {
            workspace,
            build_name,
            build_url,
            upstream,
            output,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let workspace = match workspace {
                Some(dir) => dir,
                None => env::current_dir()?,
            };

            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupted, stopping");
                    on_signal.cancel();
                }
            });

            let args = commands::PublishArgs {
                workspace,
                provenance: Provenance {
                    build_name,
                    build_url,
                },
                upstream,
            };
            commands::publish(config, args, cancel, Output::new(output)).await
        }
        Commands::Verify { site } => {
            let config = load_config(cli.config.as_deref())?;
            commands::verify(&config, site.as_deref()).await
        }
        Commands::Sites => {
            let config = load_config(cli.config.as_deref())?;
            commands::sites(&config);
            Ok(())
        }
    }
}
