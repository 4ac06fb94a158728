// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ucdeploy::build::UpstreamResult;
use ucdeploy::output::OutputMode;

#[derive(Parser)]
#[command(name = "ucdeploy")]
#[command(about = "Publish build artifacts and trigger deployments on UrbanCode Deploy")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (discovered in the current directory when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the configured publish step for a build
    Publish {
        /// Build workspace; relative push directories resolve against it
        #[arg(short, long)]
        workspace: Option<PathBuf>,

        /// Build display name used for the version link
        #[arg(long, default_value = "")]
        build_name: String,

        /// Build URL linked from pushed versions
        #[arg(long, default_value = "")]
        build_url: String,

        /// Result of the build so far
        #[arg(long, default_value = "success", value_parser = parse_upstream)]
        upstream: UpstreamResult,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputMode::Normal)]
        output: OutputMode,
    },

    /// Check that a site is reachable with its configured credentials
    Verify {
        /// Site profile name (first configured site when omitted)
        #[arg(short, long)]
        site: Option<String>,
    },

    /// Initialize a new ucdeploy.yml configuration file
    Init {
        /// Server URL to put in the template
        #[arg(long)]
        url: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// List configured site profiles
    Sites,
}

fn parse_upstream(value: &str) -> Result<UpstreamResult, String> {
    value.parse()
}
