use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "upforge")]
#[command(about = "Generate Crossplane-style provider sources from resource definitions", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full generation pipeline
    Generate {
        /// Provider config file (TOML)
        #[arg(short, long, env = "UPFORGE_CONFIG", default_value = "upforge.toml")]
        config: PathBuf,

        /// Root directory of the generated provider
        #[arg(short, long)]
        output: PathBuf,

        /// Do not run goimports over the generated sources
        #[arg(long)]
        skip_format: bool,
    },

    /// Print the resource grouping and conversion plan as JSON
    Plan {
        /// Provider config file (TOML)
        #[arg(short, long, env = "UPFORGE_CONFIG", default_value = "upforge.toml")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            config,
            output,
            skip_format,
        } => {
            let summary = upforge::run_generate(&config, &output, skip_format)?;
            info!(
                resources = summary.resources,
                controller_keys = summary.controller_packages.len(),
                api_packages = summary.api_packages.len(),
                "Done"
            );
            Ok(())
        }
        Commands::Plan { config } => {
            let plan = upforge::run_plan(&config)?;
            let json = serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
            println!("{}", json);
            Ok(())
        }
    }
}
