//! imprompt CLI - turn an image into an IP-scrubbed prompt for image generators.
//!
//! The image goes through three LLM stages (vision, detail enhancement,
//! copyright sanitization) and the final prompt is printed to stdout. Logs and
//! progress go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Full three-stage pipeline
//! imprompt generate photo.jpg
//!
//! # Read the image from stdin and show every stage
//! cat photo.png | imprompt generate - --show-stages
//!
//! # Single-pass generator in a given style
//! imprompt quick photo.jpg --mode forensic
//!
//! # Store the API key in the config file
//! imprompt config set-key
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// imprompt - image to copyright-clean generation prompt.
#[derive(Parser, Debug)]
#[command(name = "imprompt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the three-stage pipeline on an image
    Generate(cli::generate::GenerateArgs),

    /// Single-pass prompt in a chosen style, with a copyright guardian pass
    Quick(cli::quick::QuickArgs),

    /// List models available to the configured API key
    Models(cli::models::ModelsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match imprompt_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `imprompt config path`."
            );
            imprompt_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("imprompt v{}", imprompt_core::VERSION);

    match cli.command {
        Commands::Generate(args) => cli::generate::execute(args, config).await,
        Commands::Quick(args) => cli::quick::execute(args, config).await,
        Commands::Models(args) => cli::models::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config).await,
    }
}
