//! The `imprompt config` command for configuration management.

use clap::{Args, Subcommand};
use imprompt_core::Config;

use super::setup;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration (the API key is masked)
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Store an API key in the config file
    SetKey {
        /// The key; prompted for when omitted
        key: Option<String>,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs, config: Config) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let mut shown = config;
            shown.llm.api_key = mask_key(&shown.llm.api_key);
            println!("{}", shown.to_toml()?);
        }

        ConfigCommand::Path => {
            let path = Config::default_path();
            println!("{}", path.display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let toml = Config::default().to_toml()?;
            std::fs::write(&path, toml)?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }

        ConfigCommand::SetKey { key } => {
            let key = match key {
                Some(k) if !k.trim().is_empty() => k.trim().to_string(),
                _ => setup::read_key_interactive()?,
            };
            let path = Config::default_path();
            setup::save_key_to_config(&path, &key)?;
            println!("API key saved to: {}", path.display());
        }
    }

    Ok(())
}

/// Mask a literal key for display; `${VAR}` references are shown as-is.
fn mask_key(key: &str) -> String {
    let key = key.trim();
    if key.starts_with("${") || key.is_empty() {
        return key.to_string();
    }
    let prefix: String = key.chars().take(4).collect();
    format!("{prefix}…")
}
