//! The `imprompt models` command: list models available to the API key.

use clap::Args;
use console::Style;
use imprompt_core::llm::create_provider;
use imprompt_core::Config;

use super::setup;

/// Arguments for the `models` command.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    /// Only show models whose id contains this text
    #[arg(short, long)]
    pub filter: Option<String>,
}

/// Execute the models command.
pub async fn execute(args: ModelsArgs, mut config: Config) -> anyhow::Result<()> {
    setup::ensure_api_key(&mut config)?;
    let api_key = config.api_key()?;

    let provider = create_provider(&config.llm, &api_key);
    tracing::debug!("Listing models from {}", provider.base_url());
    let models = provider.list_models().await?;

    let filter = args.filter.as_deref().map(str::to_lowercase);
    let shown: Vec<&String> = models
        .iter()
        .filter(|id| {
            filter
                .as_deref()
                .map_or(true, |f| id.to_lowercase().contains(f))
        })
        .collect();

    if shown.is_empty() {
        eprintln!("No models found.");
        return Ok(());
    }

    let green = Style::new().green();
    let dim = Style::new().dim();
    for id in shown {
        match role_of(&config, id) {
            Some(role) => println!("{} {}", green.apply_to(id), dim.apply_to(format!("({role})"))),
            None => println!("{id}"),
        }
    }

    Ok(())
}

/// Which configured slot, if any, uses this model.
fn role_of(config: &Config, id: &str) -> Option<&'static str> {
    if id == config.llm.vision_model {
        Some("vision")
    } else if id == config.llm.primary_model {
        Some("primary")
    } else if id == config.llm.fallback_model {
        Some("fallback")
    } else {
        None
    }
}
