//! API key detection, input, and optional persistence.

use std::io::IsTerminal;
use std::path::Path;

use console::Style;
use dialoguer::{Password, Select};
use imprompt_core::{Config, ConfigError};

use super::theme::imprompt_theme;

/// Make sure `config` carries a usable API key before any network call.
///
/// When the key doesn't resolve and we're attached to a terminal, ask for it
/// and offer to save it. Otherwise fail with `MissingApiKey`.
pub fn ensure_api_key(config: &mut Config) -> anyhow::Result<()> {
    let missing = match config.api_key() {
        Ok(_) => return Ok(()),
        Err(e) => e,
    };

    if !is_interactive() {
        return Err(missing.into());
    }

    let Some(key) = prompt_for_key(config)? else {
        return Err(missing.into());
    };
    config.set_api_key(&key);
    Ok(())
}

/// Prompt for a key and ask whether to save it. `None` when skipped.
fn prompt_for_key(config: &Config) -> anyhow::Result<Option<String>> {
    let theme = imprompt_theme();
    let warn = Style::new().for_stderr().yellow();

    let env_var = config.llm.api_key_env_var().unwrap_or("GROQ_API_KEY");
    eprintln!("  {}", warn.apply_to(format!("{env_var} not set.")));

    let key = match Password::with_theme(&theme)
        .with_prompt("Enter your API key (empty to cancel)")
        .allow_empty_password(true)
        .interact()
    {
        Ok(k) if !k.trim().is_empty() => k.trim().to_string(),
        _ => return Ok(None),
    };

    let save_options = &["Yes, save to config file", "No, use for this session only"];
    let save_choice = Select::with_theme(&theme)
        .with_prompt("Save this key for future sessions?")
        .items(save_options)
        .default(0)
        .interact_opt()?;

    match save_choice {
        Some(0) => {
            let path = Config::default_path();
            match save_key_to_config(&path, &key) {
                Ok(()) => {
                    let dim = Style::new().for_stderr().dim();
                    eprintln!("  {}", dim.apply_to(format!("Key saved to {}", path.display())));
                }
                Err(e) => {
                    eprintln!("  {}", warn.apply_to(format!("Could not save to config: {e}")));
                    eprintln!("  Using key for this session only.");
                }
            }
            Ok(Some(key))
        }
        Some(1) => Ok(Some(key)),
        _ => Ok(None),
    }
}

/// Read a key interactively for `config set-key` without an argument.
pub fn read_key_interactive() -> anyhow::Result<String> {
    if !is_interactive() {
        anyhow::bail!("No key given and no terminal to prompt on. Pass the key as an argument.");
    }
    let key = Password::with_theme(&imprompt_theme())
        .with_prompt("API key")
        .interact()?;
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(ConfigError::ValidationError("API key must not be empty".into()).into());
    }
    Ok(key)
}

fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && console::user_attended_stderr()
}

/// Write `key` to `[llm] api_key` in the config at `path`, preserving
/// existing comments and unrelated settings.
pub fn save_key_to_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let content = if path.exists() {
        std::fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut doc: toml_edit::DocumentMut = content.parse()?;

    let llm = doc
        .entry("llm")
        .or_insert(toml_edit::table())
        .as_table_like_mut()
        .ok_or_else(|| anyhow::anyhow!("[llm] in {} is not a table", path.display()))?;
    llm.insert("api_key", toml_edit::value(key));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, doc.to_string())?;
    tracing::debug!("API key written to {}", path.display());

    Ok(())
}
