//! The `imprompt quick` command: single-pass prompt in a chosen style.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use imprompt_core::{Config, PromptMode, QuickGenerator};

use super::setup;

/// Arguments for the `quick` command.
#[derive(Args, Debug)]
pub struct QuickArgs {
    /// Image file to describe
    pub input: PathBuf,

    /// Writing style for the description
    #[arg(short, long, value_enum, default_value = "narrative")]
    pub mode: ModeArg,
}

/// CLI-facing prompt styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Layered paragraphs on costume, materials and environment
    Narrative,
    /// Dense technical block on materials and body mechanics
    Forensic,
    /// Mood-first cinematic description
    Artistic,
}

impl From<ModeArg> for PromptMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Narrative => PromptMode::Narrative,
            ModeArg::Forensic => PromptMode::Forensic,
            ModeArg::Artistic => PromptMode::Artistic,
        }
    }
}

/// Execute the quick command.
pub async fn execute(args: QuickArgs, mut config: Config) -> anyhow::Result<()> {
    setup::ensure_api_key(&mut config)?;

    let mode = PromptMode::from(args.mode);
    let input = super::expand_path(&args.input);
    tracing::info!("Generating {mode} prompt for {}", input.display());

    let generator = QuickGenerator::from_config(&config)?;
    let prompt = generator
        .generate(&input, mode)
        .await
        .map_err(|e| anyhow::anyhow!("PIPELINE FAILURE: {e}"))?;

    println!("{prompt}");
    Ok(())
}
