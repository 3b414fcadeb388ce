//! The `imprompt generate` command: run the three-stage pipeline on one image.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use console::Style;
use imprompt_core::pipeline::ProgressCallback;
use imprompt_core::{Config, LlmClient, PipelineResult, PipelineTrace, PromptPipeline, StageId};

use super::{progress, setup, theme};

/// Arguments for the `generate` command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Image file to describe, or `-` to read image bytes from stdin
    pub input: PathBuf,

    /// Write the prompt to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print every intermediate stage output to stderr
    #[arg(long)]
    pub show_stages: bool,

    /// Print generation tips after the prompt
    #[arg(long)]
    pub tips: bool,

    /// Vision model for stage 1 (overrides config)
    #[arg(long)]
    pub vision_model: Option<String>,

    /// Primary text model for stages 2 and 3 (overrides config)
    #[arg(long)]
    pub primary_model: Option<String>,

    /// Model used once the primary is rate limited out (overrides config)
    #[arg(long)]
    pub fallback_model: Option<String>,

    /// Re-prompt once when sanitization shortens the text
    #[arg(long)]
    pub length_floor: bool,
}

impl GenerateArgs {
    /// `--output`, expanded the same way as the input path.
    fn output_path(&self) -> Option<PathBuf> {
        self.output.as_deref().map(super::expand_path)
    }
}

/// Generation tips shown with `--tips`.
const TIPS: &str = "\
• Aspect ratio: for cinematic results, use --ar 16:9 or --ar 21:9.
• Negative prompting: exclude 'blurry, cartoonish, low-res' in your generator settings.
• Lighting: if the result is too flat, add 'volumetric god rays' or 'hard rim lighting'.
• Resolution: specify 'shot on 35mm film' or '8k octane render' for extreme texture definition.";

/// Execute the generate command.
pub async fn execute(args: GenerateArgs, mut config: Config) -> anyhow::Result<()> {
    apply_overrides(&args, &mut config);
    config.validate()?;
    setup::ensure_api_key(&mut config)?;

    let input = ImageInput::from_arg(&args.input, std::io::stdin().lock())?;

    let client = LlmClient::from_config(&config)?;
    let pipeline = PromptPipeline::new(Arc::new(client), &config);

    let spinner = progress::create_spinner();
    let on_progress = {
        let spinner = spinner.clone();
        move |message: &str, stage: StageId| progress::on_stage(&spinner, message, stage)
    };

    let trace = match run_input(&pipeline, input, Some(&on_progress)).await {
        Ok(trace) => trace,
        Err(e) => {
            spinner.abandon_with_message("Pipeline failed");
            anyhow::bail!("PIPELINE FAILURE: {e}");
        }
    };

    if args.show_stages {
        print_stages(&trace);
    }

    match args.output_path() {
        Some(path) => {
            std::fs::write(&path, &trace.prompt)?;
            tracing::info!("Prompt written to {}", path.display());
        }
        None => println!("{}", trace.prompt),
    }

    if args.tips {
        theme::print_section("Generation tips", TIPS);
    }

    Ok(())
}

fn apply_overrides(args: &GenerateArgs, config: &mut Config) {
    if let Some(model) = &args.vision_model {
        config.llm.vision_model = model.clone();
    }
    if let Some(model) = &args.primary_model {
        config.llm.primary_model = model.clone();
    }
    if let Some(model) = &args.fallback_model {
        config.llm.fallback_model = model.clone();
    }
    if args.length_floor {
        config.stages.enforce_length_floor = true;
    }
}

/// Where the image for one run comes from.
///
/// Stdin bytes are buffered into a temp file owned by the value, so the file
/// is removed whenever the input is dropped.
enum ImageInput {
    File(PathBuf),
    Buffered(tempfile::NamedTempFile),
}

impl ImageInput {
    /// `-` reads all of `stdin`; anything else is an expanded file path.
    fn from_arg(arg: &Path, stdin: impl Read) -> anyhow::Result<Self> {
        if arg.as_os_str() == "-" {
            Ok(Self::Buffered(buffer_to_tempfile(stdin)?))
        } else {
            Ok(Self::File(super::expand_path(arg)))
        }
    }

    fn path(&self) -> &Path {
        match self {
            Self::File(path) => path,
            Self::Buffered(file) => file.path(),
        }
    }
}

/// Run the pipeline on `input`, which is consumed so any temp file is
/// removed once the run ends, whatever the outcome.
async fn run_input(
    pipeline: &PromptPipeline,
    input: ImageInput,
    progress: Option<&ProgressCallback>,
) -> PipelineResult<PipelineTrace> {
    pipeline.run_with_trace(input.path(), progress).await
}

fn buffer_to_tempfile(mut reader: impl Read) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    if bytes.is_empty() {
        anyhow::bail!("No image data received on stdin");
    }

    let mut file = tempfile::Builder::new().prefix("imprompt-").tempfile()?;
    file.write_all(&bytes)?;
    file.flush()?;
    tracing::debug!("Buffered {} bytes from stdin to {}", bytes.len(), file.path().display());
    Ok(file)
}

fn print_stages(trace: &PipelineTrace) {
    theme::print_section("Stage 1: vision", &trace.vision);
    theme::print_section("Stage 2: enhanced", &trace.enhanced);
    theme::print_section("Stage 3: sanitized", &trace.sanitized);
    let dim = Style::new().for_stderr().dim();
    eprintln!();
    eprintln!("{}", dim.apply_to("Final prompt follows on stdout."));
}
