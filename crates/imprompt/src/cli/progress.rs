//! Spinner shown on stderr while the pipeline runs.

use std::time::Duration;

use imprompt_core::StageId;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a spinner that the progress callback updates per stage.
pub fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} [{elapsed}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Apply one progress event to the spinner. `Done` finishes it.
pub fn on_stage(pb: &ProgressBar, message: &str, stage: StageId) {
    tracing::debug!(stage = %stage, "{message}");
    match stage {
        StageId::Done => pb.finish_with_message(message.to_string()),
        _ => pb.set_message(message.to_string()),
    }
}
