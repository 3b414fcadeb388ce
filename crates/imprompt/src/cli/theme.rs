//! Shared dialoguer theme and stderr styles.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// Returns a `ColorfulTheme` for imprompt prompts.
///
/// - Prompt prefix: cyan `?`
/// - Active item indicator: cyan `▸`
/// - Success prefix: green `✓`
/// - Error prefix: red `✗`
pub fn imprompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().cyan(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        active_item_prefix: style("▸".to_string()).for_stderr().cyan(),
        active_item_style: Style::new().for_stderr().cyan(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        ..ColorfulTheme::default()
    }
}

/// Print a titled, dimmed-rule section to stderr.
pub fn print_section(title: &str, body: &str) {
    let cyan = Style::new().for_stderr().cyan().bold();
    let dim = Style::new().for_stderr().dim();
    eprintln!();
    eprintln!("{}", cyan.apply_to(title));
    eprintln!("{}", dim.apply_to("─".repeat(50)));
    eprintln!("{body}");
}
