//! CLI command implementations.

pub mod config;
pub mod generate;
pub mod models;
mod progress;
pub mod quick;
mod setup;
mod theme;

use std::path::{Path, PathBuf};

/// Expand `~` and `$VAR` in a user-supplied path. Unexpandable input is kept.
pub(crate) fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => path.to_path_buf(),
    }
}
