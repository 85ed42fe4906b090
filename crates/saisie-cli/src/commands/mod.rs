//! Subcommands of the `saisie` binary.

pub mod batch;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod convert;
pub mod replay;

use std::path::Path;

use saisie_core::SaisieConfig;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

/// Load the configuration from `--config`, else the default file if present,
/// else the built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<SaisieConfig> {
    if let Some(path) = config_path {
        return Ok(SaisieConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using configuration from {}", default_path.display());
        Ok(SaisieConfig::from_file(&default_path)?)
    } else {
        Ok(SaisieConfig::default())
    }
}
