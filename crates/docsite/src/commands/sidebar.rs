//! `docsite sidebar` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use docsite_config::{CliSettings, Config};
use docsite_sidebar::{build_sidebar, build_sidebar_map};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sidebar command.
#[derive(Args)]
pub(crate) struct SidebarArgs {
    /// Path to configuration file (default: auto-discover docsite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List a single folder instead of every configured section.
    #[arg(short, long)]
    folder: Option<PathBuf>,
}

impl SidebarArgs {
    /// Execute the sidebar command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or a folder cannot be listed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let json = match &self.folder {
            Some(folder) => folder_json(folder)?,
            None => {
                let config = Config::load(self.config.as_deref(), Some(&CliSettings::default()))?;
                config_json(&config)?
            }
        };
        Output::new().result(&json)?;
        Ok(())
    }
}

/// Document names of one folder as a JSON array.
fn folder_json(folder: &Path) -> Result<String, CliError> {
    let documents = build_sidebar(folder)?;
    tracing::debug!(folder = %folder.display(), documents = documents.len(), "Folder listed");
    Ok(serde_json::to_string_pretty(&documents)?)
}

/// Sidebar of every configured section as a JSON object keyed by route.
fn config_json(config: &Config) -> Result<String, CliError> {
    let map = build_sidebar_map(&config.build_resolved, &config.sidebar)?;
    Ok(serde_json::to_string_pretty(&map)?)
}
