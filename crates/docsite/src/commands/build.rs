//! `docsite build` command implementation.

use std::path::PathBuf;

use clap::Args;
use docsite_config::{CliSettings, Config};
use docsite_site::Site;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover docsite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory sidebar folders are resolved against (overrides config).
    #[arg(long)]
    content_root: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Enable verbose output (show per-section and build logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, a sidebar folder cannot be
    /// listed or a page cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            content_root: self.content_root,
            out_dir: self.out_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if let Some(path) = &config.config_path {
            output.info(&format!("Using {}", path.display()));
        }

        let site = Site::load(&config)?;
        let out_dir = &config.build_resolved.out_dir;
        let report = site.build(out_dir)?;

        for warning in &report.warnings {
            output.warning(&format!("Warning: {warning}"));
        }
        output.success(&format!(
            "Built {} page{} into {}",
            report.pages,
            if report.pages == 1 { "" } else { "s" },
            out_dir.display()
        ));
        Ok(())
    }
}
