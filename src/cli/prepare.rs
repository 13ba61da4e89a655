//! Scaffold the directories a fresh project needs.
//!
//! Run once before the first package installs, typically from the package
//! manager's pre-install hook. Creates the source and packages directories
//! if they are missing and leaves existing ones alone.
//!
//! ```bash
//! lattice-deploy prepare
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::config::ProjectConfig;
use crate::hooks;

/// Command to create the project's working directories.
#[derive(Args)]
pub struct PrepareCommand {}

impl PrepareCommand {
    /// Executes the prepare command with an optional project file path.
    ///
    /// # Errors
    ///
    /// Returns an error when the project file cannot be found or a
    /// directory cannot be created.
    pub fn execute_with_project_path(self, project_path: Option<PathBuf>) -> Result<()> {
        let config = ProjectConfig::discover_with_optional(project_path).context(
            "No lattice.toml found in the current directory or any parent directory.\n\n\
             Run this command from inside a Lattice project, or pass --config with\n\
             the path to the project file.",
        )?;

        hooks::pre_install(&config)?;

        println!(
            "{} prepared project directories in {}",
            "✓".green(),
            config.base_dir().display()
        );
        Ok(())
    }
}
