//! Re-deploy a package's assets after the package manager updates it.
//!
//! The `update` command runs the same deploy pass as `install`. Deploying
//! the new dist files over the previous ones is how an updated package's
//! assets, component records, and registrations propagate into the project.
//!
//! ```bash
//! lattice-deploy update acme/widgets --force
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::config::ProjectConfig;
use crate::console::{AutoConsole, Console, TermConsole};
use crate::hooks;

/// Command to re-deploy an updated package's assets.
#[derive(Args)]
pub struct UpdateCommand {
    /// Name of the updated package, as the package manager knows it
    package: String,

    /// Overwrite existing destination paths without prompting
    #[arg(short, long, conflicts_with = "preserve")]
    force: bool,

    /// Keep existing destination paths without prompting
    #[arg(long)]
    preserve: bool,
}

impl UpdateCommand {
    /// Executes the update command with an optional project file path.
    ///
    /// # Errors
    ///
    /// Same conditions as the install command; see
    /// [`InstallCommand::execute_with_project_path`].
    ///
    /// [`InstallCommand::execute_with_project_path`]: super::install::InstallCommand::execute_with_project_path
    pub fn execute_with_project_path(self, project_path: Option<PathBuf>) -> Result<()> {
        let config = ProjectConfig::discover_with_optional(project_path).context(
            "No lattice.toml found in the current directory or any parent directory.\n\n\
             Run this command from inside a Lattice project, or pass --config with\n\
             the path to the project file.",
        )?;

        let mut console = self.console();
        hooks::post_package_update(&config, console.as_mut(), &self.package)?;

        println!("{} refreshed assets for {}", "✓".green(), self.package.cyan());
        Ok(())
    }

    fn console(&self) -> Box<dyn Console> {
        if self.force {
            Box::new(AutoConsole::new(true))
        } else if self.preserve {
            Box::new(AutoConsole::new(false))
        } else {
            Box::new(TermConsole::new())
        }
    }
}
