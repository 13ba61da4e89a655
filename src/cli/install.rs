//! Deploy a package's assets after the package manager installs it.
//!
//! This module provides the `install` command, which the package manager's
//! post-install hook invokes once the package files are on disk under the
//! project's packages directory. The command runs the full deploy pass:
//! dist file placement, component classification, configuration pushes, and
//! extension-point registration.
//!
//! # Examples
//!
//! Deploy interactively, prompting before overwriting existing paths:
//! ```bash
//! lattice-deploy install acme/widgets
//! ```
//!
//! Overwrite without prompting (hook scripts, CI):
//! ```bash
//! lattice-deploy install acme/widgets --force
//! ```
//!
//! Keep whatever already exists without prompting:
//! ```bash
//! lattice-deploy install acme/widgets --preserve
//! ```
//!
//! # Error Conditions
//!
//! - No project file found in the current directory or any parent
//! - The package or its `package.toml` is missing or malformed
//! - A placement rule pairs a literal source with a wildcard destination
//! - An extension registry file exists but cannot be parsed

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::config::ProjectConfig;
use crate::console::{AutoConsole, Console, TermConsole};
use crate::hooks;

/// Command to deploy an installed package's assets into the project tree.
///
/// Without a flag the command prompts before overwriting any destination
/// path that already has content. `--force` and `--preserve` pre-answer
/// those prompts for non-interactive runs.
#[derive(Args)]
pub struct InstallCommand {
    /// Name of the installed package, as the package manager knows it
    package: String,

    /// Overwrite existing destination paths without prompting
    #[arg(short, long, conflicts_with = "preserve")]
    force: bool,

    /// Keep existing destination paths without prompting
    #[arg(long)]
    preserve: bool,
}

impl InstallCommand {
    /// Executes the install command with an optional project file path.
    ///
    /// When `project_path` is `None` the project file is discovered by
    /// walking up from the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the project file cannot be found or the deploy
    /// pass fails. Files placed before the failure remain in place.
    pub fn execute_with_project_path(self, project_path: Option<PathBuf>) -> Result<()> {
        let config = ProjectConfig::discover_with_optional(project_path).context(
            "No lattice.toml found in the current directory or any parent directory.\n\n\
             Run this command from inside a Lattice project, or pass --config with\n\
             the path to the project file.",
        )?;

        let mut console = self.console();
        hooks::post_package_install(&config, console.as_mut(), &self.package)?;

        println!("{} deployed assets for {}", "✓".green(), self.package.cyan());
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
