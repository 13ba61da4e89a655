//! Command-line interface for the Lattice deploy engine.
//!
//! The CLI fronts the package-manager lifecycle hooks in [`crate::hooks`].
//! A package manager wires `lattice-deploy install <package>` into its
//! post-install script (likewise for the other events), and the same
//! commands can be run by hand to replay a deployment or to inspect what a
//! package would change.
//!
//! # Commands
//!
//! - [`Install`](Commands::Install): deploy a package's assets after installation
//! - [`Update`](Commands::Update): re-deploy after a package update
//! - [`Uninstall`](Commands::Uninstall): unregister extension points before removal
//! - [`Prepare`](Commands::Prepare): scaffold the project directories
//!
//! # Global Options
//!
//! All subcommands inherit:
//! - `--verbose` / `--quiet` to control diagnostic logging
//! - `--config` to point at a project file outside the working directory
//!
//! # Examples
//!
//! ```bash
//! lattice-deploy install acme/widgets
//! lattice-deploy update acme/widgets --force
//! lattice-deploy uninstall acme/widgets
//! lattice-deploy --config ../site/lattice.toml prepare
//! ```

mod install;
mod prepare;
mod uninstall;
mod update;

mod tests;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runtime configuration derived from the global CLI flags.
///
/// Built once by [`Cli::build_config`] before command dispatch. Keeping the
/// flag interpretation separate from parsing lets tests assert the mapping
/// without installing a real subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Filter directive for the tracing subscriber.
    ///
    /// `Some("debug")` under `--verbose`. When `None`, the `RUST_LOG`
    /// environment variable decides, subject to [`env_fallback`].
    ///
    /// [`env_fallback`]: CliConfig::env_fallback
    pub log_level: Option<String>,

    /// Whether an unset [`log_level`] falls back to `RUST_LOG`.
    ///
    /// `--quiet` clears this, leaving logging off no matter what the
    /// environment says. Status output on stdout is unaffected.
    ///
    /// [`log_level`]: CliConfig::log_level
    pub env_fallback: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            env_fallback: true,
        }
    }
}

impl CliConfig {
    /// Creates a configuration with no log level override.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the global tracing subscriber for this configuration.
    ///
    /// Called once at the start of execution. Does nothing when logging is
    /// off or a subscriber is already installed. Diagnostics go to stderr;
    /// stdout is reserved for status output and prompts.
    pub fn init_logging(&self) {
        let filter = if let Some(ref level) = self.log_level {
            EnvFilter::new(level)
        } else if self.env_fallback && std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Top-level command-line interface.
///
/// Global flags are available to every subcommand; the subcommands
/// themselves are defined in [`Commands`].
#[derive(Parser)]
#[command(
    name = "lattice-deploy",
    about = "Deploy Lattice package assets and maintain the extension registries",
    version,
    author,
    long_about = "lattice-deploy runs the Lattice framework's package lifecycle hooks: it \
deploys a package's dist assets into the project tree, records component files for the \
site builder, and keeps the extension-point registries in sync as packages come and go."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging.
    ///
    /// Equivalent to `RUST_LOG=debug`. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress diagnostic logging entirely.
    ///
    /// Ignores `RUST_LOG`. Status output and prompts still appear.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the project file (lattice.toml).
    ///
    /// By default the project file is searched for in the current directory
    /// and its parents. This option pins an exact path instead, which is
    /// what package-manager hook scripts running outside the project
    /// directory use.
    #[arg(short, long, global = true, env = "LATTICE_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Available subcommands.
///
/// One variant per package lifecycle event, plus [`Prepare`](Commands::Prepare)
/// for first-time project setup.
#[derive(Subcommand)]
enum Commands {
    /// Deploy a package's assets after the package manager installs it.
    ///
    /// Reads the package's `package.toml`, places dist files into the
    /// project tree, records component files for the site builder, applies
    /// configuration pushes, and registers discovered extension points.
    ///
    /// See [`install::InstallCommand`] for detailed options and behavior.
    Install(install::InstallCommand),

    /// Re-deploy a package's assets after the package manager updates it.
    ///
    /// Runs the same pass as `install`; deploying the new files over the
    /// previous ones is how updates propagate.
    ///
    /// See [`update::UpdateCommand`] for detailed options and behavior.
    Update(update::UpdateCommand),

    /// Unregister a package's extension points before it is removed.
    ///
    /// Removes the package's entries from the extension registries while
    /// its files are still on disk. Deployed assets and the component
    /// manifest stay behind.
    ///
    /// See [`uninstall::UninstallCommand`] for detailed options and behavior.
    Uninstall(uninstall::UninstallCommand),

    /// Scaffold the directories a fresh project needs.
    ///
    /// Creates the source and packages directories if they are missing.
    /// Safe to run repeatedly.
    ///
    /// See [`prepare::PrepareCommand`] for detailed options and behavior.
    Prepare(prepare::PrepareCommand),
}

impl Cli {
    /// Executes the parsed command.
    ///
    /// Builds the runtime configuration from the global flags, installs the
    /// tracing subscriber, and dispatches to the subcommand.
    ///
    /// # Errors
    ///
    /// Propagates whatever the subcommand returns; see the individual
    /// command modules for their failure conditions.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    /// Builds a [`CliConfig`] from the parsed global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            env_fallback: !self.quiet,
        }
    }

    /// Executes the CLI with an explicit configuration.
    ///
    /// Split from [`execute`](Self::execute) so tests can inject a
    /// configuration instead of deriving one from flags.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Install(cmd) => cmd.execute_with_project_path(self.config),
            Commands::Update(cmd) => cmd.execute_with_project_path(self.config),
            Commands::Uninstall(cmd) => cmd.execute_with_project_path(self.config),
            Commands::Prepare(cmd) => cmd.execute_with_project_path(self.config),
        }
    }
}
