//! Lattice deploy engine entry point.
//!
//! This is the executable the package manager's lifecycle hooks invoke.
//! It handles command-line argument parsing, error display, and command
//! execution.
//!
//! Commands:
//! - `install` - deploy a package's assets after installation
//! - `update` - re-deploy a package's assets after an update
//! - `uninstall` - unregister extension points before removal
//! - `prepare` - scaffold the project directories

use anyhow::Result;
use clap::Parser;
use lattice_deploy::cli;
use lattice_deploy::core::error::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
