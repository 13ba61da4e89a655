//! Unregister a package's extension points before it is removed.
//!
//! The package manager's pre-uninstall hook runs this while the package
//! files are still on disk, so the sentinel scan can still find what was
//! registered. Only the extension registries change. Deployed assets and
//! the package's component manifest are left in place, since they may have
//! been edited after installation.
//!
//! ```bash
//! lattice-deploy uninstall acme/widgets
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::config::ProjectConfig;
use crate::hooks;

/// Command to remove a package's registry entries.
///
/// Takes no overwrite flags; nothing is deployed or deleted from the
/// project tree.
#[derive(Args)]
pub struct UninstallCommand {
    /// Name of the package being removed, as the package manager knows it
    package: String,
}

impl UninstallCommand {
    /// Executes the uninstall command with an optional project file path.
    ///
    /// # Errors
    ///
    /// Returns an error when the project file cannot be found, the package
    /// manifest is missing or malformed, or a registry cannot be read or
    /// written.
    pub fn execute_with_project_path(self, project_path: Option<PathBuf>) -> Result<()> {
        let config = ProjectConfig::discover_with_optional(project_path).context(
            "No lattice.toml found in the current directory or any parent directory.\n\n\
             Run this command from inside a Lattice project, or pass --config with\n\
             the path to the project file.",
        )?;

        hooks::pre_package_uninstall(&config, &self.package)?;

        println!(
            "{} unregistered extension points for {}",
            "✓".green(),
            self.package.cyan()
        );
        println!("  deployed files and the component manifest were left in place");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_uninstall_command_clears_registrations() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("lattice.toml"), "").unwrap();

        let root = temp.path().join("packages/acme/widgets");
        fs::create_dir_all(&root).unwrap();
        fs::write(
            root.join("package.toml"),
            "name = \"acme/widgets\"\nkind = \"lattice-plugin\"\n",
        )
        .unwrap();
        fs::write(root.join("listener.wasm"), b"\0asm").unwrap();
        fs::write(
            temp.path().join("packages/listeners.json"),
            r#"{ "listeners": ["acme::widgets::listener"] }"#,
        )
        .unwrap();

        let cmd = UninstallCommand {
            package: "acme/widgets".to_string(),
        };
        cmd.execute_with_project_path(Some(temp.path().join("lattice.toml"))).unwrap();

        let listeners: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(temp.path().join("packages/listeners.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(listeners["listeners"], serde_json::json!([]));
    }
}
