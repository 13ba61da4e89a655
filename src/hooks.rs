//! Package lifecycle hooks.
//!
//! The package manager calls one entry point here per lifecycle event:
//!
//! - [`post_package_install`] and [`post_package_update`] run the same
//!   deploy pass: place dist files into the project tree, classify and
//!   record component files, apply configuration pushes, and register
//!   discovered extension points.
//! - [`pre_package_uninstall`] removes the package's extension-point
//!   registrations while the package files are still on disk.
//! - [`pre_install`] scaffolds the directories a fresh project needs before
//!   the first package lands.
//!
//! Uninstall is deliberately asymmetric: registry entries are removed, but
//! deployed files and the component manifest stay behind. Cleaning those up
//! belongs to the project owner, since deployed assets may have been edited
//! in place after installation.
//!
//! Each pass is synchronous and ordered. Dist sections deploy in a fixed
//! order (base, public, source, scripts, data, components), configuration
//! updates follow, and registry scans run last.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::component::Classifier;
use crate::config::ProjectConfig;
use crate::console::Console;
use crate::deploy::{ConflictGuard, Outcome, PlacementAction};
use crate::package::{PackageManifest, package_root};
use crate::pattern::{PlacementRule, sanitize_path};
use crate::registry::{ExtensionKind, ExtensionRegistry};
use crate::utils::ensure_dir;

/// Runs the deploy pass after the package manager installs a package.
///
/// # Errors
///
/// Returns an error when the package manifest cannot be loaded, a placement
/// or classification step fails, or a registry cannot be updated. Files
/// placed before the failure remain in place.
pub fn post_package_install(
    config: &ProjectConfig,
    console: &mut dyn Console,
    package_name: &str,
) -> Result<()> {
    run_deploy_pass(config, console, package_name, "install")
}

/// Runs the deploy pass after the package manager updates a package.
///
/// Identical to [`post_package_install`]; a fresh deploy over the previous
/// one is how updates propagate.
///
/// # Errors
///
/// Same conditions as [`post_package_install`].
pub fn post_package_update(
    config: &ProjectConfig,
    console: &mut dyn Console,
    package_name: &str,
) -> Result<()> {
    run_deploy_pass(config, console, package_name, "update")
}

/// Removes a package's extension-point registrations before the package
/// manager deletes its files.
///
/// Only the registries change. Deployed files and the package's component
/// manifest are left on disk.
///
/// # Errors
///
/// Returns an error when the package manifest cannot be loaded or a
/// registry cannot be read or written.
pub fn pre_package_uninstall(config: &ProjectConfig, package_name: &str) -> Result<()> {
    let packages_dir = config.packages_dir();
    let manifest = PackageManifest::load(&packages_dir, package_name)?;
    let root = package_root(&packages_dir, package_name);

    info!(package = package_name, "removing extension registrations");

    let mut listeners = ExtensionRegistry::open(&packages_dir, ExtensionKind::Listener)?;
    listeners.sync_package(&root, true)?;

    if manifest.is_pattern_engine() {
        let mut engines = ExtensionRegistry::open(&packages_dir, ExtensionKind::PatternEngine)?;
        engines.sync_package(&root, true)?;
    }

    Ok(())
}

/// Scaffolds the directories every project needs before packages install.
///
/// Idempotent: existing directories are left alone.
///
/// # Errors
///
/// Returns an error when a directory cannot be created.
pub fn pre_install(config: &ProjectConfig) -> Result<()> {
    ensure_dir(&config.source_dir())?;
    ensure_dir(&config.packages_dir())?;
    Ok(())
}

fn run_deploy_pass(
    config: &ProjectConfig,
    console: &mut dyn Console,
    package_name: &str,
    event: &str,
) -> Result<()> {
    let packages_dir = config.packages_dir();
    let manifest = PackageManifest::load(&packages_dir, package_name)?;

    if !manifest.is_lattice_package() {
        debug!(
            package = package_name,
            kind = %manifest.kind,
            "not a lattice package, nothing to deploy"
        );
        return Ok(());
    }

    info!(package = package_name, event, "running deploy pass");

    let root = package_root(&packages_dir, package_name);
    let dist_root = root.join("dist");
    let mut guard = ConflictGuard::new(config.base_dir(), console);

    if let Some(lattice) = &manifest.lattice {
        let file_sections: [(&str, &[PlacementRule], PathBuf); 5] = [
            ("base-dir", &lattice.dist.base_dir, config.base_dir().to_path_buf()),
            ("public-dir", &lattice.dist.public_dir, config.public_dir()),
            ("source-dir", &lattice.dist.source_dir, config.source_dir()),
            ("scripts-dir", &lattice.dist.scripts_dir, config.scripts_dir()),
            ("data-dir", &lattice.dist.data_dir, config.data_dir()),
        ];

        for (section, rules, dest_base) in file_sections {
            if rules.is_empty() {
                continue;
            }
            debug!(
                package = package_name,
                section,
                rules = rules.len(),
                "deploying dist section"
            );
            deploy_rules(rules, &dist_root, &dest_base, &manifest.name, &mut guard)?;
        }

        if let Some(component_rules) = &lattice.dist.component_dir {
            let classifier = Classifier::new(&lattice.template_extension);
            let component_manifest = classifier.classify(
                &manifest.name,
                &dist_root,
                component_rules,
                &lattice.onready,
                &lattice.callback,
            )?;
            component_manifest.write(&config.component_dir())?;

            let dest_base = config.component_dir().join(sanitize_path(&manifest.name));
            deploy_rules(
                component_rules,
                &dist_root,
                &dest_base,
                &manifest.name,
                &mut guard,
            )?;
        }

        for update in &lattice.config {
            config.update_option(&update.option, &update.value)?;
        }
    }

    let mut listeners = ExtensionRegistry::open(&packages_dir, ExtensionKind::Listener)?;
    listeners.sync_package(&root, false)?;

    if manifest.is_pattern_engine() {
        let mut engines = ExtensionRegistry::open(&packages_dir, ExtensionKind::PatternEngine)?;
        engines.sync_package(&root, false)?;
    }

    Ok(())
}

fn deploy_rules(
    rules: &[PlacementRule],
    source_base: &Path,
    dest_base: &Path,
    package: &str,
    guard: &mut ConflictGuard,
) -> Result<()> {
    for rule in rules {
        let action = PlacementAction::resolve(rule);
        let outcome = action.apply(source_base, dest_base, package, guard)?;
        if outcome == Outcome::Skipped {
            debug!(package, rule = %rule, "placement preserved existing content");
        }
    }
    Ok(())
}
