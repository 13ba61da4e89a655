//! Package manifest parsing.
//!
//! The package manager installs every package under the project's packages
//! directory and writes a `package.toml` alongside its files. This engine
//! reads the small slice of that manifest it cares about: the package name
//! and kind, and the optional `[lattice]` block declaring dist rules,
//! template metadata, and configuration pushes:
//!
//! ```toml
//! name = "acme/widgets"
//! kind = "lattice-plugin"
//!
//! [lattice]
//! template-extension = "mustache"
//! onready = "Widgets.boot()"
//!
//! [lattice.dist]
//! component-dir = [ { source = "*", destination = "*" } ]
//!
//! [[lattice.config]]
//! option = "plugins.widgets.enable"
//! value  = "true"
//! ```
//!
//! Packages whose kind does not start with `lattice-` are not Lattice
//! packages and are skipped by every lifecycle pass. A lattice package
//! without a `[lattice]` block has no dist or config work but still takes
//! part in extension-point scanning.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::DeployError;
use crate::pattern::{PlacementRule, sanitize_path};
use crate::utils::fs::read_text_file;

/// Kind prefix shared by every package this engine deploys.
pub const LATTICE_KIND_PREFIX: &str = "lattice-";

/// Kind identifying a pattern-engine package.
pub const PATTERN_ENGINE_KIND: &str = "lattice-patternengine";

/// Name of the per-package manifest file.
pub const PACKAGE_FILE: &str = "package.toml";

/// The slice of `package.toml` the deploy engine reads.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    pub kind: String,
    pub lattice: Option<LatticeMetadata>,
}

/// The `[lattice]` block of a package manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct LatticeMetadata {
    /// Extension classified as a template, without the leading dot.
    #[serde(default = "default_template_extension", rename = "template-extension")]
    pub template_extension: String,
    /// Script snippet the component library runs when the package loads.
    #[serde(default)]
    pub onready: String,
    /// Script snippet the component library runs after rendering.
    #[serde(default)]
    pub callback: String,
    /// Placement rules per destination base.
    #[serde(default)]
    pub dist: DistRules,
    /// Project configuration updates to apply on install and update.
    #[serde(default)]
    pub config: Vec<ConfigUpdate>,
}

impl Default for LatticeMetadata {
    fn default() -> Self {
        Self {
            template_extension: default_template_extension(),
            onready: String::new(),
            callback: String::new(),
            dist: DistRules::default(),
            config: Vec::new(),
        }
    }
}

fn default_template_extension() -> String {
    "mustache".to_string()
}

/// Placement rules grouped by the destination base they deploy into.
///
/// Rules are validated while the manifest is parsed, so a malformed rule
/// fails the whole load before anything touches the project tree.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DistRules {
    #[serde(default, rename = "base-dir")]
    pub base_dir: Vec<PlacementRule>,
    #[serde(default, rename = "public-dir")]
    pub public_dir: Vec<PlacementRule>,
    #[serde(default, rename = "source-dir")]
    pub source_dir: Vec<PlacementRule>,
    #[serde(default, rename = "scripts-dir")]
    pub scripts_dir: Vec<PlacementRule>,
    #[serde(default, rename = "data-dir")]
    pub data_dir: Vec<PlacementRule>,
    /// Declaring this section at all, even empty, makes the package a
    /// component package and triggers manifest emission.
    #[serde(default, rename = "component-dir")]
    pub component_dir: Option<Vec<PlacementRule>>,
}

impl DistRules {
    /// Returns `true` when no section declares any deployment work.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base_dir.is_empty()
            && self.public_dir.is_empty()
            && self.source_dir.is_empty()
            && self.scripts_dir.is_empty()
            && self.data_dir.is_empty()
            && self.component_dir.is_none()
    }
}

/// One `option = value` configuration push from a package.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigUpdate {
    pub option: String,
    pub value: String,
}

impl PackageManifest {
    /// Loads the manifest for `name` from under the packages directory.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::PackageNotFound`] when the package has no
    /// manifest on disk, and [`DeployError::PackageManifestParseError`]
    /// when the manifest is not valid TOML or declares an invalid placement
    /// rule.
    pub fn load(packages_dir: &Path, name: &str) -> anyhow::Result<Self> {
        let manifest_path = package_root(packages_dir, name).join(PACKAGE_FILE);

        if !manifest_path.is_file() {
            return Err(DeployError::PackageNotFound {
                name: name.to_string(),
                path: manifest_path.display().to_string(),
            }
            .into());
        }

        let content = read_text_file(&manifest_path)?;
        let manifest: Self =
            toml::from_str(&content).map_err(|e| DeployError::PackageManifestParseError {
                file: manifest_path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(manifest)
    }

    /// Whether this package belongs to the Lattice framework at all.
    #[must_use]
    pub fn is_lattice_package(&self) -> bool {
        self.kind.starts_with(LATTICE_KIND_PREFIX)
    }

    /// Whether this package contributes a pattern engine.
    #[must_use]
    pub fn is_pattern_engine(&self) -> bool {
        self.kind == PATTERN_ENGINE_KIND
    }
}

/// Directory a named package lives in. The name is sanitized before being
/// joined, so a hostile name cannot address paths outside the packages
/// directory.
#[must_use]
pub fn package_root(packages_dir: &Path, name: &str) -> PathBuf {
    packages_dir.join(sanitize_path(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn install_manifest(packages_dir: &Path, name: &str, content: &str) {
        let root = packages_dir.join(name);
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join(PACKAGE_FILE), content).unwrap();
    }

    #[test]
    fn test_load_full_manifest() {
        let temp = TempDir::new().unwrap();
        install_manifest(
            temp.path(),
            "acme/widgets",
            r#"
name = "acme/widgets"
kind = "lattice-plugin"

[lattice]
template-extension = "twig"
onready = "Widgets.boot()"
callback = "Widgets.done()"

[lattice.dist]
public-dir = [
    { source = "assets/*", destination = "*" },
    { source = "js/app.js", destination = "js/widgets.js" },
]
component-dir = [ { source = "*", destination = "*" } ]

[[lattice.config]]
option = "plugins.widgets.enable"
value = "true"
"#,
        );

        let manifest = PackageManifest::load(temp.path(), "acme/widgets").unwrap();

        assert_eq!(manifest.name, "acme/widgets");
        assert!(manifest.is_lattice_package());
        assert!(!manifest.is_pattern_engine());

        let lattice = manifest.lattice.unwrap();
        assert_eq!(lattice.template_extension, "twig");
        assert_eq!(lattice.onready, "Widgets.boot()");
        assert_eq!(lattice.dist.public_dir.len(), 2);
        assert_eq!(lattice.dist.component_dir.as_ref().unwrap().len(), 1);
        assert!(lattice.dist.base_dir.is_empty());
        assert_eq!(lattice.config.len(), 1);
        assert_eq!(lattice.config[0].option, "plugins.widgets.enable");
    }

    #[test]
    fn test_load_manifest_without_lattice_block() {
        let temp = TempDir::new().unwrap();
        install_manifest(
            temp.path(),
            "acme/ordinary",
            "name = \"acme/ordinary\"\nkind = \"library\"\n",
        );

        let manifest = PackageManifest::load(temp.path(), "acme/ordinary").unwrap();

        assert!(manifest.lattice.is_none());
        assert!(!manifest.is_lattice_package());
    }

    #[test]
    fn test_lattice_block_defaults() {
        let temp = TempDir::new().unwrap();
        install_manifest(
            temp.path(),
            "acme/minimal",
            "name = \"acme/minimal\"\nkind = \"lattice-plugin\"\n\n[lattice]\n",
        );

        let manifest = PackageManifest::load(temp.path(), "acme/minimal").unwrap();

        let lattice = manifest.lattice.unwrap();
        assert_eq!(lattice.template_extension, "mustache");
        assert_eq!(lattice.onready, "");
        assert_eq!(lattice.callback, "");
        assert!(lattice.dist.is_empty());
        assert!(lattice.config.is_empty());
    }

    #[test]
    fn test_declared_empty_component_dir_still_counts_as_work() {
        let temp = TempDir::new().unwrap();
        install_manifest(
            temp.path(),
            "acme/bare",
            "name = \"acme/bare\"\nkind = \"lattice-plugin\"\n\n[lattice.dist]\ncomponent-dir = []\n",
        );

        let manifest = PackageManifest::load(temp.path(), "acme/bare").unwrap();

        let lattice = manifest.lattice.unwrap();
        assert_eq!(lattice.dist.component_dir, Some(vec![]));
        assert!(!lattice.dist.is_empty());
    }

    #[test]
    fn test_load_missing_package_fails() {
        let temp = TempDir::new().unwrap();

        let error = PackageManifest::load(temp.path(), "acme/ghost").unwrap_err();

        assert!(error.downcast_ref::<DeployError>().is_some_and(|e| matches!(
            e,
            DeployError::PackageNotFound { .. }
        )));
    }

    #[test]
    fn test_invalid_placement_rule_fails_load() {
        let temp = TempDir::new().unwrap();
        install_manifest(
            temp.path(),
            "acme/broken",
            r#"
name = "acme/broken"
kind = "lattice-plugin"

[lattice.dist]
public-dir = [ { source = "css/main.css", destination = "assets/*" } ]
"#,
        );

        let error = PackageManifest::load(temp.path(), "acme/broken").unwrap_err();

        match error.downcast_ref::<DeployError>() {
            Some(DeployError::PackageManifestParseError { reason, .. }) => {
                assert!(reason.contains("Invalid placement rule"));
            }
            other => panic!("Expected PackageManifestParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_pattern_engine_kind() {
        let temp = TempDir::new().unwrap();
        install_manifest(
            temp.path(),
            "acme/twig-engine",
            "name = \"acme/twig-engine\"\nkind = \"lattice-patternengine\"\n",
        );

        let manifest = PackageManifest::load(temp.path(), "acme/twig-engine").unwrap();

        assert!(manifest.is_lattice_package());
        assert!(manifest.is_pattern_engine());
    }

    #[test]
    fn test_package_root_sanitizes_name() {
        let packages_dir = Path::new("/proj/packages");

        assert_eq!(
            package_root(packages_dir, "../../etc/passwd"),
            packages_dir.join("etc/passwd")
        );
        assert_eq!(
            package_root(packages_dir, "acme/widgets"),
            packages_dir.join("acme/widgets")
        );
    }
}
