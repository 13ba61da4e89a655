//! Component classification and manifest emission.
//!
//! Packages that ship reusable component files declare them through the same
//! dist rules used for deployment. The classifier walks those rules, buckets
//! every matched file by extension, and writes a per-package manifest the
//! framework reads at build time to wire stylesheets, scripts, and templates
//! into the component library.
//!
//! Classification is extension based: `css` files become stylesheets, `js`
//! files become javascripts, and files matching the package's template
//! extension become templates. Everything else is ignored.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::pattern::{PathPattern, PlacementRule};
use crate::utils::ensure_dir;
use crate::utils::fs::write_json_file;

/// Buckets component files by extension according to a package's dist rules.
pub struct Classifier<'a> {
    template_extension: &'a str,
}

impl<'a> Classifier<'a> {
    /// Creates a classifier for the given template extension.
    #[must_use]
    pub const fn new(template_extension: &'a str) -> Self {
        Self { template_extension }
    }

    /// Builds the component manifest for one package payload.
    ///
    /// Wildcard rules enumerate every file under the matched payload subtree
    /// and re-root each file's relative path under the rule's destination
    /// prefix. Literal rules contribute their destination path directly, with
    /// the extension read from the source side. Files within a subtree are
    /// visited in name order so repeated runs produce identical manifests.
    ///
    /// # Errors
    ///
    /// Returns an error when a wildcard rule names a payload subtree that
    /// does not exist or cannot be read.
    pub fn classify(
        &self,
        package: &str,
        source_base: &Path,
        rules: &[PlacementRule],
        onready: &str,
        callback: &str,
    ) -> Result<ComponentManifest> {
        let mut stylesheets = Vec::new();
        let mut javascripts = Vec::new();
        let mut template_paths = Vec::new();

        for rule in rules {
            match rule.source() {
                PathPattern::WholeTree | PathPattern::PrefixGlob(_) => {
                    let source_prefix = match rule.source() {
                        PathPattern::PrefixGlob(prefix) => prefix.as_str(),
                        _ => "",
                    };
                    let dest_prefix = match rule.destination() {
                        PathPattern::WholeTree => "",
                        PathPattern::PrefixGlob(prefix) | PathPattern::Exact(prefix) => {
                            prefix.as_str()
                        }
                    };

                    let subtree = if source_prefix.is_empty() {
                        source_base.to_path_buf()
                    } else {
                        source_base.join(source_prefix)
                    };

                    for relative in list_files(&subtree)? {
                        let entry = rebase(&relative, dest_prefix);
                        match extension(&relative) {
                            Some("css") => stylesheets.push(entry),
                            Some("js") => javascripts.push(entry),
                            Some(ext) if ext == self.template_extension => {
                                template_paths.push(entry);
                            }
                            _ => {}
                        }
                    }
                }
                PathPattern::Exact(source) => {
                    let destination = match rule.destination() {
                        PathPattern::Exact(dest) => dest.clone(),
                        _ => unreachable!(
                            "literal source with wildcard destination is rejected at parse time"
                        ),
                    };
                    match extension(Path::new(source)) {
                        Some("css") => stylesheets.push(destination),
                        Some("js") => javascripts.push(destination),
                        Some(ext) if ext == self.template_extension => {
                            template_paths.push(destination);
                        }
                        _ => {}
                    }
                }
            }
        }

        let mut templates = BTreeMap::new();
        for path in template_paths {
            templates.insert(template_key(&path, self.template_extension), path);
        }

        debug!(
            package,
            stylesheets = stylesheets.len(),
            javascripts = javascripts.len(),
            templates = templates.len(),
            "classified component payload"
        );

        Ok(ComponentManifest {
            name: package.to_string(),
            templates,
            stylesheets,
            javascripts,
            onready: onready.to_string(),
            callback: callback.to_string(),
        })
    }
}

/// Per-package component manifest persisted for the framework's build step.
///
/// Overwritten on every install or update of the same package. The framework
/// looks templates up by key, so keys are normalized identifiers rather than
/// paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentManifest {
    pub name: String,
    pub templates: BTreeMap<String, String>,
    pub stylesheets: Vec<String>,
    pub javascripts: Vec<String>,
    pub onready: String,
    pub callback: String,
}

impl ComponentManifest {
    /// Writes the manifest under `<component_dir>/packages/`, creating both
    /// directories when absent. Slashes in the package name become dashes in
    /// the file name, so `acme/widgets` lands at `packages/acme-widgets.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the packages directory cannot be created or the
    /// manifest cannot be written.
    pub fn write(&self, component_dir: &Path) -> Result<PathBuf> {
        let packages_dir = component_dir.join("packages");
        ensure_dir(&packages_dir)?;

        let path = packages_dir.join(format!("{}.json", self.name.replace('/', "-")));
        write_json_file(&path, self, true)?;
        debug!(manifest = %path.display(), "wrote component manifest");

        Ok(path)
    }
}

/// Lists every file under `root` recursively, as paths relative to `root`,
/// in name order.
fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry
            .with_context(|| format!("Failed to walk component payload: {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("Failed to relativize path: {}", entry.path().display()))?;
        files.push(relative.to_path_buf());
    }
    Ok(files)
}

/// Joins a relative file path under a destination prefix using forward
/// slashes, the form manifests always use.
fn rebase(relative: &Path, dest_prefix: &str) -> String {
    let parts: Vec<String> = relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy().into_owned())
        .collect();
    let joined = parts.join("/");
    if dest_prefix.is_empty() {
        joined
    } else {
        format!("{dest_prefix}/{joined}")
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Derives a template's lookup key from its manifest path: every
/// `.{extension}` occurrence is removed and every character outside
/// `[A-Za-z0-9_]` becomes a dash.
fn template_key(path: &str, template_extension: &str) -> String {
    let stripped = path.replace(&format!(".{template_extension}"), "");
    stripped
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
