//! Extension-point registries for installed packages.
//!
//! Lattice discovers two kinds of extension points inside installed
//! packages: listeners, which react to build events, and pattern engines,
//! which add template-language support. Both ship as WASM components under a
//! fixed sentinel file name. This module records their fully qualified names
//! in per-kind JSON registry files the framework consults at startup, and
//! keeps those files consistent across install and uninstall cycles of
//! unrelated packages.
//!
//! A registry file is plain JSON with one array per kind:
//!
//! ```json
//! { "listeners": ["acme::widgets::listener"] }
//! ```
//!
//! The registry object owns the full read-modify-write cycle for one sync
//! call. A file that cannot be parsed is never rewritten; the failure is
//! surfaced so entries contributed by other packages are not lost.
//!
//! Registry files are shared project state without locking. One deploy
//! process per project tree is assumed, as package managers serialize hook
//! execution.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::core::DeployError;
use crate::utils::ensure_dir;
use crate::utils::fs::{read_text_file, write_json_file};

/// The kinds of extension points a package can contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionKind {
    /// Build-event listener, one `listener.wasm` per contribution.
    Listener,
    /// Pattern-engine rule, one `pattern_engine.wasm` per contribution.
    PatternEngine,
}

impl ExtensionKind {
    /// File name that marks a contribution of this kind inside a package.
    #[must_use]
    pub const fn sentinel(self) -> &'static str {
        match self {
            Self::Listener => "listener.wasm",
            Self::PatternEngine => "pattern_engine.wasm",
        }
    }

    /// Name of the registry file under the packages directory.
    #[must_use]
    pub const fn registry_file(self) -> &'static str {
        match self {
            Self::Listener => "listeners.json",
            Self::PatternEngine => "patternengines.json",
        }
    }

    /// Key holding this kind's entries inside the registry file.
    #[must_use]
    pub const fn json_key(self) -> &'static str {
        match self {
            Self::Listener => "listeners",
            Self::PatternEngine => "patternengines",
        }
    }

    /// How many directory names above the sentinel make up its namespace.
    #[must_use]
    pub const fn namespace_depth(self) -> usize {
        match self {
            Self::Listener => 2,
            Self::PatternEngine => 3,
        }
    }
}

/// One kind's registry, loaded from disk and synced back after mutation.
///
/// Keys other than the kind's own are carried through untouched, so a
/// registry file can hold annotations without this engine discarding them.
#[derive(Debug)]
pub struct ExtensionRegistry {
    path: PathBuf,
    kind: ExtensionKind,
    document: Map<String, Value>,
    entries: Vec<String>,
}

impl ExtensionRegistry {
    /// Opens the registry for `kind`, creating an empty one if the file does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::RegistryCorrupted`] when the file exists but
    /// is not a JSON object holding an array of strings under the kind's
    /// key. The file is left exactly as it was found.
    pub fn open(packages_dir: &Path, kind: ExtensionKind) -> Result<Self> {
        let path = packages_dir.join(kind.registry_file());

        if !path.exists() {
            ensure_dir(packages_dir)?;
            let empty = Value::Object(Map::from_iter([(
                kind.json_key().to_string(),
                Value::Array(vec![]),
            )]));
            write_json_file(&path, &empty, true)?;
            debug!(registry = %path.display(), "created empty registry");
        }

        let text = read_text_file(&path)?;
        let document: Value =
            serde_json::from_str(&text).map_err(|e| DeployError::RegistryCorrupted {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let Value::Object(document) = document else {
            return Err(DeployError::RegistryCorrupted {
                file: path.display().to_string(),
                reason: "expected a JSON object at the top level".to_string(),
            }
            .into());
        };

        let entries = match document.get(kind.json_key()) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(name) => Ok(name.clone()),
                    other => Err(DeployError::RegistryCorrupted {
                        file: path.display().to_string(),
                        reason: format!(
                            "expected string entries under \"{}\", found {}",
                            kind.json_key(),
                            other
                        ),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(DeployError::RegistryCorrupted {
                    file: path.display().to_string(),
                    reason: format!("expected an array under \"{}\"", kind.json_key()),
                }
                .into());
            }
            None => {
                return Err(DeployError::RegistryCorrupted {
                    file: path.display().to_string(),
                    reason: format!("missing \"{}\" key", kind.json_key()),
                }
                .into());
            }
        };

        Ok(Self {
            path,
            kind,
            document,
            entries,
        })
    }

    /// Registered names, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Scans a package tree for this kind's sentinel files and adds or
    /// removes their qualified names.
    ///
    /// Both directions are idempotent: adding a name twice keeps one entry,
    /// removing an absent name changes nothing. Entries belonging to other
    /// packages keep their positions. Changes are persisted before
    /// returning; a scan that changes nothing leaves the file untouched.
    ///
    /// Returns the names that were added or removed.
    ///
    /// # Errors
    ///
    /// Returns an error when the package tree cannot be walked or the
    /// registry file cannot be written.
    pub fn sync_package(&mut self, package_root: &Path, remove: bool) -> Result<Vec<String>> {
        let mut changed = Vec::new();

        for sentinel in self.find_sentinels(package_root)? {
            let name = self.qualified_name(&sentinel);

            if remove {
                if let Some(index) = self.entries.iter().position(|entry| *entry == name) {
                    self.entries.remove(index);
                    changed.push(name);
                }
            } else if !self.entries.contains(&name) {
                self.entries.push(name.clone());
                changed.push(name);
            }
        }

        if !changed.is_empty() {
            self.save()?;
            debug!(
                registry = %self.path.display(),
                changed = changed.len(),
                remove,
                "synced registry"
            );
        }

        Ok(changed)
    }

    /// Locates every sentinel file under the package root, in name order.
    fn find_sentinels(&self, package_root: &Path) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for entry in WalkDir::new(package_root)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| {
                format!("Failed to scan package: {}", package_root.display())
            })?;
            if entry.file_type().is_file() && entry.file_name() == self.kind.sentinel() {
                found.push(entry.path().to_path_buf());
            }
        }
        Ok(found)
    }

    /// Derives the fully qualified name for a sentinel file: the last
    /// `namespace_depth` directory names above it plus the file stem, joined
    /// with `::`.
    fn qualified_name(&self, sentinel: &Path) -> String {
        let mut parts: Vec<String> = sentinel
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .filter_map(|component| match component {
                        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let start = parts.len().saturating_sub(self.kind.namespace_depth());
        let mut name = parts.split_off(start);

        if let Some(stem) = sentinel.file_stem() {
            name.push(stem.to_string_lossy().into_owned());
        }

        name.join("::")
    }

    fn save(&self) -> Result<()> {
        let mut document = self.document.clone();
        document.insert(
            self.kind.json_key().to_string(),
            Value::Array(
                self.entries
                    .iter()
                    .map(|entry| Value::String(entry.clone()))
                    .collect(),
            ),
        );
        write_json_file(&self.path, &Value::Object(document), true)
    }
}
