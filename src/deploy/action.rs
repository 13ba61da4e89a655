//! Placement actions derived from dist rules.
//!
//! Every `{source, destination}` rule collapses into exactly one action once
//! both sides are classified. The four shapes cover the whole rule language:
//!
//! - `* -> *` mirrors the entire payload onto the destination base
//! - `* -> dir` mirrors the entire payload into one subdirectory
//! - `dir/* -> ...` mirrors one payload subtree to the destination
//! - `file -> file` copies a single file
//!
//! Actions are resolved before any filesystem work starts, so a package with
//! a malformed rule fails before it has deployed anything.

use anyhow::Result;
use std::path::Path;

use crate::deploy::ConflictGuard;
use crate::pattern::{PathPattern, PlacementRule};
use crate::utils::fs::copy_file_overwrite;
use crate::utils::{copy_dir, ensure_parent_dir};

/// Result of applying a single placement action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Content was written to the destination.
    Placed,
    /// The destination was preserved and nothing was written.
    Skipped,
}

/// A fully resolved deployment step for one dist rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementAction {
    /// Mirror the whole payload directory onto the destination base.
    MirrorAll,
    /// Mirror the whole payload directory into `dest` under the base.
    MirrorInto { dest: String },
    /// Mirror the payload subtree `source` to `dest` under the base.
    /// An empty `dest` targets the destination base itself.
    MirrorSubtree { source: String, dest: String },
    /// Copy one payload file to one destination path.
    CopyFile { source: String, dest: String },
}

impl PlacementAction {
    /// Maps a validated rule to its action.
    #[must_use]
    pub fn resolve(rule: &PlacementRule) -> Self {
        match (rule.source(), rule.destination()) {
            (PathPattern::WholeTree, PathPattern::WholeTree) => Self::MirrorAll,
            (PathPattern::WholeTree, PathPattern::Exact(dest))
            | (PathPattern::WholeTree, PathPattern::PrefixGlob(dest)) => Self::MirrorInto {
                dest: dest.clone(),
            },
            (PathPattern::PrefixGlob(source), PathPattern::WholeTree) => Self::MirrorSubtree {
                source: source.clone(),
                dest: String::new(),
            },
            (PathPattern::PrefixGlob(source), PathPattern::Exact(dest))
            | (PathPattern::PrefixGlob(source), PathPattern::PrefixGlob(dest)) => {
                Self::MirrorSubtree {
                    source: source.clone(),
                    dest: dest.clone(),
                }
            }
            (PathPattern::Exact(source), PathPattern::Exact(dest)) => Self::CopyFile {
                source: source.clone(),
                dest: dest.clone(),
            },
            (PathPattern::Exact(_), _) => {
                unreachable!("literal source with wildcard destination is rejected at parse time")
            }
        }
    }

    /// Performs the action, consulting the guard before touching anything
    /// that already exists.
    ///
    /// Mirrors merge into the destination: files the payload provides are
    /// overwritten, everything else is left alone. A [`Outcome::Skipped`]
    /// result means the destination holds none of the payload's content.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload source is missing or any filesystem
    /// operation fails.
    pub fn apply(
        &self,
        source_base: &Path,
        dest_base: &Path,
        package: &str,
        guard: &mut ConflictGuard,
    ) -> Result<Outcome> {
        match self {
            Self::MirrorAll => {
                if guard.should_skip(package, dest_base)? {
                    return Ok(Outcome::Skipped);
                }
                copy_dir(source_base, dest_base)?;
            }
            Self::MirrorInto { dest } => {
                let target = dest_base.join(dest);
                if guard.should_skip(package, &target)? {
                    return Ok(Outcome::Skipped);
                }
                copy_dir(source_base, &target)?;
            }
            Self::MirrorSubtree { source, dest } => {
                let subtree = source_base.join(source);
                let target = if dest.is_empty() {
                    dest_base.to_path_buf()
                } else {
                    dest_base.join(dest)
                };
                if guard.should_skip(package, &target)? {
                    return Ok(Outcome::Skipped);
                }
                copy_dir(&subtree, &target)?;
            }
            Self::CopyFile { source, dest } => {
                let target = dest_base.join(dest);
                ensure_parent_dir(&target)?;
                if guard.should_skip(package, &target)? {
                    return Ok(Outcome::Skipped);
                }
                copy_file_overwrite(&source_base.join(source), &target)?;
            }
        }
        Ok(Outcome::Placed)
    }
}
