//! Overwrite protection for deployment destinations.
//!
//! Before any mirror or copy lands, the destination is checked for existing
//! content the user might care about. Placeholder entries that exist only to
//! keep directories in version control don't count as content, so a starter
//! kit deploying into a freshly scaffolded project never prompts.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::console::{Console, NoticeKind};

/// Directory entries that don't count as existing content.
const IGNORED_ENTRIES: [&str; 3] = [".gitkeep", "README", ".DS_Store"];

/// Decides whether a deployment destination may be overwritten.
///
/// The guard owns the prompt wording and the skip/overwrite notices; the
/// actual yes/no decision comes from the [`Console`] seam. Paths shown to
/// the user are rewritten relative to the project root (`./public/css`
/// rather than an absolute path).
///
/// # Decision Table
///
/// | Destination state                                   | Result              |
/// |-----------------------------------------------------|---------------------|
/// | does not exist                                      | proceed, no prompt  |
/// | directory with only ignored entries                 | proceed, no prompt  |
/// | anything else, user answers yes                     | proceed, Ok notice  |
/// | anything else, user answers no                      | skip, warning notice|
pub struct ConflictGuard<'a> {
    base_dir: &'a Path,
    console: &'a mut dyn Console,
}

impl<'a> ConflictGuard<'a> {
    /// Creates a guard rooted at the project base directory.
    pub fn new(base_dir: &'a Path, console: &'a mut dyn Console) -> Self {
        Self { base_dir, console }
    }

    /// Returns `true` when the destination must be left untouched.
    ///
    /// Emits the overwrite or preserve notice as a side effect of the
    /// user's answer. A `true` result means the caller performs no part
    /// of the pending placement.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination directory cannot be listed or
    /// the console fails to produce an answer.
    pub fn should_skip(&mut self, package: &str, dest: &Path) -> Result<bool> {
        if !dest.exists() {
            return Ok(false);
        }

        if dest.is_dir() && is_effectively_empty(dest)? {
            return Ok(false);
        }

        let display = self.display_path(dest);
        let prompt = format!(
            "the path {} already exists. overwrite it with the contents from the {} package?",
            display.cyan(),
            package.cyan()
        );

        if self.console.confirm(&prompt, "Y/n")? {
            self.console.notify(
                &format!("contents of {} being overwritten...", display.cyan()),
                NoticeKind::Ok,
            );
            Ok(false)
        } else {
            debug!(package, dest = %dest.display(), "preserving existing path");
            self.console.notify(
                &format!(
                    "contents of {} weren't overwritten. some parts of the {} package may be missing...",
                    display.cyan(),
                    package.cyan()
                ),
                NoticeKind::Warning,
            );
            Ok(true)
        }
    }

    /// Rewrites an absolute destination relative to the project root.
    fn display_path(&self, path: &Path) -> String {
        match path.strip_prefix(self.base_dir) {
            Ok(relative) => format!("./{}", relative.display()),
            Err(_) => path.display().to_string(),
        }
    }
}

/// Checks whether a directory holds nothing but ignored placeholder entries.
fn is_effectively_empty(dir: &Path) -> Result<bool> {
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let name = entry.file_name();
        let keep = IGNORED_ENTRIES
            .iter()
            .any(|ignored| name.to_string_lossy() == *ignored);
        if !keep {
            return Ok(false);
        }
    }
    Ok(true)
}
