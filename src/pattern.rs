//! Placement rule parsing for package dist entries.
//!
//! Packages describe where their distributable files land in a project tree
//! using `{ source, destination }` rules. Both sides use a deliberately small
//! pattern language that is parsed once, at the manifest boundary, into
//! [`PathPattern`] values; everything downstream switches on the parsed
//! variant instead of re-inspecting strings.
//!
//! # Pattern Syntax
//!
//! - `*` on its own selects the whole tree (source) or the base directory
//!   itself (destination)
//! - a trailing `*` selects the subtree under the prefix before it, e.g.
//!   `css/*`
//! - anything else is a literal relative path, e.g. `css/main.css`
//!
//! A `*` anywhere but the end is not a wildcard; such a pattern is treated
//! as a literal path. Trailing runs of `*` and `/` collapse, so `css/**`
//! and `css/*` name the same subtree.
//!
//! # Examples
//!
//! ```toml
//! [lattice.dist]
//! public-dir = [
//!     { source = "*", destination = "*" },
//!     { source = "fonts/*", destination = "assets/fonts" },
//!     { source = "favicon.ico", destination = "favicon.ico" },
//! ]
//! ```
//!
//! # Security Considerations
//!
//! Every pattern is sanitized before classification: `..`, `.`, and empty
//! segments are dropped, so a hostile package manifest cannot climb out of
//! the directory its rules are anchored to. Sanitization never fails; it
//! silently strips what it rejects.

use serde::Deserialize;
use std::fmt;

use crate::core::DeployError;

/// Removes path traversal segments from a relative path.
///
/// Splits on `/` and drops `..`, `.`, and empty segments, then rejoins.
/// The result is always a clean relative path (possibly empty). Wildcard
/// segments survive untouched.
///
/// This runs on every externally supplied string that gets interpolated
/// into a filesystem path: rule patterns and package names alike.
///
/// # Examples
///
/// ```rust
/// use lattice_deploy::pattern::sanitize_path;
///
/// assert_eq!(sanitize_path("../../etc/passwd"), "etc/passwd");
/// assert_eq!(sanitize_path("./css/./main.css"), "css/main.css");
/// assert_eq!(sanitize_path("a//b"), "a/b");
/// assert_eq!(sanitize_path("css/*"), "css/*");
/// ```
#[must_use]
pub fn sanitize_path(raw: &str) -> String {
    raw.split('/')
        .filter(|segment| !matches!(*segment, ".." | "." | ""))
        .collect::<Vec<_>>()
        .join("/")
}

/// A parsed path pattern from one side of a placement rule.
///
/// Parsing happens exactly once, when a rule enters the system. Downstream
/// code matches on the variant; no string re-inspection occurs after this
/// point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// A literal relative path (`css/main.css`).
    Exact(String),
    /// A subtree selector with a trailing wildcard (`css/*`); holds the
    /// prefix with the wildcard stripped.
    PrefixGlob(String),
    /// The bare `*` pattern selecting an entire tree.
    WholeTree,
}

impl PathPattern {
    /// Parses a raw pattern string into its variant.
    ///
    /// The input is sanitized first, so traversal segments never survive
    /// into the parsed form. A trailing-wildcard pattern whose prefix
    /// collapses to nothing (`*`, `**`, `/*`) normalizes to [`WholeTree`].
    ///
    /// [`WholeTree`]: PathPattern::WholeTree
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let clean = sanitize_path(raw);

        if clean == "*" {
            return Self::WholeTree;
        }

        if clean.ends_with('*') {
            let prefix = clean.trim_end_matches(['*', '/']);
            if prefix.is_empty() {
                return Self::WholeTree;
            }
            return Self::PrefixGlob(prefix.to_string());
        }

        Self::Exact(clean)
    }

    /// Returns `true` for the wildcard variants.
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        matches!(self, Self::PrefixGlob(_) | Self::WholeTree)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(path) => write!(f, "{path}"),
            Self::PrefixGlob(prefix) => write!(f, "{prefix}/*"),
            Self::WholeTree => write!(f, "*"),
        }
    }
}

/// One file-placement rule from a package dist section.
///
/// A rule pairs a source pattern (relative to the package's dist directory)
/// with a destination pattern (relative to the target base directory).
/// Construction validates the pairing: a literal source names exactly one
/// file, so a wildcard destination for it is rejected as an input error
/// rather than silently producing a file named `*`.
///
/// Rules deserialize directly from manifest entries:
///
/// ```toml
/// { source = "css/*", destination = "assets/css" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawPlacementRule")]
pub struct PlacementRule {
    source: PathPattern,
    destination: PathPattern,
}

#[derive(Debug, Deserialize)]
struct RawPlacementRule {
    source: String,
    destination: String,
}

impl TryFrom<RawPlacementRule> for PlacementRule {
    type Error = DeployError;

    fn try_from(raw: RawPlacementRule) -> Result<Self, Self::Error> {
        Self::new(&raw.source, &raw.destination)
    }
}

impl PlacementRule {
    /// Parses and validates a rule from its raw pattern strings.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::InvalidPlacementRule`] when the source is a
    /// literal path and the destination is any wildcard form.
    pub fn new(source: &str, destination: &str) -> Result<Self, DeployError> {
        let parsed_source = PathPattern::parse(source);
        let parsed_destination = PathPattern::parse(destination);

        if matches!(parsed_source, PathPattern::Exact(_)) && parsed_destination.is_wildcard() {
            return Err(DeployError::InvalidPlacementRule {
                source: source.to_string(),
                destination: destination.to_string(),
            });
        }

        Ok(Self {
            source: parsed_source,
            destination: parsed_destination,
        })
    }

    /// The parsed source pattern.
    #[must_use]
    pub const fn source(&self) -> &PathPattern {
        &self.source
    }

    /// The parsed destination pattern.
    #[must_use]
    pub const fn destination(&self) -> &PathPattern {
        &self.destination
    }
}

impl fmt::Display for PlacementRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}
