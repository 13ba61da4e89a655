//! File placement engine for package dist rules.
//!
//! A validated [`PlacementRule`] resolves to exactly one [`PlacementAction`],
//! which is then applied against a concrete source base (the package's dist
//! directory) and destination base (one of the project's configured
//! directories). Every action consults the [`ConflictGuard`] before touching
//! the destination; a skipped action performs no work at all.
//!
//! [`PlacementRule`]: crate::pattern::PlacementRule

pub mod action;
pub mod conflict;

pub use action::{Outcome, PlacementAction};
pub use conflict::ConflictGuard;
