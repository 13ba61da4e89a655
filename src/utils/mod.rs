//! Shared utilities for the deployment engine.
//!
//! # Modules
//!
//! - [`fs`] - File system operations with atomic writes and merge copying
//!
//! # Example
//!
//! ```rust,no_run
//! use lattice_deploy::utils::{atomic_write, ensure_dir};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("public/lattice-components"))?;
//! atomic_write(Path::new("public/lattice-components/packages/acme-widgets.json"), b"{}")?;
//! # Ok(())
//! # }
//! ```

pub mod fs;

pub use fs::{atomic_write, copy_dir, ensure_dir, ensure_parent_dir, safe_write};
