//! Lattice deploy engine.
//!
//! Deploys Lattice package assets into a project tree and maintains the
//! framework's component records and extension-point registries. The
//! package manager invokes this engine from its lifecycle hooks; the
//! engine itself never downloads or deletes packages.
//!
//! # Architecture Overview
//!
//! A Lattice project is a directory marked by a `lattice.toml` project
//! file. The package manager installs packages under the project's
//! `packages/` directory and then hands control to this engine:
//!
//! - after `install` and `update`, the engine reads the package's
//!   `package.toml`, places the files its `[lattice.dist]` rules name,
//!   records component files for the site builder, applies configuration
//!   pushes, and registers discovered extension points;
//! - before `uninstall`, the engine removes the package's registry entries
//!   while leaving deployed files and component manifests behind, since
//!   deployed assets may have been edited in place after installation.
//!
//! ## Key Properties
//!
//! - **Declarative placement**: packages describe where files go with
//!   `{ source, destination }` rules; a trailing `*` mirrors a whole tree
//! - **Confined writes**: destinations are sanitized and resolved inside
//!   the project, so a package cannot write outside it
//! - **Prompted overwrites**: existing content is never replaced without a
//!   yes from the user or a `--force`/`--preserve` pre-answer
//! - **Idempotent registries**: registrations are derived from sentinel
//!   files, and re-running a pass changes nothing
//!
//! # Core Modules
//!
//! ## Entry Points
//! - [`cli`] - command-line interface the package manager hooks invoke
//! - [`hooks`] - the lifecycle passes behind each command
//!
//! ## Deployment
//! - [`pattern`] - placement rule parsing and path sanitization
//! - [`deploy`] - placement actions and the overwrite guard
//! - [`console`] - prompt and notice seam between passes and the terminal
//!
//! ## Components and Registries
//! - [`component`] - component file classification and manifest output
//! - [`registry`] - extension-point registry maintenance
//!
//! ## Supporting Modules
//! - [`config`] - project file loading and option updates
//! - [`package`] - package manifest parsing
//! - [`core`] - error types and user-facing error display
//! - [`utils`] - cross-platform file system helpers
//!
//! # Package Manifest Format (package.toml)
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
//! public-dir = [ { source = "assets/*", destination = "*" } ]
//! component-dir = [ { source = "*", destination = "*" } ]
//!
//! [[lattice.config]]
//! option = "plugins.widgets.enable"
//! value = "true"
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! # scaffold a fresh project
//! lattice-deploy prepare
//!
//! # deploy a freshly installed package
//! lattice-deploy install acme/widgets
//!
//! # re-deploy after an update, overwriting without prompts
//! lattice-deploy update acme/widgets --force
//!
//! # drop registrations before the package is removed
//! lattice-deploy uninstall acme/widgets
//! ```

// Entry points
pub mod cli;
pub mod hooks;

// Deployment
pub mod console;
pub mod deploy;
pub mod pattern;

// Components and registries
pub mod component;
pub mod registry;

// Supporting modules
pub mod config;
pub mod core;
pub mod package;
pub mod utils;
