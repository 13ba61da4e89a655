//! Core types for the deployment engine.
//!
//! The error system is built around two types:
//! - **Strongly-typed errors** ([`DeployError`]) for precise handling in code
//! - **User-friendly contexts** ([`ErrorContext`]) with actionable suggestions
//!   for CLI users
//!
//! # Error Handling Pattern
//!
//! ```rust
//! use lattice_deploy::core::{DeployError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn example_operation() -> Result<String> {
//!     Err(DeployError::ProjectConfigNotFound.into())
//! }
//!
//! fn handle_operation() {
//!     match example_operation() {
//!         Ok(result) => println!("Success: {}", result),
//!         Err(e) => {
//!             let friendly = user_friendly_error(e);
//!             friendly.display(); // Shows colored error with suggestions
//!         }
//!     }
//! }
//! ```

pub mod error;

pub use error::{DeployError, ErrorContext, user_friendly_error};
