//! Error handling for the deployment engine
//!
//! The error system is designed around two core principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`DeployError`] - Enumerated error types for all failure cases
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Error Conversion and Context
//!
//! Common standard library errors are automatically converted:
//! - [`std::io::Error`] → [`DeployError::IoError`]
//! - [`toml::de::Error`] → [`DeployError::TomlError`]
//! - [`serde_json::Error`] → [`DeployError::JsonError`]
//!
//! Use [`user_friendly_error`] to convert any error into a user-friendly format
//! with contextual suggestions.
//!
//! # Examples
//!
//! ```rust,no_run
//! use lattice_deploy::core::{DeployError, user_friendly_error};
//!
//! fn load_registry() -> Result<(), DeployError> {
//!     Err(DeployError::RegistryCorrupted {
//!         file: "listeners.json".to_string(),
//!         reason: "expected an array under key 'listeners'".to_string(),
//!     })
//! }
//!
//! match load_registry() {
//!     Ok(()) => println!("ok"),
//!     Err(e) => {
//!         let ctx = user_friendly_error(anyhow::Error::from(e));
//!         ctx.display(); // Shows colored error with suggestions
//!     }
//! }
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for deployment operations
///
/// Each variant represents a specific failure mode and carries the context
/// needed to report it precisely. Errors are written for end users running
/// package hooks, not just developers.
#[derive(Error, Debug)]
pub enum DeployError {
    /// A placement rule pairs a literal source file with a wildcard destination
    ///
    /// A single source file has exactly one destination; a wildcard on the
    /// destination side of such a rule has no meaning and is rejected before
    /// any file is placed.
    ///
    /// # Fields
    /// - `source`: The source pattern of the offending rule
    /// - `destination`: The destination pattern of the offending rule
    #[error("Invalid placement rule: literal source '{source}' cannot target wildcard destination '{destination}'")]
    InvalidPlacementRule {
        /// The source pattern of the offending rule
        r#source: String,
        /// The destination pattern of the offending rule
        destination: String,
    },

    /// A registry file exists but does not parse as the expected document
    ///
    /// Registries are only ever repaired by hand. A file that fails to parse,
    /// or parses to something other than an object with the expected array
    /// key, aborts the pass and is left exactly as it was found.
    ///
    /// # Fields
    /// - `file`: Path to the registry file that failed to load
    /// - `reason`: Why the document was rejected
    #[error("Invalid registry file {file}: {reason}")]
    RegistryCorrupted {
        /// Path to the registry file that failed to load
        file: String,
        /// Why the document was rejected
        reason: String,
    },

    /// Package directory or manifest missing under the packages directory
    #[error("Package '{name}' not found at {path}")]
    PackageNotFound {
        /// Name of the package that could not be found
        name: String,
        /// The path that was expected to contain the package
        path: String,
    },

    /// Package manifest parsing error
    #[error("Invalid package manifest syntax in {file}")]
    PackageManifestParseError {
        /// Path to the manifest file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Project file (lattice.toml) not found
    ///
    /// The project file is searched for starting from the current working
    /// directory and walking up the directory tree, similar to how git
    /// searches for .git.
    #[error("Project file lattice.toml not found in current directory or any parent directory")]
    ProjectConfigNotFound,

    /// Project file parsing error
    #[error("Invalid project file syntax in {file}")]
    ProjectConfigParseError {
        /// Path to the project file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// File system error
    #[error("File system error: {operation}")]
    FileSystemError {
        /// The file system operation that failed
        operation: String,
        /// Path where the file system error occurred
        path: String,
    },

    /// Permission denied
    #[error("Permission denied: {operation}")]
    PermissionDenied {
        /// The operation that was denied due to insufficient permissions
        operation: String,
        /// Path where permission was denied
        path: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for DeployError {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidPlacementRule {
                source,
                destination,
            } => Self::InvalidPlacementRule {
                source: source.clone(),
                destination: destination.clone(),
            },
            Self::RegistryCorrupted {
                file,
                reason,
            } => Self::RegistryCorrupted {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::PackageNotFound {
                name,
                path,
            } => Self::PackageNotFound {
                name: name.clone(),
                path: path.clone(),
            },
            Self::PackageManifestParseError {
                file,
                reason,
            } => Self::PackageManifestParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::ProjectConfigNotFound => Self::ProjectConfigNotFound,
            Self::ProjectConfigParseError {
                file,
                reason,
            } => Self::ProjectConfigParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::FileSystemError {
                operation,
                path,
            } => Self::FileSystemError {
                operation: operation.clone(),
                path: path.clone(),
            },
            Self::PermissionDenied {
                operation,
                path,
            } => Self::PermissionDenied {
                operation: operation.clone(),
                path: path.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::JsonError(e) => Self::Other {
                message: format!("JSON error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` wraps a [`DeployError`] and adds optional suggestions for
/// resolution and additional details. This is the primary way errors are
/// presented to CLI users.
///
/// # Display Format
///
/// When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context about the error in yellow (optional)
/// 3. **Suggestion**: Actionable steps to resolve the issue in green (optional)
///
/// # Examples
///
/// ```rust,no_run
/// use lattice_deploy::core::{DeployError, ErrorContext};
///
/// let context = ErrorContext::new(DeployError::ProjectConfigNotFound)
///     .with_suggestion("Create a lattice.toml file in your project directory")
///     .with_details("The project file is searched for in current and parent directories");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying deployment error
    pub error: DeployError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`DeployError`]
    ///
    /// This creates a basic error context with no additional suggestions or
    /// details. Use [`with_suggestion`] and [`with_details`] to add
    /// user-friendly information.
    ///
    /// [`with_suggestion`]: ErrorContext::with_suggestion
    /// [`with_details`]: ErrorContext::with_details
    #[must_use]
    pub const fn new(error: DeployError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    ///
    /// Suggestions should be actionable steps that users can take to resolve
    /// the error. They are displayed in green in the terminal.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    ///
    /// Details provide context about why the error occurred or what it means.
    /// They are displayed in yellow in the terminal.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// Prints the error, details, and suggestion to stderr using color coding:
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// This function is the main entry point for converting arbitrary errors into
/// user-friendly error messages for CLI display. It recognizes common error
/// types and provides appropriate context and suggestions.
///
/// # Error Recognition
///
/// The function recognizes and provides specific handling for:
/// - [`DeployError`] variants with tailored suggestions
/// - [`std::io::Error`] with filesystem-specific guidance
/// - [`toml::de::Error`] with TOML syntax help
/// - Generic errors with their full cause chain
///
/// # Examples
///
/// ```rust,no_run
/// use lattice_deploy::core::{DeployError, user_friendly_error};
///
/// let error = DeployError::ProjectConfigNotFound;
/// let context = user_friendly_error(anyhow::Error::from(error));
///
/// context.display(); // Shows project setup suggestions
/// ```
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    // Check for specific error types and provide helpful suggestions
    if let Some(deploy_error) = error.downcast_ref::<DeployError>() {
        return create_error_context(deploy_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(DeployError::PermissionDenied {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion(
                    "Check ownership of the project tree or run the hook with sufficient permissions",
                )
                .with_details(
                    "This error occurs when the engine doesn't have permission to read or write files",
                );
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(DeployError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct")
                .with_details(
                    "This error occurs when a required file or directory cannot be found",
                );
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(DeployError::ProjectConfigParseError {
            file: "lattice.toml".to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion(
            "Check the TOML syntax. Verify quotes, brackets, and table headers",
        )
        .with_details(
            "TOML parsing errors are usually caused by syntax issues like missing quotes or mismatched brackets",
        );
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> = error
        .chain()
        .skip(1) // Skip the root cause which is already in to_string()
        .map(std::string::ToString::to_string)
        .collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(DeployError::Other {
        message,
    })
}

/// Create appropriate [`ErrorContext`] with suggestions for specific deployment errors
///
/// Maps each [`DeployError`] variant to an [`ErrorContext`] with tailored
/// suggestions and details. Used by [`user_friendly_error`] to provide
/// consistent, helpful error messages.
fn create_error_context(error: DeployError) -> ErrorContext {
    match &error {
        DeployError::InvalidPlacementRule { source, destination } => {
            ErrorContext::new(DeployError::InvalidPlacementRule {
                source: source.clone(),
                destination: destination.clone(),
            })
            .with_suggestion(format!(
                "Fix the dist entry in the package manifest: give '{source}' a literal destination path, or make the source a wildcard"
            ))
            .with_details(
                "A literal source file has exactly one destination, so a wildcard destination has no meaning",
            )
        }

        DeployError::RegistryCorrupted { file, reason } => {
            ErrorContext::new(DeployError::RegistryCorrupted {
                file: file.clone(),
                reason: reason.clone(),
            })
            .with_suggestion(format!(
                "Inspect {file} and repair it by hand, or delete it to start from an empty registry"
            ))
            .with_details(
                "Registry files are never rewritten when they cannot be parsed, so manual entries are preserved",
            )
        }

        DeployError::PackageNotFound { name, path } => {
            ErrorContext::new(DeployError::PackageNotFound {
                name: name.clone(),
                path: path.clone(),
            })
            .with_suggestion(format!(
                "Check that the package manager placed '{name}' under the packages directory before running the hook"
            ))
            .with_details(format!("Expected a package manifest at {path}"))
        }

        DeployError::PackageManifestParseError { file, reason } => {
            ErrorContext::new(DeployError::PackageManifestParseError {
                file: file.clone(),
                reason: reason.clone(),
            })
            .with_suggestion(format!(
                "Check the TOML syntax in {file}. Common issues: missing quotes, unmatched brackets, invalid characters"
            ))
            .with_details(reason.clone())
        }

        DeployError::ProjectConfigNotFound => ErrorContext::new(DeployError::ProjectConfigNotFound)
            .with_suggestion(
                "Create a lattice.toml file in your project directory, or pass --config with an explicit path",
            )
            .with_details(
                "The project file is searched for in the current directory and parent directories up to the filesystem root",
            ),

        DeployError::ProjectConfigParseError { file, reason } => {
            ErrorContext::new(DeployError::ProjectConfigParseError {
                file: file.clone(),
                reason: reason.clone(),
            })
            .with_suggestion(format!(
                "Check the TOML syntax in {file}. Common issues: missing quotes, unmatched brackets, invalid characters"
            ))
            .with_details(reason.clone())
        }

        DeployError::PermissionDenied { operation, path } => {
            ErrorContext::new(DeployError::PermissionDenied {
                operation: operation.clone(),
                path: path.clone(),
            })
            .with_suggestion(match cfg!(windows) {
                true => "Run as Administrator or check file permissions in File Explorer",
                false => "Use 'sudo' or check file permissions with 'ls -la'",
            })
            .with_details(format!(
                "Cannot {operation} due to insufficient permissions on {path}"
            ))
        }

        _ => ErrorContext::new(error.clone()),
    }
}
