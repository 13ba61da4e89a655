//! Common test utilities and fixtures for lattice-deploy integration tests
//!
//! This module consolidates the project and package scaffolding the
//! integration tests share, so each test reads as: lay out a package,
//! run the binary, assert on the tree.

// Allow dead code because these utilities are used across different test files
// and not all utilities are used in every test file
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Test project builder for creating deployment environments
///
/// Each instance is an isolated Lattice project inside a temporary
/// directory, with an empty `lattice.toml` at its root.
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    project_dir: PathBuf,
}

impl TestProject {
    /// Create a new test project with an empty project file
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        fs::create_dir_all(&project_dir)?;
        fs::write(project_dir.join("lattice.toml"), "")?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    /// Get the project directory path
    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    /// Get a neutral directory outside the project tree
    ///
    /// Useful for running commands that should not discover the project
    /// from their working directory.
    pub fn outside_path(&self) -> PathBuf {
        let outside = self._temp_dir.path().join("elsewhere");
        fs::create_dir_all(&outside).expect("Failed to create outside directory");
        outside
    }

    /// Replace the project file contents
    pub fn write_project_file(&self, content: &str) -> Result<()> {
        fs::write(self.project_dir.join("lattice.toml"), content)
            .context("Failed to write project file")?;
        Ok(())
    }

    /// Create an installed package with the given manifest
    ///
    /// Lays out `packages/<name>/package.toml` plus an empty `dist/`
    /// directory, mirroring what the package manager leaves behind.
    pub fn add_package(&self, name: &str, manifest: &str) -> Result<PathBuf> {
        let root = self.project_dir.join("packages").join(name);
        fs::create_dir_all(root.join("dist"))?;
        fs::write(root.join("package.toml"), manifest)
            .with_context(|| format!("Failed to write manifest for package {name}"))?;
        Ok(root)
    }

    /// Write a file at a path relative to the project root
    pub fn write_file(&self, rel: &str, content: &str) -> Result<()> {
        let path = self.project_dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {rel}"))?;
        Ok(())
    }

    /// Read a file at a path relative to the project root
    pub fn read_file(&self, rel: &str) -> Result<String> {
        fs::read_to_string(self.project_dir.join(rel))
            .with_context(|| format!("Failed to read {rel}"))
    }

    /// Parse a JSON file at a path relative to the project root
    pub fn read_json(&self, rel: &str) -> Result<serde_json::Value> {
        let content = self.read_file(rel)?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {rel} as JSON"))
    }

    /// Run the deploy binary in the project directory
    pub fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        self.run_from(&self.project_dir, args)
    }

    /// Run the deploy binary from an arbitrary working directory
    pub fn run_from(&self, cwd: &Path, args: &[&str]) -> Result<CommandOutput> {
        let output = self
            .command(cwd, args)
            .output()
            .context("Failed to run lattice-deploy command")?;
        Self::capture(&output)
    }

    /// Run the deploy binary with one extra environment variable set
    pub fn run_with_env(
        &self,
        cwd: &Path,
        args: &[&str],
        key: &str,
        value: &str,
    ) -> Result<CommandOutput> {
        let output = self
            .command(cwd, args)
            .env(key, value)
            .output()
            .context("Failed to run lattice-deploy command")?;
        Self::capture(&output)
    }

    fn command(&self, cwd: &Path, args: &[&str]) -> Command {
        let binary = env!("CARGO_BIN_EXE_lattice-deploy");
        let mut command = Command::new(binary);
        command
            .args(args)
            .current_dir(cwd)
            .env("NO_COLOR", "1")
            .env_remove("LATTICE_CONFIG")
            .env_remove("RUST_LOG");
        command
    }

    fn capture(output: &std::process::Output) -> Result<CommandOutput> {
        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Command output helper
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Assert the command succeeded
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "Command failed with code {:?}\nStdout: {}\nStderr: {}",
            self.code, self.stdout, self.stderr
        );
        self
    }

    /// Assert the command failed
    pub fn assert_failure(&self) -> &Self {
        assert!(
            !self.success,
            "Command unexpectedly succeeded\nStdout: {}",
            self.stdout
        );
        self
    }

    /// Assert stdout contains the given text
    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Expected stdout to contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    /// Assert stderr contains the given text
    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Expected stderr to contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}

/// File assertion helpers
pub struct FileAssert;

impl FileAssert {
    /// Assert a file exists
    pub fn exists(path: impl AsRef<Path>) {
        let path = path.as_ref();
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    /// Assert a file does not exist
    pub fn not_exists(path: impl AsRef<Path>) {
        let path = path.as_ref();
        assert!(
            !path.exists(),
            "Expected file to not exist: {}",
            path.display()
        );
    }

    /// Assert a file contains specific content
    pub fn contains(path: impl AsRef<Path>, expected: &str) {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));
        assert!(
            content.contains(expected),
            "Expected file {} to contain '{}'\nActual content: {}",
            path.display(),
            expected,
            content
        );
    }

    /// Assert a file has exact content
    pub fn equals(path: impl AsRef<Path>, expected: &str) {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));
        assert_eq!(
            content,
            expected,
            "File {} content mismatch",
            path.display()
        );
    }
}
