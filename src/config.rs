//! Project configuration loading and mutation.
//!
//! A Lattice project is marked by a `lattice.toml` file at its root. The
//! `[paths]` table names the directories deployments target; every entry is
//! optional and defaults to the standard layout:
//!
//! ```toml
//! [paths]
//! source     = "source"
//! public     = "public"
//! scripts    = "scripts"
//! data       = "source/_data"
//! components = "public/lattice-components"
//! packages   = "packages"
//! ```
//!
//! Relative entries resolve against the project root; absolute entries are
//! used as-is. Commands locate the file by searching upward from the current
//! directory, so they work from any subdirectory of a project.
//!
//! Packages can push configuration through their manifests.
//! [`ProjectConfig::update_option`] applies those updates through `toml_edit`
//! so comments and formatting written by the user survive.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use toml_edit::DocumentMut;
use tracing::debug;

use crate::core::DeployError;
use crate::utils::fs::read_text_file;
use crate::utils::safe_write;

/// File name marking a project root.
pub const PROJECT_FILE: &str = "lattice.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    paths: RawPaths,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawPaths {
    source: String,
    public: String,
    scripts: String,
    data: String,
    components: String,
    packages: String,
}

impl Default for RawPaths {
    fn default() -> Self {
        Self {
            source: "source".to_string(),
            public: "public".to_string(),
            scripts: "scripts".to_string(),
            data: "source/_data".to_string(),
            components: "public/lattice-components".to_string(),
            packages: "packages".to_string(),
        }
    }
}

/// A loaded project configuration with its root directory.
///
/// Path accessors always return absolute paths. The configuration is parsed
/// once per command; option updates go to the file, not the loaded copy.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    file_path: PathBuf,
    base_dir: PathBuf,
    paths: RawPaths,
}

impl ProjectConfig {
    /// Loads the configuration from an explicit project file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file is missing, unreadable, or not valid
    /// TOML.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DeployError::ConfigError {
                message: format!("Project file not found: {}", path.display()),
            }
            .into());
        }

        let file_path = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve project file path: {}", path.display()))?;
        let base_dir = file_path
            .parent()
            .ok_or_else(|| DeployError::ConfigError {
                message: format!("Project file has no parent directory: {}", file_path.display()),
            })?
            .to_path_buf();

        let content = read_text_file(&file_path)?;
        let raw: RawConfig =
            toml::from_str(&content).map_err(|e| DeployError::ProjectConfigParseError {
                file: file_path.display().to_string(),
                reason: e.to_string(),
            })?;

        debug!(project = %base_dir.display(), "loaded project configuration");

        Ok(Self {
            file_path,
            base_dir,
            paths: raw.paths,
        })
    }

    /// Loads the configuration found by searching upward from the current
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::ProjectConfigNotFound`] when no project file
    /// exists between the current directory and the filesystem root.
    pub fn discover() -> Result<Self> {
        let current = std::env::current_dir()
            .context("Cannot determine current working directory")?;
        Self::discover_from(current)
    }

    /// Loads the configuration using an explicit path when given, searching
    /// upward otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error when the explicit path does not exist, or no project
    /// file can be discovered.
    pub fn discover_with_optional(explicit_path: Option<PathBuf>) -> Result<Self> {
        match explicit_path {
            Some(path) => Self::load(&path),
            None => Self::discover(),
        }
    }

    /// Searches upward from `current` for the project file and loads it.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::ProjectConfigNotFound`] when the search
    /// reaches the filesystem root without a match.
    pub fn discover_from(mut current: PathBuf) -> Result<Self> {
        loop {
            let candidate = current.join(PROJECT_FILE);
            if candidate.is_file() {
                return Self::load(&candidate);
            }

            if !current.pop() {
                return Err(DeployError::ProjectConfigNotFound.into());
            }
        }
    }

    /// The project root directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The loaded project file.
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Directory holding the project's source patterns and data.
    #[must_use]
    pub fn source_dir(&self) -> PathBuf {
        self.resolve(&self.paths.source)
    }

    /// Directory the generated site is published into.
    #[must_use]
    pub fn public_dir(&self) -> PathBuf {
        self.resolve(&self.paths.public)
    }

    /// Directory for auxiliary scripts.
    #[must_use]
    pub fn scripts_dir(&self) -> PathBuf {
        self.resolve(&self.paths.scripts)
    }

    /// Directory for shared data files.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.resolve(&self.paths.data)
    }

    /// Directory the component library is assembled in.
    #[must_use]
    pub fn component_dir(&self) -> PathBuf {
        self.resolve(&self.paths.components)
    }

    /// Directory the package manager installs packages into.
    #[must_use]
    pub fn packages_dir(&self) -> PathBuf {
        self.resolve(&self.paths.packages)
    }

    fn resolve(&self, raw: &str) -> PathBuf {
        let path = Path::new(raw);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Sets one (possibly dotted) option in the project file, creating
    /// intermediate tables as needed. Everything else in the file, comments
    /// included, is preserved.
    ///
    /// The loaded configuration is not refreshed; a changed path takes
    /// effect on the next load.
    ///
    /// # Errors
    ///
    /// Returns an error when the option key is empty, a key segment
    /// collides with an existing non-table value, or the file cannot be
    /// rewritten.
    pub fn update_option(&self, option: &str, value: &str) -> Result<()> {
        let segments: Vec<&str> = option.split('.').collect();
        let Some((last, intermediate)) = segments.split_last() else {
            return Err(DeployError::ConfigError {
                message: "Config option name is empty".to_string(),
            }
            .into());
        };
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(DeployError::ConfigError {
                message: format!("Invalid config option name: '{option}'"),
            }
            .into());
        }

        let content = read_text_file(&self.file_path)?;
        let mut document: DocumentMut =
            content
                .parse()
                .map_err(|e: toml_edit::TomlError| DeployError::ProjectConfigParseError {
                    file: self.file_path.display().to_string(),
                    reason: e.to_string(),
                })?;

        let mut table = document.as_table_mut();
        for segment in intermediate {
            let item = table.entry(segment).or_insert_with(|| {
                let mut new_table = toml_edit::Table::new();
                new_table.set_implicit(true);
                toml_edit::Item::Table(new_table)
            });
            table = item.as_table_mut().ok_or_else(|| DeployError::ConfigError {
                message: format!(
                    "Config option '{option}' collides with existing non-table value '{segment}'"
                ),
            })?;
        }
        table[*last] = toml_edit::value(value);

        safe_write(&self.file_path, &document.to_string())?;
        debug!(option, value, "updated project configuration");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_project_file(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(PROJECT_FILE);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_applies_default_paths() {
        let temp = TempDir::new().unwrap();
        let path = write_project_file(temp.path(), "");

        let config = ProjectConfig::load(&path).unwrap();

        let base = temp.path().canonicalize().unwrap();
        assert_eq!(config.base_dir(), base);
        assert_eq!(config.source_dir(), base.join("source"));
        assert_eq!(config.public_dir(), base.join("public"));
        assert_eq!(config.scripts_dir(), base.join("scripts"));
        assert_eq!(config.data_dir(), base.join("source/_data"));
        assert_eq!(
            config.component_dir(),
            base.join("public/lattice-components")
        );
        assert_eq!(config.packages_dir(), base.join("packages"));
    }

    #[test]
    fn test_load_custom_and_absolute_paths() {
        let temp = TempDir::new().unwrap();
        let path = write_project_file(
            temp.path(),
            r#"
[paths]
public   = "www"
packages = "/var/lib/lattice/packages"
"#,
        );

        let config = ProjectConfig::load(&path).unwrap();

        let base = temp.path().canonicalize().unwrap();
        assert_eq!(config.public_dir(), base.join("www"));
        assert_eq!(
            config.packages_dir(),
            PathBuf::from("/var/lib/lattice/packages")
        );
        // untouched keys keep their defaults
        assert_eq!(config.source_dir(), base.join("source"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp = TempDir::new().unwrap();

        let result = ProjectConfig::load(&temp.path().join(PROJECT_FILE));

        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let temp = TempDir::new().unwrap();
        let path = write_project_file(temp.path(), "[paths\nsource = ");

        let error = ProjectConfig::load(&path).unwrap_err();

        assert!(error.downcast_ref::<DeployError>().is_some_and(|e| matches!(
            e,
            DeployError::ProjectConfigParseError { .. }
        )));
    }

    #[test]
    fn test_discover_from_nested_directory() {
        let temp = TempDir::new().unwrap();
        write_project_file(temp.path(), "");
        let nested = temp.path().join("source/_patterns/atoms");
        fs::create_dir_all(&nested).unwrap();

        let config = ProjectConfig::discover_from(nested).unwrap();

        assert_eq!(config.base_dir(), temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_discover_from_without_project_file_fails() {
        let temp = TempDir::new().unwrap();

        let error = ProjectConfig::discover_from(temp.path().to_path_buf()).unwrap_err();

        assert!(error.downcast_ref::<DeployError>().is_some_and(|e| matches!(
            e,
            DeployError::ProjectConfigNotFound
        )));
    }

    #[test]
    fn test_update_option_preserves_comments() {
        let temp = TempDir::new().unwrap();
        let path = write_project_file(
            temp.path(),
            "# project settings\n\n[paths]\npublic = \"www\" # custom layout\n",
        );

        let config = ProjectConfig::load(&path).unwrap();
        config.update_option("title", "My Site").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("# project settings"));
        assert!(content.contains("# custom layout"));
        assert!(content.contains("title = \"My Site\""));
    }

    #[test]
    fn test_update_option_creates_dotted_tables() {
        let temp = TempDir::new().unwrap();
        let path = write_project_file(temp.path(), "");

        let config = ProjectConfig::load(&path).unwrap();
        config
            .update_option("plugins.widgets.enable", "true")
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: toml::Value = toml::from_str(&content).unwrap();
        assert_eq!(
            parsed["plugins"]["widgets"]["enable"].as_str(),
            Some("true")
        );
    }

    #[test]
    fn test_update_option_replaces_existing_value() {
        let temp = TempDir::new().unwrap();
        let path = write_project_file(temp.path(), "title = \"Old\"\n");

        let config = ProjectConfig::load(&path).unwrap();
        config.update_option("title", "New").unwrap();

        let parsed: toml::Value =
            toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["title"].as_str(), Some("New"));
    }

    #[test]
    fn test_update_option_rejects_scalar_collision() {
        let temp = TempDir::new().unwrap();
        let path = write_project_file(temp.path(), "plugins = \"none\"\n");

        let config = ProjectConfig::load(&path).unwrap();
        let result = config.update_option("plugins.widgets.enable", "true");

        assert!(result.is_err());
    }

    #[test]
    fn test_update_option_rejects_empty_segments() {
        let temp = TempDir::new().unwrap();
        let path = write_project_file(temp.path(), "");

        let config = ProjectConfig::load(&path).unwrap();

        assert!(config.update_option("", "x").is_err());
        assert!(config.update_option("plugins..enable", "x").is_err());
    }
}
