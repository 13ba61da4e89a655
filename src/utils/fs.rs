//! File system utilities shared by the deployment engine.
//!
//! All writes that land in a project tree go through the atomic
//! write-then-rename path so a crashed hook never leaves a half-written
//! registry or manifest behind. Directory mirroring merges into existing
//! trees rather than replacing them, which is what lets packages layer
//! their files over a starter kit without clobbering sibling entries.
//!
//! # Examples
//!
//! ```rust
//! use lattice_deploy::utils::fs::{ensure_dir, safe_write};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("public/lattice-components"))?;
//! safe_write(Path::new("public/lattice-components/note.txt"), "hello")?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Arguments
///
/// * `path` - The directory path to create
///
/// # Returns
///
/// - `Ok(())` if the directory exists or was successfully created
/// - `Err` if the path exists but is not a directory, or creation fails
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!(
            "Path exists but is not a directory: {}",
            path.display()
        ));
    }
    Ok(())
}

/// Ensures that the parent directory of a file path exists.
///
/// Convenience for creating the directory structure needed for a file
/// before writing to it. A path with no parent is a no-op.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

/// Safely writes a string to a file using atomic operations.
///
/// Convenience wrapper around [`atomic_write`] that handles string-to-bytes
/// conversion. The file either contains the new content or the old content,
/// never a partial write.
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// This function ensures atomic writes by:
/// 1. Writing content to a temporary file (`.tmp` extension)
/// 2. Syncing the temporary file to disk
/// 3. Atomically renaming the temporary file to the target path
///
/// Parent directories are created automatically.
///
/// # Arguments
///
/// * `path` - The target file path
/// * `content` - The raw bytes to write
///
/// # Examples
///
/// ```rust
/// use lattice_deploy::utils::fs::atomic_write;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// atomic_write(Path::new("listeners.json"), b"{\"listeners\":[]}")?;
/// # Ok(())
/// # }
/// ```
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let temp_path = path.with_extension("tmp");

    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

        file.sync_all()
            .with_context(|| "Failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Recursively copies a directory and all its contents into a destination.
///
/// Performs a deep merge copy: the destination directory is created if it
/// doesn't exist, existing files are overwritten, and entries already present
/// in the destination but absent from the source are left alone. This is the
/// mirror primitive the placement engine builds on.
///
/// # Arguments
///
/// * `src` - The source directory to copy from
/// * `dst` - The destination directory to copy into
///
/// # Behavior
///
/// - Creates the destination directory if it doesn't exist
/// - Recursively copies all subdirectories
/// - Copies only regular files (skips symlinks and special files)
/// - Overwrites existing files in the destination
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    ensure_dir(dst)?;

    for entry in
        fs::read_dir(src).with_context(|| format!("Failed to read directory: {}", src.display()))?
    {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if file_type.is_dir() {
            copy_dir(&src_path, &dst_path)?;
        } else if file_type.is_file() {
            fs::copy(&src_path, &dst_path).with_context(|| {
                format!(
                    "Failed to copy file from {} to {}",
                    src_path.display(),
                    dst_path.display()
                )
            })?;
        }
        // Skip symlinks and other file types
    }

    Ok(())
}

/// Copies a single file, overwriting any existing destination file.
///
/// The destination's parent directory must already exist; callers create it
/// first so the conflict check can inspect the final path.
pub fn copy_file_overwrite(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst).with_context(|| {
        format!(
            "Failed to copy file from {} to {}",
            src.display(),
            dst.display()
        )
    })?;
    Ok(())
}

/// Reads a text file with proper error handling and context.
///
/// # Errors
/// Returns an error with context if the file cannot be read
pub fn read_text_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Writes a text file atomically with proper error handling.
///
/// # Errors
/// Returns an error with context if the file cannot be written
pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    safe_write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Reads and parses a JSON file.
///
/// # Type Parameters
/// * `T` - The type to deserialize into (must implement DeserializeOwned)
///
/// # Errors
/// Returns an error if the file cannot be read or parsed
pub fn read_json_file<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = read_text_file(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON from file: {}", path.display()))
}

/// Writes data as JSON to a file atomically.
///
/// # Arguments
/// * `path` - The path to write to
/// * `data` - The data to serialize
/// * `pretty` - Whether to use pretty formatting
///
/// # Errors
/// Returns an error if serialization fails or the file cannot be written
pub fn write_json_file<T>(path: &Path, data: &T, pretty: bool) -> Result<()>
where
    T: serde::Serialize,
{
    let json = if pretty {
        serde_json::to_string_pretty(data)?
    } else {
        serde_json::to_string(data)?
    };

    write_text_file(path, &json)
        .with_context(|| format!("Failed to write JSON file: {}", path.display()))
}

/// Reads and parses a TOML file.
///
/// # Type Parameters
/// * `T` - The type to deserialize into (must implement DeserializeOwned)
///
/// # Errors
/// Returns an error if the file cannot be read or parsed
pub fn read_toml_file<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = read_text_file(path)?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}
