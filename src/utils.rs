//! Common utility functions shared across the codebase.

use std::{fs, path::Path};

use anyhow::{Context, Result};

/// Write `contents` to `path`, creating missing parent directories.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Path rendered with `/` separators on every platform.
///
/// ```
/// use std::path::Path;
/// use nlsmangle::utils::slash_path;
///
/// assert_eq!(slash_path(Path::new("vs/base/a.js")), "vs/base/a.js");
/// ```
pub fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use crate::utils::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_file_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("c.js");

        write_file(&path, "x").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "x");
    }

    #[test]
    fn test_write_file_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("c.js");

        write_file(&path, "old").unwrap();
        write_file(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }
}
