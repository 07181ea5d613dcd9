//! Small filesystem conveniences.
//!
//! Idempotent create/delete helpers and path accessors that return plain
//! strings instead of `OsStr` plumbing.

use crate::LatticeResult;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Creates the directory and its parents, succeeding if it already exists.
pub fn ensure_dir_created<P: AsRef<Path>>(path: P) -> LatticeResult<()> {
    fs::create_dir_all(path.as_ref())?;
    Ok(())
}

/// Removes the directory tree, succeeding if it does not exist. Returns
/// whether anything was removed.
pub fn ensure_dir_deleted<P: AsRef<Path>>(path: P) -> LatticeResult<bool> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(path)?;
    debug!(path = %path.display(), "directory removed");
    Ok(true)
}

/// Removes the file, succeeding if it does not exist. Returns whether
/// anything was removed.
pub fn ensure_file_deleted<P: AsRef<Path>>(path: P) -> LatticeResult<bool> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path)?;
    Ok(true)
}

/// The file extension without the dot, lowercased. Empty when absent.
#[must_use]
pub fn file_extension<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// The file name without its extension. Empty when the path has no name.
#[must_use]
pub fn file_stem<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Size of the file in bytes.
pub fn file_size<P: AsRef<Path>>(path: P) -> LatticeResult<u64> {
    Ok(fs::metadata(path.as_ref())?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_ensure_dir_created_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a/b/c");
        ensure_dir_created(&nested).unwrap();
        ensure_dir_created(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_ensure_dir_deleted() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("gone");
        ensure_dir_created(&dir).unwrap();
        assert!(ensure_dir_deleted(&dir).unwrap());
        assert!(!ensure_dir_deleted(&dir).unwrap());
    }

    #[test]
    fn test_ensure_file_deleted() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("note.txt");
        fs::write(&file, "x").unwrap();
        assert!(ensure_file_deleted(&file).unwrap());
        assert!(!ensure_file_deleted(&file).unwrap());
    }

    #[test]
    fn test_path_accessors() {
        assert_eq!(file_extension("/tmp/Report.TXT"), "txt");
        assert_eq!(file_extension("/tmp/no_extension"), "");
        assert_eq!(file_stem("/tmp/report.txt"), "report");
        assert_eq!(file_stem("/"), "");
    }

    #[test]
    fn test_file_size() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"12345").unwrap();
        file.flush().unwrap();
        assert_eq!(file_size(file.path()).unwrap(), 5);
    }
}
