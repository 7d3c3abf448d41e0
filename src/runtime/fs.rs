//! File system operations (read, exists).

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn read_impl(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).with_context(|| format!("Failed to read file {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_to_string_impl(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn exists_impl(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_file_ops() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.txt");

        std::fs::write(&file_path, b"hello").unwrap();
        assert!(runtime.exists(&file_path));

        let bytes = runtime.read(&file_path).unwrap();
        assert_eq!(bytes, b"hello");

        let content = runtime.read_to_string(&file_path).unwrap();
        assert_eq!(content, "hello");
    }

    #[test]
    fn test_real_runtime_errors() {
        let runtime = RealRuntime;

        let missing = std::path::Path::new("/nonexistent/path/file.txt");
        assert!(!runtime.exists(missing));
        assert!(runtime.read(missing).is_err());
        assert!(runtime.read_to_string(missing).is_err());
    }
}
