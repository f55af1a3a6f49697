//! Bundle project layout.

use std::path::{Path, PathBuf};

use crate::error::{BundleError, BundleResult};

/// Manifest file name at the project root.
pub const MANIFEST_FILE: &str = "databricks.yml";

/// Directory holding job/pipeline resource files.
pub const RESOURCES_DIR: &str = "resources";

/// A bundle project on disk.
#[derive(Debug, Clone)]
pub struct BundleProject {
    root: PathBuf,
}

impl BundleProject {
    /// Open an existing bundle project. Fails if the root or its manifest
    /// is missing.
    pub fn open(root: impl AsRef<Path>) -> BundleResult<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.exists() {
            return Err(BundleError::NotFound(root));
        }
        let project = Self { root };
        if !project.manifest_path().exists() {
            return Err(BundleError::ManifestNotFound(project.manifest_path()));
        }
        Ok(project)
    }

    /// Project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to `databricks.yml`.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Path to the `resources/` directory. May not exist.
    pub fn resources_dir(&self) -> PathBuf {
        self.root.join(RESOURCES_DIR)
    }

    /// Default directory for validation report artifacts.
    pub fn validation_dir(&self) -> PathBuf {
        self.root.join("validation")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn open_requires_manifest() {
        let temp = tempdir().unwrap();
        assert!(matches!(
            BundleProject::open(temp.path()),
            Err(BundleError::ManifestNotFound(_))
        ));

        fs::write(temp.path().join(MANIFEST_FILE), "bundle:\n  name: x\n").unwrap();
        assert!(BundleProject::open(temp.path()).is_ok());
    }

    #[test]
    fn open_missing_root_fails() {
        assert!(matches!(
            BundleProject::open("/nonexistent/bundle/project"),
            Err(BundleError::NotFound(_))
        ));
    }
}
