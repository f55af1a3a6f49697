//! Bundle file reading utilities.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{BundleError, BundleResult};
use crate::models::{BundleManifest, JobDefinition, ResourceDocument};
use crate::project::BundleProject;

/// Reader for bundle manifests and resource files.
pub struct BundleReader;

impl BundleReader {
    /// Read and parse the project manifest.
    pub fn read_manifest(project: &BundleProject) -> BundleResult<BundleManifest> {
        let path = project.manifest_path();
        debug!("Reading manifest from {:?}", path);

        let content = fs::read_to_string(&path)?;
        let manifest: BundleManifest =
            serde_yaml::from_str(&content).map_err(|e| BundleError::InvalidFormat {
                path: path.clone(),
                message: e.to_string(),
            })?;
        Ok(manifest)
    }

    /// All YAML resource files under `resources/`, path-sorted so validation
    /// runs and reports are deterministic.
    pub fn resource_files(project: &BundleProject) -> Vec<PathBuf> {
        let resources_dir = project.resources_dir();
        if !resources_dir.exists() {
            return Vec::new();
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&resources_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .map_or(false, |ext| ext == "yaml" || ext == "yml")
            })
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }

    /// Read one resource file: raw tree plus typed job views.
    pub fn read_resource(project: &BundleProject, path: &Path) -> BundleResult<ResourceDocument> {
        debug!("Reading resource from {:?}", path);

        let content = fs::read_to_string(path)?;
        let raw: Value = serde_yaml::from_str(&content).map_err(|e| BundleError::InvalidFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let relative = path
            .strip_prefix(project.root())
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let jobs = Self::extract_jobs(&raw, path)?;

        Ok(ResourceDocument {
            path: relative,
            raw,
            jobs,
        })
    }

    fn extract_jobs(
        raw: &Value,
        path: &Path,
    ) -> BundleResult<std::collections::BTreeMap<String, JobDefinition>> {
        let mut jobs = std::collections::BTreeMap::new();

        let entries = raw
            .get("resources")
            .and_then(|r| r.get("jobs"))
            .and_then(|j| j.as_mapping());

        if let Some(entries) = entries {
            for (key, value) in entries {
                let Some(name) = key.as_str() else { continue };
                let job: JobDefinition =
                    serde_yaml::from_value(value.clone()).map_err(|e| {
                        BundleError::InvalidFormat {
                            path: path.to_path_buf(),
                            message: format!("job '{}': {}", name, e),
                        }
                    })?;
                jobs.insert(name.to_string(), job);
            }
        }

        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_project(root: &Path) {
        fs::write(
            root.join("databricks.yml"),
            r#"
bundle:
  name: analytics
targets:
  dev:
    mode: development
"#,
        )
        .unwrap();
        fs::create_dir_all(root.join("resources")).unwrap();
    }

    #[test]
    fn resource_files_are_sorted() {
        let temp = tempdir().unwrap();
        write_project(temp.path());
        let resources = temp.path().join("resources");
        fs::write(resources.join("b_job.yml"), "resources: {}").unwrap();
        fs::write(resources.join("a_job.yml"), "resources: {}").unwrap();

        let project = BundleProject::open(temp.path()).unwrap();
        let files = BundleReader::resource_files(&project);

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a_job.yml"));
        assert!(files[1].ends_with("b_job.yml"));
    }

    #[test]
    fn read_resource_extracts_typed_jobs() {
        let temp = tempdir().unwrap();
        write_project(temp.path());
        let file = temp.path().join("resources").join("etl.yml");
        fs::write(
            &file,
            r#"
resources:
  jobs:
    Nightly_etl:
      name: "Nightly ETL ${bundle.environment}"
      tags:
        team: data
      timeout_seconds: 3600
"#,
        )
        .unwrap();

        let project = BundleProject::open(temp.path()).unwrap();
        let doc = BundleReader::read_resource(&project, &file).unwrap();

        assert_eq!(doc.path, "resources/etl.yml");
        assert_eq!(doc.jobs.len(), 1);
        let job = &doc.jobs["Nightly_etl"];
        assert_eq!(job.timeout_seconds, Some(3600));
        assert!(job.tags.contains_key("team"));
    }

    #[test]
    fn read_resource_rejects_malformed_yaml() {
        let temp = tempdir().unwrap();
        write_project(temp.path());
        let file = temp.path().join("resources").join("broken.yml");
        fs::write(&file, "resources:\n  jobs: [unclosed").unwrap();

        let project = BundleProject::open(temp.path()).unwrap();
        assert!(BundleReader::read_resource(&project, &file).is_err());
    }

    #[test]
    fn missing_resources_dir_yields_no_files() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("databricks.yml"), "bundle:\n  name: x\n").unwrap();

        let project = BundleProject::open(temp.path()).unwrap();
        assert!(BundleReader::resource_files(&project).is_empty());
    }
}
