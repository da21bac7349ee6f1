use std::path::{Path, PathBuf};

use async_trait::async_trait;

use coursematch_core::catalog::{CatalogError, CatalogSource, Snapshot};
use coursematch_core::domain::program::Program;

/// Catalog backed by a JSON array of programs on disk. The file is re-read
/// on every fetch so each recommendation run sees a point-in-time snapshot
/// of whatever the admin tooling last wrote.
pub struct JsonFileCatalogSource {
    path: PathBuf,
}

impl JsonFileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalogSource {
    async fn fetch(&self) -> Result<Snapshot, CatalogError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|error| {
            CatalogError::Unavailable {
                reason: format!("could not read `{}`: {error}", self.path.display()),
            }
        })?;

        let programs: Vec<Program> = serde_json::from_str(&raw).map_err(|error| {
            CatalogError::Malformed {
                reason: format!("`{}` is not a program list: {error}", self.path.display()),
            }
        })?;

        Ok(Snapshot::new(programs))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use coursematch_core::catalog::{CatalogError, CatalogSource};
    use tempfile::TempDir;

    use crate::file::JsonFileCatalogSource;
    use crate::fixtures;

    #[tokio::test]
    async fn round_trips_a_program_list_from_disk() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("programs.json");
        let programs = fixtures::demo_programs();
        fs::write(&path, serde_json::to_string(&programs).expect("serialize programs"))
            .expect("write catalog file");

        let source = JsonFileCatalogSource::new(&path);
        let snapshot = source.fetch().await.expect("file should parse");

        assert_eq!(snapshot.programs(), programs.as_slice());
    }

    #[tokio::test]
    async fn missing_file_is_unavailable_not_malformed() {
        let dir = TempDir::new().expect("temp dir");
        let source = JsonFileCatalogSource::new(dir.path().join("absent.json"));

        let error = source.fetch().await.expect_err("file does not exist");
        assert!(matches!(error, CatalogError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"programs\": oops").expect("write broken file");

        let source = JsonFileCatalogSource::new(&path);
        let error = source.fetch().await.expect_err("broken json must fail");
        assert!(matches!(error, CatalogError::Malformed { .. }));
    }
}
