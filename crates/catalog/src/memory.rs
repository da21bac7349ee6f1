use async_trait::async_trait;

use coursematch_core::catalog::{CatalogError, CatalogSource, Snapshot};
use coursematch_core::domain::program::Program;

/// Catalog held in memory. Every fetch hands out a fresh snapshot of the
/// same programs, in insertion order.
pub struct InMemoryCatalogSource {
    programs: Vec<Program>,
    fail_reason: Option<String>,
}

impl InMemoryCatalogSource {
    pub fn new(programs: Vec<Program>) -> Self {
        Self { programs, fail_reason: None }
    }

    /// Source that reports the catalog as unavailable on every fetch.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self { programs: Vec::new(), fail_reason: Some(reason.into()) }
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalogSource {
    async fn fetch(&self) -> Result<Snapshot, CatalogError> {
        if let Some(reason) = &self.fail_reason {
            return Err(CatalogError::Unavailable { reason: reason.clone() });
        }
        Ok(Snapshot::new(self.programs.clone()))
    }
}

#[cfg(test)]
mod tests {
    use coursematch_core::catalog::{CatalogError, CatalogSource};

    use crate::fixtures;
    use crate::memory::InMemoryCatalogSource;

    #[tokio::test]
    async fn fetch_preserves_program_order() {
        let programs = fixtures::demo_programs();
        let source = InMemoryCatalogSource::new(programs.clone());

        let snapshot = source.fetch().await.expect("in-memory fetch is infallible");
        assert_eq!(snapshot.programs(), programs.as_slice());
    }

    #[tokio::test]
    async fn failing_source_reports_unavailable() {
        let source = InMemoryCatalogSource::failing("maintenance window");

        let error = source.fetch().await.expect_err("configured to fail");
        assert_eq!(
            error,
            CatalogError::Unavailable { reason: "maintenance window".to_string() }
        );
    }
}
