use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::program::Program;

/// One program stamped with its position in the snapshot it came from.
/// `original_index` is the only tie-break input the ranking policy uses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub original_index: usize,
    pub program: Program,
}

/// Point-in-time view of the catalog. Immutable for the duration of one
/// recommendation run; a fresh run fetches a fresh snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    programs: Vec<Program>,
}

impl Snapshot {
    pub fn new(programs: Vec<Program>) -> Self {
        Self { programs }
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        self.programs
            .iter()
            .enumerate()
            .map(|(original_index, program)| Candidate {
                original_index,
                program: program.clone(),
            })
            .collect()
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("catalog data is malformed: {reason}")]
    Malformed { reason: String },
}

/// Read side of the external catalog collaborator. The core never
/// subscribes to updates; it fetches once per recommendation run.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Snapshot, CatalogError>;
}

#[async_trait]
impl CatalogSource for Box<dyn CatalogSource> {
    async fn fetch(&self) -> Result<Snapshot, CatalogError> {
        (**self).fetch().await
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::catalog::Snapshot;
    use crate::domain::program::{
        DeliveryMode, Program, ProgramId, ProgramLevel, University, UniversityId,
    };

    fn program(id: &str) -> Program {
        Program {
            id: ProgramId(id.to_string()),
            name: format!("Program {id}"),
            level: ProgramLevel::Undergraduate,
            category: "Engineering".to_string(),
            mode: DeliveryMode::OnCampus,
            fee: Decimal::new(80_000, 0),
            featured: false,
            university: University {
                id: UniversityId("uni-1".to_string()),
                name: "State University".to_string(),
            },
        }
    }

    #[test]
    fn candidates_carry_their_snapshot_position() {
        let snapshot = Snapshot::new(vec![program("a"), program("b"), program("c")]);

        let candidates = snapshot.candidates();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].original_index, 0);
        assert_eq!(candidates[2].original_index, 2);
        assert_eq!(candidates[1].program.id.0, "b");
    }
}
