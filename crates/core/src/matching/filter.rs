use crate::catalog::Candidate;
use crate::derive::Predicate;

/// Keeps the candidates every predicate accepts. Snapshot order is
/// preserved; an empty predicate list keeps the whole catalog. Monotonic:
/// adding a predicate can only shrink the survivor set.
pub fn filter(candidates: &[Candidate], predicates: &[Predicate]) -> Vec<Candidate> {
    candidates
        .iter()
        .filter(|candidate| {
            predicates.iter().all(|predicate| predicate.matches(&candidate.program))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::catalog::{Candidate, Snapshot};
    use crate::derive::{Constraint, Predicate};
    use crate::domain::program::{
        DeliveryMode, Program, ProgramId, ProgramLevel, University, UniversityId,
    };
    use crate::matching::filter;
    use crate::schema::FieldKey;

    fn program(id: &str, level: ProgramLevel, mode: DeliveryMode, fee: i64) -> Program {
        Program {
            id: ProgramId(id.to_string()),
            name: format!("Program {id}"),
            level,
            category: "Engineering".to_string(),
            mode,
            fee: Decimal::new(fee, 0),
            featured: false,
            university: University {
                id: UniversityId("uni-1".to_string()),
                name: "State University".to_string(),
            },
        }
    }

    fn candidates() -> Vec<Candidate> {
        Snapshot::new(vec![
            program("a", ProgramLevel::Undergraduate, DeliveryMode::OnCampus, 40_000),
            program("b", ProgramLevel::Undergraduate, DeliveryMode::Online, 90_000),
            program("c", ProgramLevel::Postgraduate, DeliveryMode::Online, 150_000),
            program("d", ProgramLevel::Doctoral, DeliveryMode::Hybrid, 60_000),
        ])
        .candidates()
    }

    fn level_predicate() -> Predicate {
        Predicate {
            field: FieldKey::new("qualification"),
            constraint: Constraint::LevelIn(vec![ProgramLevel::Undergraduate]),
        }
    }

    fn mode_predicate() -> Predicate {
        Predicate {
            field: FieldKey::new("mode"),
            constraint: Constraint::ModeIs(DeliveryMode::Online),
        }
    }

    #[test]
    fn empty_predicate_list_returns_the_catalog_unchanged() {
        let all = candidates();
        let survivors = filter(&all, &[]);

        assert_eq!(survivors, all);
    }

    #[test]
    fn predicates_combine_as_logical_and() {
        let survivors = filter(&candidates(), &[level_predicate(), mode_predicate()]);

        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].program.id.0, "b");
    }

    #[test]
    fn survivors_keep_snapshot_order() {
        let survivors = filter(&candidates(), &[level_predicate()]);

        let indices: Vec<usize> =
            survivors.iter().map(|candidate| candidate.original_index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn adding_a_predicate_never_grows_the_result() {
        let all = candidates();
        let predicates = vec![level_predicate(), mode_predicate()];

        // Every prefix of the predicate list is a subset relaxation.
        let mut previous = filter(&all, &[]);
        for cut in 1..=predicates.len() {
            let current = filter(&all, &predicates[..cut]);
            assert!(current.len() <= previous.len());
            assert!(current.iter().all(|candidate| previous.contains(candidate)));
            previous = current;
        }
    }
}
