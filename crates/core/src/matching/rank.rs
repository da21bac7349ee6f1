use serde::{Deserialize, Serialize};

use crate::catalog::Candidate;
use crate::matching::SHORTLIST_LIMIT;

/// Result of one recommendation run: a bounded shortlist, or an explicit
/// no-match carrying the catalog size so the presenter can phrase its
/// fallback ("none of N programs matched") without re-fetching.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MatchOutcome {
    Shortlist { entries: Vec<Candidate> },
    NoMatch { catalog_size: usize },
}

impl MatchOutcome {
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch { .. })
    }
}

/// Orders survivors featured-first, then by snapshot position, and
/// truncates to [`SHORTLIST_LIMIT`]. No other field participates in the
/// ordering, so equal inputs always rank identically.
pub fn rank(filtered: Vec<Candidate>, catalog_size: usize) -> MatchOutcome {
    if filtered.is_empty() {
        return MatchOutcome::NoMatch { catalog_size };
    }

    let mut entries = filtered;
    entries.sort_by_key(|candidate| (!candidate.program.featured, candidate.original_index));
    entries.truncate(SHORTLIST_LIMIT);

    MatchOutcome::Shortlist { entries }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::catalog::Candidate;
    use crate::domain::program::{
        DeliveryMode, Program, ProgramId, ProgramLevel, University, UniversityId,
    };
    use crate::matching::{rank, MatchOutcome, SHORTLIST_LIMIT};

    fn candidate(original_index: usize, featured: bool) -> Candidate {
        Candidate {
            original_index,
            program: Program {
                id: ProgramId(format!("p-{original_index}")),
                name: format!("Program {original_index}"),
                level: ProgramLevel::Undergraduate,
                category: "Engineering".to_string(),
                mode: DeliveryMode::OnCampus,
                fee: Decimal::new(80_000, 0),
                featured,
                university: University {
                    id: UniversityId("uni-1".to_string()),
                    name: "State University".to_string(),
                },
            },
        }
    }

    #[test]
    fn featured_first_then_snapshot_order_truncated_to_the_limit() {
        // 8 survivors: featured at snapshot indices 5, 1, 7.
        let survivors = vec![
            candidate(0, false),
            candidate(1, true),
            candidate(2, false),
            candidate(3, false),
            candidate(4, false),
            candidate(5, true),
            candidate(6, false),
            candidate(7, true),
        ];

        let outcome = rank(survivors, 20);
        let MatchOutcome::Shortlist { entries } = outcome else {
            panic!("eight survivors must produce a shortlist");
        };

        let indices: Vec<usize> =
            entries.iter().map(|candidate| candidate.original_index).collect();
        assert_eq!(indices, vec![1, 5, 7, 0, 2, 3]);
        assert_eq!(entries.len(), SHORTLIST_LIMIT);
    }

    #[test]
    fn ranking_is_deterministic() {
        let survivors =
            vec![candidate(3, false), candidate(0, true), candidate(2, true), candidate(1, false)];

        assert_eq!(rank(survivors.clone(), 4), rank(survivors, 4));
    }

    #[test]
    fn fewer_survivors_than_the_limit_are_returned_whole() {
        let outcome = rank(vec![candidate(2, false), candidate(4, false)], 10);

        let MatchOutcome::Shortlist { entries } = outcome else {
            panic!("two survivors must produce a shortlist");
        };
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn empty_survivor_set_reports_no_match_with_the_catalog_size() {
        let outcome = rank(Vec::new(), 42);

        assert_eq!(outcome, MatchOutcome::NoMatch { catalog_size: 42 });
        assert!(outcome.is_no_match());
    }
}
