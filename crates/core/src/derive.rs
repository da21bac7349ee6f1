use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::program::{DeliveryMode, Program, ProgramLevel};
use crate::schema::{ConstraintSpec, FieldKey, ModeChoice, QuestionSchema};
use crate::wizard::states::AnswerSet;

/// Resolved boolean test over a program, kept as plain data. Evaluation
/// lives in [`Predicate::matches`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    LevelIn(Vec<ProgramLevel>),
    CategoryMatches(Vec<String>),
    FeeBetween { min: Option<Decimal>, max: Option<Decimal> },
    ModeIs(DeliveryMode),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: FieldKey,
    pub constraint: Constraint,
}

impl Predicate {
    pub fn matches(&self, program: &Program) -> bool {
        match &self.constraint {
            Constraint::LevelIn(levels) => levels.contains(&program.level),
            Constraint::CategoryMatches(keywords) => keywords.iter().any(|keyword| {
                contains_ignore_case(&program.category, keyword)
                    || contains_ignore_case(&program.name, keyword)
            }),
            // Both bounds inclusive; an absent bound does not constrain.
            Constraint::FeeBetween { min, max } => {
                min.map_or(true, |lower| program.fee >= lower)
                    && max.map_or(true, |upper| program.fee <= upper)
            }
            Constraint::ModeIs(mode) => program.mode == *mode,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnknownField,
    UnknownValue,
    Unconstraining,
}

/// An answered field that produced no predicate. Reported so the caller
/// can log it; derivation itself performs no IO.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkippedAnswer {
    pub field: FieldKey,
    pub value: String,
    pub reason: SkipReason,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Derivation {
    pub predicates: Vec<Predicate>,
    pub skipped: Vec<SkippedAnswer>,
}

/// Pure mapping from collected answers to predicates, in schema order.
/// Never consults the catalog; malformed or unconstraining answers are
/// skipped, not fatal.
pub fn derive(answers: &AnswerSet, schema: &QuestionSchema) -> Derivation {
    let mut derivation = Derivation::default();

    for question in schema.questions() {
        let Some(value) = answers.value_of(&question.field) else {
            continue;
        };

        let Some(option) = question.options.iter().find(|option| option.value == value) else {
            derivation.skipped.push(SkippedAnswer {
                field: question.field.clone(),
                value: value.to_string(),
                reason: SkipReason::UnknownValue,
            });
            continue;
        };

        let constraint = match &option.constraint {
            ConstraintSpec::Levels { levels } if !levels.is_empty() => {
                Some(Constraint::LevelIn(levels.clone()))
            }
            ConstraintSpec::Categories { keywords } if !keywords.is_empty() => {
                Some(Constraint::CategoryMatches(keywords.clone()))
            }
            ConstraintSpec::FeeRange { min, max } if min.is_some() || max.is_some() => {
                Some(Constraint::FeeBetween { min: *min, max: *max })
            }
            ConstraintSpec::Mode { mode: ModeChoice::Only(mode) } => {
                Some(Constraint::ModeIs(*mode))
            }
            // Wildcards, empty tag sets, unbounded ranges, and bare options
            // all fall through as non-constraining.
            _ => None,
        };

        match constraint {
            Some(constraint) => derivation
                .predicates
                .push(Predicate { field: question.field.clone(), constraint }),
            None => derivation.skipped.push(SkippedAnswer {
                field: question.field.clone(),
                value: value.to_string(),
                reason: SkipReason::Unconstraining,
            }),
        }
    }

    for (field, value) in answers.iter() {
        if !schema.contains_field(field) {
            derivation.skipped.push(SkippedAnswer {
                field: field.clone(),
                value: value.to_string(),
                reason: SkipReason::UnknownField,
            });
        }
    }

    derivation
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
