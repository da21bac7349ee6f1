use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::program::{DeliveryMode, ProgramLevel};

/// Key identifying one wizard question and its recorded answer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldKey(pub String);

impl FieldKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Delivery-mode selection on an option: a concrete mode, or the wildcard
/// that derives no predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeChoice {
    Any,
    Only(DeliveryMode),
}

impl ModeChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Only(mode) => mode.as_str(),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("any") {
            return Some(Self::Any);
        }
        DeliveryMode::parse(value).map(Self::Only)
    }
}

impl Serialize for ModeChoice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ModeChoice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown mode choice `{raw}`")))
    }
}

/// Constraint metadata attached to one option, one variant per question
/// type. `None` means the option does not constrain the catalog.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintSpec {
    Levels {
        levels: Vec<ProgramLevel>,
    },
    Categories {
        keywords: Vec<String>,
    },
    FeeRange {
        min: Option<Decimal>,
        max: Option<Decimal>,
    },
    Mode {
        mode: ModeChoice,
    },
    #[default]
    None,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub constraint: ConstraintSpec,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub step: usize,
    pub field: FieldKey,
    pub prompt: String,
    pub options: Vec<QuestionOption>,
}

/// Ordered, validated wizard configuration. Construction goes through
/// [`QuestionSchema::new`], so a held schema always satisfies the step and
/// uniqueness invariants.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuestionSchema {
    questions: Vec<Question>,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("question schema must contain at least one question")]
    Empty,
    #[error("question steps must be contiguous from 1: expected step {expected}, found {found}")]
    NonContiguousStep { expected: usize, found: usize },
    #[error("duplicate question field `{0}`")]
    DuplicateField(String),
    #[error("question `{field}` has no options")]
    NoOptions { field: String },
    #[error("question `{field}` has duplicate option value `{value}`")]
    DuplicateOptionValue { field: String, value: String },
    #[error("could not parse question schema: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
struct SchemaFile {
    questions: Vec<Question>,
}

impl QuestionSchema {
    pub fn new(questions: Vec<Question>) -> Result<Self, SchemaError> {
        if questions.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen_fields: HashSet<&str> = HashSet::new();
        for (index, question) in questions.iter().enumerate() {
            let expected = index + 1;
            if question.step != expected {
                return Err(SchemaError::NonContiguousStep { expected, found: question.step });
            }
            if !seen_fields.insert(question.field.0.as_str()) {
                return Err(SchemaError::DuplicateField(question.field.0.clone()));
            }
            if question.options.is_empty() {
                return Err(SchemaError::NoOptions { field: question.field.0.clone() });
            }

            let mut seen_values: HashSet<&str> = HashSet::new();
            for option in &question.options {
                if !seen_values.insert(option.value.as_str()) {
                    return Err(SchemaError::DuplicateOptionValue {
                        field: question.field.0.clone(),
                        value: option.value.clone(),
                    });
                }
            }
        }

        Ok(Self { questions })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, SchemaError> {
        let file: SchemaFile = toml::from_str(raw)?;
        Self::new(file.questions)
    }

    pub fn total_steps(&self) -> usize {
        self.questions.len()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Question at a 1-based step.
    pub fn question_at(&self, step: usize) -> Option<&Question> {
        step.checked_sub(1).and_then(|index| self.questions.get(index))
    }

    pub fn field_at(&self, step: usize) -> Option<&FieldKey> {
        self.question_at(step).map(|question| &question.field)
    }

    pub fn contains_field(&self, field: &FieldKey) -> bool {
        self.questions.iter().any(|question| &question.field == field)
    }

    pub fn find_option(&self, field: &FieldKey, value: &str) -> Option<&QuestionOption> {
        self.questions
            .iter()
            .find(|question| &question.field == field)
            .and_then(|question| question.options.iter().find(|option| option.value == value))
    }

    /// The stock four-step wizard: qualification, interest, budget, mode.
    pub fn built_in() -> Self {
        let questions = vec![
            Question {
                step: 1,
                field: FieldKey::new("qualification"),
                prompt: "What is your highest completed qualification?".to_string(),
                options: vec![
                    option("10th-pass", "10th pass / secondary", ConstraintSpec::Levels {
                        levels: vec![ProgramLevel::Diploma],
                    }),
                    option("12th-pass", "12th pass / higher secondary", ConstraintSpec::Levels {
                        levels: vec![ProgramLevel::Undergraduate],
                    }),
                    option("graduate", "Bachelor's degree holder", ConstraintSpec::Levels {
                        levels: vec![ProgramLevel::Postgraduate],
                    }),
                    option("postgraduate", "Master's degree holder", ConstraintSpec::Levels {
                        levels: vec![ProgramLevel::Doctoral],
                    }),
                ],
            },
            Question {
                step: 2,
                field: FieldKey::new("interest"),
                prompt: "Which field are you most interested in?".to_string(),
                options: vec![
                    option("engineering", "Engineering & Technology", ConstraintSpec::Categories {
                        keywords: keywords(&["engineering", "technology", "computer"]),
                    }),
                    option("business", "Business & Management", ConstraintSpec::Categories {
                        keywords: keywords(&["business", "management", "commerce"]),
                    }),
                    option("medical", "Medical & Health Sciences", ConstraintSpec::Categories {
                        keywords: keywords(&["medical", "nursing", "pharmacy", "health"]),
                    }),
                    option("arts", "Arts & Humanities", ConstraintSpec::Categories {
                        keywords: keywords(&["arts", "design", "humanities"]),
                    }),
                    option("science", "Science & Research", ConstraintSpec::Categories {
                        keywords: keywords(&["science", "research"]),
                    }),
                ],
            },
            Question {
                step: 3,
                field: FieldKey::new("budget"),
                prompt: "What is your annual fee budget?".to_string(),
                options: vec![
                    option("under-50k", "Up to 50,000", ConstraintSpec::FeeRange {
                        min: None,
                        max: Some(Decimal::new(50_000, 0)),
                    }),
                    option("50k-100k", "50,000 to 1,00,000", ConstraintSpec::FeeRange {
                        min: Some(Decimal::new(50_000, 0)),
                        max: Some(Decimal::new(100_000, 0)),
                    }),
                    option("100k-200k", "1,00,000 to 2,00,000", ConstraintSpec::FeeRange {
                        min: Some(Decimal::new(100_000, 0)),
                        max: Some(Decimal::new(200_000, 0)),
                    }),
                    option("above-200k", "Above 2,00,000", ConstraintSpec::FeeRange {
                        min: Some(Decimal::new(200_000, 0)),
                        max: None,
                    }),
                    option("no-limit", "No budget limit", ConstraintSpec::FeeRange {
                        min: None,
                        max: None,
                    }),
                ],
            },
            Question {
                step: 4,
                field: FieldKey::new("mode"),
                prompt: "How would you prefer to study?".to_string(),
                options: vec![
                    option("on-campus", "On campus", ConstraintSpec::Mode {
                        mode: ModeChoice::Only(DeliveryMode::OnCampus),
                    }),
                    option("online", "Online", ConstraintSpec::Mode {
                        mode: ModeChoice::Only(DeliveryMode::Online),
                    }),
                    option("hybrid", "Hybrid", ConstraintSpec::Mode {
                        mode: ModeChoice::Only(DeliveryMode::Hybrid),
                    }),
                    option("any", "No preference", ConstraintSpec::Mode { mode: ModeChoice::Any }),
                ],
            },
        ];

        Self::new(questions).expect("built-in schema must satisfy its own invariants")
    }
}

fn option(value: &str, label: &str, constraint: ConstraintSpec) -> QuestionOption {
    QuestionOption { value: value.to_string(), label: label.to_string(), constraint }
}

fn keywords(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|keyword| keyword.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::{ConstraintSpec, FieldKey, ModeChoice, Question, QuestionSchema, SchemaError};

    fn minimal_question(step: usize, field: &str) -> Question {
        Question {
            step,
            field: FieldKey::new(field),
            prompt: format!("prompt for {field}"),
            options: vec![super::option(format!("{field}-a").as_str(), "A", ConstraintSpec::None)],
        }
    }

    #[test]
    fn built_in_schema_is_valid_and_ordered() {
        let schema = QuestionSchema::built_in();

        assert_eq!(schema.total_steps(), 4);
        assert_eq!(schema.field_at(1), Some(&FieldKey::new("qualification")));
        assert_eq!(schema.field_at(4), Some(&FieldKey::new("mode")));
        assert!(schema.field_at(5).is_none());
        assert!(schema.field_at(0).is_none());
    }

    #[test]
    fn rejects_non_contiguous_steps() {
        let error = QuestionSchema::new(vec![minimal_question(1, "a"), minimal_question(3, "b")])
            .expect_err("step 3 after step 1 must be rejected");

        assert!(matches!(error, SchemaError::NonContiguousStep { expected: 2, found: 3 }));
    }

    #[test]
    fn rejects_duplicate_fields_and_duplicate_option_values() {
        let error = QuestionSchema::new(vec![minimal_question(1, "a"), minimal_question(2, "a")])
            .expect_err("duplicate field must be rejected");
        assert!(matches!(error, SchemaError::DuplicateField(ref field) if field == "a"));

        let mut question = minimal_question(1, "b");
        question.options.push(question.options[0].clone());
        let error = QuestionSchema::new(vec![question])
            .expect_err("duplicate option value must be rejected");
        assert!(matches!(error, SchemaError::DuplicateOptionValue { .. }));
    }

    #[test]
    fn rejects_empty_schema_and_empty_option_lists() {
        assert!(matches!(QuestionSchema::new(Vec::new()), Err(SchemaError::Empty)));

        let mut question = minimal_question(1, "a");
        question.options.clear();
        let error = QuestionSchema::new(vec![question]).expect_err("no options must be rejected");
        assert!(matches!(error, SchemaError::NoOptions { ref field } if field == "a"));
    }

    #[test]
    fn parses_schema_from_toml() {
        let schema = QuestionSchema::from_toml_str(
            r#"
[[questions]]
step = 1
field = "budget"
prompt = "What can you spend?"

[[questions.options]]
value = "low"
label = "Low"
constraint = { kind = "fee_range", max = "50000" }

[[questions.options]]
value = "open"
label = "Open"

[[questions]]
step = 2
field = "mode"
prompt = "How do you want to study?"

[[questions.options]]
value = "online"
label = "Online"
constraint = { kind = "mode", mode = "online" }

[[questions.options]]
value = "any"
label = "No preference"
constraint = { kind = "mode", mode = "any" }
"#,
        )
        .expect("schema toml should parse");

        assert_eq!(schema.total_steps(), 2);
        let open = schema
            .find_option(&FieldKey::new("budget"), "open")
            .expect("open option should exist");
        assert_eq!(open.constraint, ConstraintSpec::None);
        let any = schema
            .find_option(&FieldKey::new("mode"), "any")
            .expect("any option should exist");
        assert_eq!(any.constraint, ConstraintSpec::Mode { mode: ModeChoice::Any });
    }

    #[test]
    fn rejects_unknown_mode_choice_in_toml() {
        let error = QuestionSchema::from_toml_str(
            r#"
[[questions]]
step = 1
field = "mode"
prompt = "How?"

[[questions.options]]
value = "x"
label = "X"
constraint = { kind = "mode", mode = "correspondence" }
"#,
        )
        .expect_err("unknown mode must fail to parse");

        assert!(matches!(error, SchemaError::Parse(_)));
    }
}
