use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::FieldKey;

/// Wizard position. `AtStep` is 1-based and always within `1..=N` for a
/// schema of N questions; `Completed` and `Cancelled` are terminal until a
/// reset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardState {
    AtStep(usize),
    Completed,
    Cancelled,
}

impl WizardState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardEvent {
    OptionSelected { field: FieldKey, value: String },
    BackRequested,
    SubmitRequested,
    ResetRequested,
    CancelRequested,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardAction {
    RecordAnswer { field: FieldKey, value: String },
    ClearAnswers,
    DeriveConstraints,
}

/// Lifecycle signal for the presenter. Scroll locking, escape-key
/// listeners, and similar host effects hang off these values outside the
/// core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardSignal {
    Opened,
    Closed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: WizardState,
    pub to: WizardState,
    pub event: WizardEvent,
    pub actions: Vec<WizardAction>,
}

/// Snapshot of the facts the pure transition relation needs from the
/// controller: schema length, the field the current step expects, whether
/// the selected option exists, and whether the final step already has an
/// answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WizardContext {
    pub total_steps: usize,
    pub expected_field: Option<FieldKey>,
    pub option_known: bool,
    pub final_step_answered: bool,
}

/// Collected answers, at most one per field. Only fields the schema asks
/// about ever get recorded; the controller enforces that through its
/// transition validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AnswerSet {
    entries: BTreeMap<FieldKey, String>,
}

impl AnswerSet {
    pub fn record(&mut self, field: FieldKey, value: String) {
        self.entries.insert(field, value);
    }

    pub fn value_of(&self, field: &FieldKey) -> Option<&str> {
        self.entries.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &FieldKey) -> bool {
        self.entries.contains_key(field)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &str)> {
        self.entries.iter().map(|(field, value)| (field, value.as_str()))
    }
}
