use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::schema::{FieldKey, QuestionSchema};
use crate::wizard::states::{
    AnswerSet, TransitionOutcome, WizardAction, WizardContext, WizardEvent, WizardSignal,
    WizardState,
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WizardTransitionError {
    #[error("invalid transition from {state:?} using event {event:?}")]
    InvalidTransition { state: WizardState, event: WizardEvent },
    #[error("option selected for field `{got}` but the current step expects `{expected}`")]
    FieldMismatch { expected: FieldKey, got: FieldKey },
    #[error("unknown option value `{value}` for field `{field}`")]
    UnknownOption { field: FieldKey, value: String },
    #[error("cannot submit: the final step has no recorded answer")]
    FinalStepUnanswered,
}

/// Pure transition relation for the wizard. Total over every
/// (state, event) pair: valid pairs produce an outcome, everything else a
/// typed rejection. The caller owns applying the outcome's actions.
pub fn transition(
    current: &WizardState,
    event: &WizardEvent,
    context: &WizardContext,
) -> Result<TransitionOutcome, WizardTransitionError> {
    use WizardEvent::{
        BackRequested, CancelRequested, OptionSelected, ResetRequested, SubmitRequested,
    };
    use WizardState::{AtStep, Cancelled, Completed};

    let (to, actions) = match (current, event) {
        (AtStep(step), OptionSelected { field, value }) => {
            let expected = context.expected_field.as_ref().ok_or_else(|| {
                WizardTransitionError::InvalidTransition {
                    state: current.clone(),
                    event: event.clone(),
                }
            })?;
            if expected != field {
                return Err(WizardTransitionError::FieldMismatch {
                    expected: expected.clone(),
                    got: field.clone(),
                });
            }
            if !context.option_known {
                return Err(WizardTransitionError::UnknownOption {
                    field: field.clone(),
                    value: value.clone(),
                });
            }

            // The final step records its answer in place; submit is explicit.
            let next =
                if *step < context.total_steps { AtStep(step + 1) } else { AtStep(*step) };
            (next, vec![WizardAction::RecordAnswer {
                field: field.clone(),
                value: value.clone(),
            }])
        }
        (AtStep(step), BackRequested) if *step > 1 => (AtStep(step - 1), Vec::new()),
        (AtStep(step), SubmitRequested) if *step == context.total_steps => {
            if !context.final_step_answered {
                return Err(WizardTransitionError::FinalStepUnanswered);
            }
            (Completed, vec![WizardAction::DeriveConstraints])
        }
        (_, ResetRequested) => (AtStep(1), vec![WizardAction::ClearAnswers]),
        (_, CancelRequested) => (Cancelled, Vec::new()),
        _ => {
            return Err(WizardTransitionError::InvalidTransition {
                state: current.clone(),
                event: event.clone(),
            });
        }
    };

    Ok(TransitionOutcome { from: current.clone(), to, event: event.clone(), actions })
}

/// Stateful wizard over a shared schema. Rejected transitions leave the
/// controller untouched, so callers may drop the `Err` to get plain no-op
/// semantics.
pub struct WizardController {
    schema: Arc<QuestionSchema>,
    state: WizardState,
    answers: AnswerSet,
    run_token: Uuid,
}

impl WizardController {
    pub fn new(schema: Arc<QuestionSchema>) -> Self {
        Self {
            schema,
            state: WizardState::AtStep(1),
            answers: AnswerSet::default(),
            run_token: Uuid::new_v4(),
        }
    }

    pub fn schema(&self) -> &QuestionSchema {
        &self.schema
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Token identifying the current run. Rotated by `reset` and `cancel`
    /// so in-flight catalog fetches for an abandoned run can be detected.
    pub fn run_token(&self) -> Uuid {
        self.run_token
    }

    pub fn signal(&self) -> WizardSignal {
        match self.state {
            WizardState::Cancelled => WizardSignal::Closed,
            _ => WizardSignal::Opened,
        }
    }

    /// `(step, total)` for progress display; `None` once cancelled.
    pub fn progress(&self) -> Option<(usize, usize)> {
        let total = self.schema.total_steps();
        match self.state {
            WizardState::AtStep(step) => Some((step, total)),
            WizardState::Completed => Some((total, total)),
            WizardState::Cancelled => None,
        }
    }

    pub fn select_option(
        &mut self,
        field: FieldKey,
        value: impl Into<String>,
    ) -> Result<TransitionOutcome, WizardTransitionError> {
        self.apply(WizardEvent::OptionSelected { field, value: value.into() })
    }

    pub fn back(&mut self) -> Result<TransitionOutcome, WizardTransitionError> {
        self.apply(WizardEvent::BackRequested)
    }

    pub fn submit(&mut self) -> Result<TransitionOutcome, WizardTransitionError> {
        self.apply(WizardEvent::SubmitRequested)
    }

    pub fn reset(&mut self) -> Result<TransitionOutcome, WizardTransitionError> {
        self.apply(WizardEvent::ResetRequested)
    }

    pub fn cancel(&mut self) -> Result<TransitionOutcome, WizardTransitionError> {
        self.apply(WizardEvent::CancelRequested)
    }

    fn context_for(&self, event: &WizardEvent) -> WizardContext {
        let expected_field = match self.state {
            WizardState::AtStep(step) => self.schema.field_at(step).cloned(),
            _ => None,
        };
        let option_known = match event {
            WizardEvent::OptionSelected { field, value } => {
                self.schema.find_option(field, value).is_some()
            }
            _ => false,
        };
        let final_step_answered = self
            .schema
            .field_at(self.schema.total_steps())
            .map(|field| self.answers.contains(field))
            .unwrap_or(false);

        WizardContext {
            total_steps: self.schema.total_steps(),
            expected_field,
            option_known,
            final_step_answered,
        }
    }

    fn apply(&mut self, event: WizardEvent) -> Result<TransitionOutcome, WizardTransitionError> {
        let context = self.context_for(&event);
        let outcome = transition(&self.state, &event, &context)?;

        for action in &outcome.actions {
            match action {
                WizardAction::RecordAnswer { field, value } => {
                    self.answers.record(field.clone(), value.clone());
                }
                WizardAction::ClearAnswers => self.answers.clear(),
                // Derivation runs at the session layer, off this action.
                WizardAction::DeriveConstraints => {}
            }
        }
        self.state = outcome.to.clone();
        if matches!(
            outcome.event,
            WizardEvent::ResetRequested | WizardEvent::CancelRequested
        ) {
            self.run_token = Uuid::new_v4();
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::schema::{FieldKey, QuestionSchema};
    use crate::wizard::engine::{WizardController, WizardTransitionError};
    use crate::wizard::states::{WizardAction, WizardSignal, WizardState};

    fn controller() -> WizardController {
        WizardController::new(Arc::new(QuestionSchema::built_in()))
    }

    fn answer_all(controller: &mut WizardController) {
        controller
            .select_option(FieldKey::new("qualification"), "12th-pass")
            .expect("step 1 selection");
        controller.select_option(FieldKey::new("interest"), "engineering").expect("step 2");
        controller.select_option(FieldKey::new("budget"), "50k-100k").expect("step 3");
        controller.select_option(FieldKey::new("mode"), "any").expect("step 4");
    }

    #[test]
    fn happy_path_walks_every_step_then_completes() {
        let mut controller = controller();
        assert_eq!(controller.state(), &WizardState::AtStep(1));

        answer_all(&mut controller);
        // Final selection stays on the last step until an explicit submit.
        assert_eq!(controller.state(), &WizardState::AtStep(4));
        assert_eq!(controller.answers().len(), 4);

        let outcome = controller.submit().expect("submit after final answer");
        assert_eq!(outcome.to, WizardState::Completed);
        assert!(outcome.actions.contains(&WizardAction::DeriveConstraints));
        assert_eq!(controller.progress(), Some((4, 4)));
    }

    #[test]
    fn back_at_step_one_is_a_rejected_no_op() {
        let mut controller = controller();
        let error = controller.back().expect_err("back at step 1 must be rejected");

        assert!(matches!(error, WizardTransitionError::InvalidTransition { .. }));
        assert_eq!(controller.state(), &WizardState::AtStep(1));
    }

    #[test]
    fn back_keeps_the_answer_for_the_step_being_left() {
        let mut controller = controller();
        controller.select_option(FieldKey::new("qualification"), "graduate").expect("step 1");
        controller.back().expect("step 2 -> step 1");

        assert_eq!(controller.state(), &WizardState::AtStep(1));
        assert_eq!(
            controller.answers().value_of(&FieldKey::new("qualification")),
            Some("graduate")
        );
    }

    #[test]
    fn selection_for_a_field_not_at_the_current_step_is_rejected() {
        let mut controller = controller();
        let error = controller
            .select_option(FieldKey::new("mode"), "online")
            .expect_err("mode belongs to step 4");

        assert!(matches!(error, WizardTransitionError::FieldMismatch { .. }));
        assert_eq!(controller.state(), &WizardState::AtStep(1));
        assert!(controller.answers().is_empty());
    }

    #[test]
    fn unknown_option_values_are_rejected() {
        let mut controller = controller();
        let error = controller
            .select_option(FieldKey::new("qualification"), "phd")
            .expect_err("phd is not a qualification option");

        assert!(matches!(error, WizardTransitionError::UnknownOption { .. }));
        assert!(controller.answers().is_empty());
    }

    #[test]
    fn submit_requires_the_final_step_to_be_answered() {
        let mut controller = controller();
        controller.select_option(FieldKey::new("qualification"), "12th-pass").expect("step 1");
        controller.select_option(FieldKey::new("interest"), "science").expect("step 2");
        controller.select_option(FieldKey::new("budget"), "under-50k").expect("step 3");

        let error = controller.submit().expect_err("final step is unanswered");
        assert!(matches!(error, WizardTransitionError::FinalStepUnanswered));
        assert_eq!(controller.state(), &WizardState::AtStep(4));
    }

    #[test]
    fn submit_before_the_final_step_is_rejected() {
        let mut controller = controller();
        controller.select_option(FieldKey::new("qualification"), "12th-pass").expect("step 1");

        let error = controller.submit().expect_err("submit at step 2 must be rejected");
        assert!(matches!(error, WizardTransitionError::InvalidTransition { .. }));
    }

    #[test]
    fn reset_returns_to_step_one_with_empty_answers_and_a_fresh_token() {
        let mut controller = controller();
        answer_all(&mut controller);
        controller.submit().expect("completes");
        let token_before = controller.run_token();

        controller.reset().expect("reset from completed");
        assert_eq!(controller.state(), &WizardState::AtStep(1));
        assert!(controller.answers().is_empty());
        assert_ne!(controller.run_token(), token_before);

        // Idempotent.
        controller.reset().expect("reset from step 1");
        assert_eq!(controller.state(), &WizardState::AtStep(1));
        assert!(controller.answers().is_empty());
    }

    #[test]
    fn cancel_is_terminal_and_flips_the_presenter_signal() {
        let mut controller = controller();
        assert_eq!(controller.signal(), WizardSignal::Opened);

        controller.cancel().expect("cancel from step 1");
        assert_eq!(controller.state(), &WizardState::Cancelled);
        assert_eq!(controller.signal(), WizardSignal::Closed);
        assert_eq!(controller.progress(), None);

        let error = controller
            .select_option(FieldKey::new("qualification"), "12th-pass")
            .expect_err("cancelled wizard accepts no selections");
        assert!(matches!(error, WizardTransitionError::InvalidTransition { .. }));

        controller.reset().expect("reset revives a cancelled wizard");
        assert_eq!(controller.state(), &WizardState::AtStep(1));
    }

    #[test]
    fn replay_of_the_same_event_sequence_is_deterministic() {
        let run = || {
            let mut controller = controller();
            answer_all(&mut controller);
            controller.back().expect("back to step 3");
            controller
                .select_option(FieldKey::new("budget"), "100k-200k")
                .expect("revised budget");
            controller.submit().expect("completes");
            (controller.state().clone(), controller.answers().clone())
        };

        assert_eq!(run(), run());
    }
}
