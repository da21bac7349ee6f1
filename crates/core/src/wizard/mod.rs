pub mod engine;
pub mod states;

pub use engine::{transition, WizardController, WizardTransitionError};
pub use states::{
    AnswerSet, TransitionOutcome, WizardAction, WizardContext, WizardEvent, WizardSignal,
    WizardState,
};
