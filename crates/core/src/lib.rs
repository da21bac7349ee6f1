pub mod audit;
pub mod catalog;
pub mod config;
pub mod derive;
pub mod domain;
pub mod errors;
pub mod matching;
pub mod schema;
pub mod session;
pub mod wizard;

pub use audit::{AuditCategory, AuditEvent, AuditOutcome, AuditSink, InMemoryAuditSink};
pub use catalog::{Candidate, CatalogError, CatalogSource, Snapshot};
pub use derive::{derive, Constraint, Derivation, Predicate, SkipReason, SkippedAnswer};
pub use domain::program::{
    DeliveryMode, Program, ProgramId, ProgramLevel, University, UniversityId,
};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use matching::{filter, rank, MatchOutcome, SHORTLIST_LIMIT};
pub use schema::{
    ConstraintSpec, FieldKey, ModeChoice, Question, QuestionOption, QuestionSchema, SchemaError,
};
pub use session::{Recommendation, RecommendError, RecommendationSession, SessionId};
pub use wizard::{
    transition, AnswerSet, TransitionOutcome, WizardAction, WizardContext, WizardController,
    WizardEvent, WizardSignal, WizardState, WizardTransitionError,
};
