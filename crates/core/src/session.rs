use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::audit::{AuditCategory, AuditEvent, AuditOutcome, AuditSink};
use crate::catalog::{CatalogError, CatalogSource, Snapshot};
use crate::derive::{derive, SkippedAnswer};
use crate::matching::{filter, rank, MatchOutcome};
use crate::schema::{FieldKey, QuestionSchema};
use crate::wizard::engine::{WizardController, WizardTransitionError};
use crate::wizard::states::{AnswerSet, TransitionOutcome, WizardSignal, WizardState};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecommendError {
    #[error("recommendation requested while the wizard is in {state:?}")]
    FlowIncomplete { state: WizardState },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("the wizard was reset or cancelled while the catalog fetch was in flight")]
    SessionInvalidated,
}

/// Presenter payload for one completed run: the ranked outcome plus the
/// answers that derived no predicate, for caller-side logging.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
    pub outcome: MatchOutcome,
    pub skipped: Vec<SkippedAnswer>,
}

/// One user's wizard run wired to a catalog source and an audit sink.
/// Single-threaded by construction; the catalog fetch is the only suspend
/// point, and a per-run token keeps stale fetches from committing.
pub struct RecommendationSession<C> {
    id: SessionId,
    controller: WizardController,
    source: C,
    sink: Arc<dyn AuditSink>,
}

impl<C> RecommendationSession<C>
where
    C: CatalogSource,
{
    pub fn new(schema: Arc<QuestionSchema>, source: C, sink: Arc<dyn AuditSink>) -> Self {
        Self { id: SessionId::generate(), controller: WizardController::new(schema), source, sink }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> &WizardState {
        self.controller.state()
    }

    pub fn progress(&self) -> Option<(usize, usize)> {
        self.controller.progress()
    }

    pub fn signal(&self) -> WizardSignal {
        self.controller.signal()
    }

    pub fn answers(&self) -> &AnswerSet {
        self.controller.answers()
    }

    pub fn schema(&self) -> &QuestionSchema {
        self.controller.schema()
    }

    pub fn run_token(&self) -> Uuid {
        self.controller.run_token()
    }

    pub fn select_option(
        &mut self,
        field: FieldKey,
        value: impl Into<String>,
    ) -> Result<TransitionOutcome, WizardTransitionError> {
        let result = self.controller.select_option(field, value);
        self.audit_transition(&result);
        result
    }

    pub fn back(&mut self) -> Result<TransitionOutcome, WizardTransitionError> {
        let result = self.controller.back();
        self.audit_transition(&result);
        result
    }

    pub fn submit(&mut self) -> Result<TransitionOutcome, WizardTransitionError> {
        let result = self.controller.submit();
        self.audit_transition(&result);
        result
    }

    pub fn reset(&mut self) -> Result<TransitionOutcome, WizardTransitionError> {
        let result = self.controller.reset();
        self.audit_transition(&result);
        result
    }

    pub fn cancel(&mut self) -> Result<TransitionOutcome, WizardTransitionError> {
        let result = self.controller.cancel();
        self.audit_transition(&result);
        result
    }

    /// Fetches a snapshot and completes the run. Requires a `Completed`
    /// flow; an unfinished wizard never triggers a fetch.
    pub async fn recommend(&self) -> Result<Recommendation, RecommendError> {
        if self.controller.state() != &WizardState::Completed {
            return Err(RecommendError::FlowIncomplete {
                state: self.controller.state().clone(),
            });
        }

        let token = self.controller.run_token();
        let snapshot = match self.source.fetch().await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                self.emit(
                    "catalog.fetch_failed",
                    AuditCategory::Catalog,
                    AuditOutcome::Failed,
                    &[("reason", error.to_string())],
                );
                return Err(RecommendError::Catalog(error));
            }
        };

        self.complete_with_snapshot(token, snapshot)
    }

    /// Commit half of the split-phase run, for presenters that fetch the
    /// snapshot themselves. `token` must be the run token captured when the
    /// fetch was started; `reset()`/`cancel()` rotate it, so a snapshot for
    /// an abandoned run is rejected instead of applied.
    pub fn complete_with_snapshot(
        &self,
        token: Uuid,
        snapshot: Snapshot,
    ) -> Result<Recommendation, RecommendError> {
        if token != self.controller.run_token() {
            self.emit(
                "catalog.snapshot_stale",
                AuditCategory::Catalog,
                AuditOutcome::Rejected,
                &[("token", token.to_string())],
            );
            return Err(RecommendError::SessionInvalidated);
        }
        if self.controller.state() != &WizardState::Completed {
            return Err(RecommendError::FlowIncomplete {
                state: self.controller.state().clone(),
            });
        }

        let derivation = derive(self.controller.answers(), self.controller.schema());
        self.emit(
            "derive.constraints_derived",
            AuditCategory::Derivation,
            AuditOutcome::Success,
            &[
                ("predicates", derivation.predicates.len().to_string()),
                ("skipped", derivation.skipped.len().to_string()),
            ],
        );

        let candidates = snapshot.candidates();
        let survivors = filter(&candidates, &derivation.predicates);
        let outcome = rank(survivors, snapshot.len());
        match &outcome {
            MatchOutcome::Shortlist { entries } => self.emit(
                "match.shortlist_produced",
                AuditCategory::Matching,
                AuditOutcome::Success,
                &[("entries", entries.len().to_string())],
            ),
            MatchOutcome::NoMatch { catalog_size } => self.emit(
                "match.no_match",
                AuditCategory::Matching,
                AuditOutcome::Success,
                &[("catalog_size", catalog_size.to_string())],
            ),
        }

        Ok(Recommendation { outcome, skipped: derivation.skipped })
    }

    fn audit_transition(&self, result: &Result<TransitionOutcome, WizardTransitionError>) {
        match result {
            Ok(outcome) => self.emit(
                "wizard.transition_applied",
                AuditCategory::Wizard,
                AuditOutcome::Success,
                &[
                    ("from", format!("{:?}", outcome.from)),
                    ("to", format!("{:?}", outcome.to)),
                    ("event", format!("{:?}", outcome.event)),
                ],
            ),
            Err(error) => self.emit(
                "wizard.transition_rejected",
                AuditCategory::Wizard,
                AuditOutcome::Rejected,
                &[("error", error.to_string())],
            ),
        }
    }

    fn emit(
        &self,
        event_type: &str,
        category: AuditCategory,
        outcome: AuditOutcome,
        metadata: &[(&str, String)],
    ) {
        let mut event = AuditEvent::new(
            Some(self.id.clone()),
            self.id.to_string(),
            event_type,
            category,
            "recommendation-session",
            outcome,
        );
        for (key, value) in metadata {
            event = event.with_metadata(*key, value.clone());
        }
        self.sink.emit(event);
    }
}
