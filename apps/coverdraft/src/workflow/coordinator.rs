//! Generation Coordinator: the synchronous core of the workflow state machine.
//!
//! Every method is one discrete event processed to completion. Nothing here
//! awaits: the async driver (`session.rs`) takes a `GenerationRequest` out,
//! performs the remote calls without holding the lock, and feeds the outcome
//! back through `complete_submit`.
//!
//! Phases: Idle → Submitting → Succeeded | Failed, and every phase accepts a new
//! submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::DocumentFields;
use crate::workflow::form::{FormInput, FormUpdate, GenerationRequest, MISSING_FIELDS_MESSAGE};
use crate::workflow::notifications::{ExportKind, Notifications, NotificationsView};
use crate::workflow::reference::ReferenceStatus;

const REFERENCE_LOADING_MESSAGE: &str =
    "CV data is still loading. Please wait a moment and try again.";

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// The two independent error channels. An error in one never clears or blocks the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDomain {
    Reference,
    Generation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct WorkflowError {
    pub domain: ErrorDomain,
    pub message: String,
}

impl WorkflowError {
    pub fn reference(message: impl Into<String>) -> Self {
        Self {
            domain: ErrorDomain::Reference,
            message: message.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self {
            domain: ErrorDomain::Generation,
            message: message.into(),
        }
    }
}

/// The latest successfully generated text. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedOutput {
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

/// Work the driver must hand to an export adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportJob {
    Copy(String),
    Document(DocumentFields),
}

impl ExportJob {
    pub fn kind(&self) -> ExportKind {
        match self {
            ExportJob::Copy(_) => ExportKind::Copy,
            ExportJob::Document(_) => ExportKind::Document,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorsView {
    pub reference: Option<String>,
    pub generation: Option<String>,
}

/// Read-only view of the whole workflow handed to the presenting layer.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSnapshot {
    pub form: FormInput,
    pub reference: ReferenceStatus,
    pub phase: GenerationPhase,
    pub generated: Option<GeneratedOutput>,
    pub editable_output: Option<String>,
    pub errors: ErrorsView,
    pub notifications: NotificationsView,
    /// False while a request is in flight or the CV is not available; the
    /// presenting layer disables its trigger on this.
    pub can_submit: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Coordinator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Coordinator {
    form: FormInput,
    reference: ReferenceStatus,
    phase: GenerationPhase,
    generated: Option<GeneratedOutput>,
    editable: Option<String>,
    reference_error: Option<WorkflowError>,
    generation_error: Option<WorkflowError>,
    notifications: Notifications,
    last_sequence: u64,
    /// Sequence of the newest submission still awaiting its outcome.
    in_flight: Option<u64>,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            form: FormInput::default(),
            reference: ReferenceStatus::Loading,
            phase: GenerationPhase::Idle,
            generated: None,
            editable: None,
            reference_error: None,
            generation_error: None,
            notifications: Notifications::default(),
            last_sequence: 0,
            in_flight: None,
        }
    }

    pub fn update_form(&mut self, update: FormUpdate) {
        self.form.apply(update);
    }

    /// Records the loader's result. Ignored once the status has left `Loading`.
    pub fn resolve_reference(&mut self, status: ReferenceStatus) -> bool {
        if !self.reference.is_loading() || status.is_loading() {
            return false;
        }

        self.reference_error = match &status {
            ReferenceStatus::Unavailable(reason) => Some(WorkflowError::reference(reason.clone())),
            _ => None,
        };
        self.reference = status;
        true
    }

    /// Submit transition, first half.
    ///
    /// Guard order: required fields, then reference availability. A failed guard
    /// records a generation-domain error and leaves the phase alone.
    pub fn begin_submit(&mut self) -> Result<GenerationRequest, WorkflowError> {
        if let Err(e) = self.check_submit_guard() {
            self.generation_error = Some(e.clone());
            return Err(e);
        }

        self.last_sequence += 1;
        let request = GenerationRequest::new(self.last_sequence, &self.form);

        self.in_flight = Some(request.sequence());
        self.phase = GenerationPhase::Submitting;
        self.generation_error = None;

        Ok(request)
    }

    /// Submit transition, second half. Outcomes from superseded submissions are
    /// discarded; returns whether this outcome was applied.
    ///
    /// A failure keeps whatever output was produced earlier, edits included.
    pub fn complete_submit(&mut self, sequence: u64, outcome: Result<String, String>) -> bool {
        if self.in_flight != Some(sequence) {
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(text) => {
                self.editable = Some(text.clone());
                self.generated = Some(GeneratedOutput {
                    text,
                    generated_at: Utc::now(),
                });
                self.phase = GenerationPhase::Succeeded;
            }
            Err(message) => {
                self.generation_error = Some(WorkflowError::generation(message));
                self.phase = GenerationPhase::Failed;
            }
        }
        true
    }

    /// Replaces the editable output verbatim. Rejected until something has been generated.
    pub fn edit_output(&mut self, text: String) -> bool {
        match self.editable.as_mut() {
            Some(editable) => {
                *editable = text;
                true
            }
            None => false,
        }
    }

    /// Export guard: `None` when there is nothing (or only whitespace) to export.
    pub fn export_job(&self, kind: ExportKind) -> Option<ExportJob> {
        let content = self.editable.as_deref().filter(|t| !t.trim().is_empty())?;

        Some(match kind {
            ExportKind::Copy => ExportJob::Copy(content.to_string()),
            ExportKind::Document => ExportJob::Document(DocumentFields {
                position: self.form.position.clone(),
                company_name: self.form.company_name.clone(),
                content: content.to_string(),
            }),
        })
    }

    pub fn raise_notification(&mut self, kind: ExportKind) -> u64 {
        self.notifications.raise(kind)
    }

    pub fn expire_notification(&mut self, kind: ExportKind, ticket: u64) -> bool {
        self.notifications.expire(kind, ticket)
    }

    pub fn dismiss_error(&mut self, domain: ErrorDomain) {
        match domain {
            ErrorDomain::Reference => self.reference_error = None,
            ErrorDomain::Generation => self.generation_error = None,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.phase != GenerationPhase::Submitting && self.reference.is_available()
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            form: self.form.clone(),
            reference: self.reference.clone(),
            phase: self.phase,
            generated: self.generated.clone(),
            editable_output: self.editable.clone(),
            errors: ErrorsView {
                reference: self.reference_error.as_ref().map(|e| e.message.clone()),
                generation: self.generation_error.as_ref().map(|e| e.message.clone()),
            },
            notifications: self.notifications.view(),
            can_submit: self.can_submit(),
        }
    }

    fn check_submit_guard(&self) -> Result<(), WorkflowError> {
        if !self.form.is_complete() {
            return Err(WorkflowError::generation(MISSING_FIELDS_MESSAGE));
        }

        match &self.reference {
            ReferenceStatus::Available => Ok(()),
            ReferenceStatus::Loading => Err(WorkflowError::generation(REFERENCE_LOADING_MESSAGE)),
            ReferenceStatus::Unavailable(reason) => Err(WorkflowError::generation(format!(
                "CV data is not available ({reason}). Please refresh the page or contact support."
            ))),
        }
    }
}

// Inspection used by the state-machine tests; the service reads snapshots.
#[cfg(test)]
impl Coordinator {
    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    pub fn reference(&self) -> &ReferenceStatus {
        &self.reference
    }

    pub fn editable_output(&self) -> Option<&str> {
        self.editable.as_deref()
    }

    pub fn generated(&self) -> Option<&GeneratedOutput> {
        self.generated.as_ref()
    }

    pub fn error(&self, domain: ErrorDomain) -> Option<&WorkflowError> {
        match domain {
            ErrorDomain::Reference => self.reference_error.as_ref(),
            ErrorDomain::Generation => self.generation_error.as_ref(),
        }
    }
}
