//! Transient view-state for one check form.
//!
//! Holds what a renderer needs: the input, the loading flag, a cosmetic
//! progress value, and either a result or an error (never both).
//!
//! Phases: `Idle → Submitting → (Succeeded | Failed)`, back to `Submitting`
//! on the next submission. A local validation failure jumps straight to
//! `Failed`; an abandoned submission goes back to `Idle`.

use tracing::debug;

use crate::check::{CheckResponse, InputType};
use crate::validate::ValidationError;

/// Highest progress shown while a request is still pending.
pub const PENDING_PROGRESS_CEILING: u8 = 90;

/// Shown when the service reports `success: false` without a message.
pub const DEFAULT_REJECTION_MESSAGE: &str = "The service could not check this content.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

/// Which of the three error paths produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Input rejected locally; no request was sent.
    Validation,
    /// The service answered `success: false`.
    Rejected,
    /// Network failure or non-2xx status.
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for Failure {
    fn from(err: ValidationError) -> Self {
        Self::new(FailureKind::Validation, err.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub input_type: InputType,
    pub content: String,
    phase: Phase,
    progress: u8,
    result: Option<CheckResponse>,
    error: Option<Failure>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Cosmetic progress in percent.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn result(&self) -> Option<&CheckResponse> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&Failure> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|f| f.message.as_str())
    }

    /// Switch input mode. Clears nothing else.
    pub fn set_input_type(&mut self, input_type: InputType) {
        self.input_type = input_type;
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Enter `Submitting`: drop any previous result and error, reset progress.
    pub fn begin(&mut self) {
        self.result = None;
        self.error = None;
        self.progress = 0;
        self.transition(Phase::Submitting);
    }

    /// Update the simulated progress. Ignored unless a submission is pending;
    /// capped at [`PENDING_PROGRESS_CEILING`] so only [`complete`](Self::complete) reaches 100.
    pub fn set_progress(&mut self, percent: u8) {
        if self.is_loading() {
            self.progress = percent.min(PENDING_PROGRESS_CEILING);
        }
    }

    /// Abandon a pending submission without a result or an error.
    pub fn cancel(&mut self) {
        if self.is_loading() {
            self.progress = 0;
            self.transition(Phase::Idle);
        }
    }

    /// Apply a decoded 2xx response.
    ///
    /// `success: true` stores the result and completes progress;
    /// `success: false` becomes a [`FailureKind::Rejected`] error.
    pub fn complete(&mut self, response: CheckResponse) {
        if response.success {
            self.error = None;
            self.result = Some(response);
            self.progress = 100;
            self.transition(Phase::Succeeded);
        } else {
            let message = response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string());
            self.fail(Failure::new(FailureKind::Rejected, message));
        }
    }

    /// Record a failure. Any previous result is dropped.
    pub fn fail(&mut self, failure: Failure) {
        self.result = None;
        self.progress = 0;
        self.error = Some(failure);
        self.transition(Phase::Failed);
    }

    fn transition(&mut self, next: Phase) {
        debug!(from = self.phase.as_str(), to = next.as_str(), "view-state transition");
        self.phase = next;
    }
}
