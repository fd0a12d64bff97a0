//! Submission handler: validate, send one request, fold the outcome into view-state.

use newscheck_core::{
    DEFAULT_NUM_SOURCES, Failure, FailureKind, InputType, ValidationError, ViewState,
    build_request,
};
use newscheck_core::validate::validate_num_sources;
use tracing::{info, warn};

use crate::api::CheckApi;
use crate::progress::ProgressSimulator;

/// Settles the view-state if the submit future is dropped mid-request.
struct InFlight<'a> {
    state: &'a mut ViewState,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.state.is_loading() {
            warn!("check cancelled before the service answered");
            self.state.cancel();
        }
    }
}

/// One check form bound to a service.
///
/// `submit` borrows the session mutably, so a session never has two requests
/// in flight. Dropping the `submit` future cancels the request and returns
/// the view-state to `Idle`.
pub struct Session<A> {
    api: A,
    state: ViewState,
    num_sources: u8,
    progress: ProgressSimulator,
}

impl<A: CheckApi> Session<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: ViewState::new(),
            num_sources: DEFAULT_NUM_SOURCES,
            progress: ProgressSimulator::new(),
        }
    }

    /// Request a different number of reference sources (1..=10).
    pub fn with_num_sources(mut self, num_sources: u8) -> Result<Self, ValidationError> {
        self.num_sources = validate_num_sources(num_sources)?;
        Ok(self)
    }

    pub fn with_progress(mut self, progress: ProgressSimulator) -> Self {
        self.progress = progress;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn set_input_type(&mut self, input_type: InputType) {
        self.state.set_input_type(input_type);
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.state.set_content(content);
    }

    pub async fn submit(&mut self) -> &ViewState {
        self.submit_with(|_| {}).await
    }

    /// Submit the current input, reporting each simulated progress value to `on_progress`.
    ///
    /// Blank input fails locally without touching the network. Progress ticks
    /// stop as soon as the request settles.
    pub async fn submit_with<F>(&mut self, mut on_progress: F) -> &ViewState
    where
        F: FnMut(u8),
    {
        let request = match build_request(
            &self.state.content,
            self.state.input_type,
            self.num_sources,
        ) {
            Ok(req) => req,
            Err(err) => {
                info!(error = %err, "input rejected locally");
                self.state.fail(err.into());
                return &self.state;
            }
        };

        self.state.begin();
        self.progress.reset();
        on_progress(0);

        let pending = InFlight {
            state: &mut self.state,
        };
        let outcome = {
            let call = self.api.check(&request);
            tokio::pin!(call);
            let mut ticker = tokio::time::interval(self.progress.tick());
            // First tick of an interval fires immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    res = &mut call => break res,
                    _ = ticker.tick() => {
                        let p = self.progress.advance();
                        pending.state.set_progress(p);
                        on_progress(p);
                    }
                }
            }
        };

        match outcome {
            Ok(response) => {
                pending.state.complete(response);
            }
            Err(err) => {
                warn!(error = %err, "check failed");
                pending
                    .state
                    .fail(Failure::new(FailureKind::Transport, err.user_message()));
            }
        }
        drop(pending);
        on_progress(self.state.progress());
        &self.state
    }
}
