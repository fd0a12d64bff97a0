pub mod check;
pub mod presentation;
pub mod state;
pub mod validate;

pub use check::{
    CheckRequest, CheckResponse, DEFAULT_NUM_SOURCES, HealthStatus, InputType, Reference,
    TrustedSources, Verdict, VerdictCode,
};
pub use presentation::{Presentation, Theme, present};
pub use state::{Failure, FailureKind, PENDING_PROGRESS_CEILING, Phase, ViewState};
pub use validate::{ValidationError, build_request};
