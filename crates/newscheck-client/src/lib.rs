//! Client layer: HTTP transport to the detection service, simulated progress, and the submission session.

pub mod api;
pub mod http;
pub mod progress;
pub mod session;

pub use api::CheckApi;
pub use http::{CheckClient, ClientError, GENERIC_ERROR_MESSAGE};
pub use progress::ProgressSimulator;
pub use session::Session;
