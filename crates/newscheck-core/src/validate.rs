//! Local checks run before anything goes over the wire.

use thiserror::Error;

use crate::check::{CheckRequest, InputType, MAX_NUM_SOURCES, MIN_NUM_SOURCES};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter some text or a URL to check.")]
    EmptyContent,

    #[error("num_sources must be between 1 and 10, got {0}")]
    NumSourcesOutOfRange(u8),
}

pub fn validate_num_sources(num_sources: u8) -> Result<u8, ValidationError> {
    if (MIN_NUM_SOURCES..=MAX_NUM_SOURCES).contains(&num_sources) {
        Ok(num_sources)
    } else {
        Err(ValidationError::NumSourcesOutOfRange(num_sources))
    }
}

/// Build the request body, rejecting blank content and out-of-range source counts.
///
/// Content is sent exactly as entered; trimming only decides emptiness.
pub fn build_request(
    content: &str,
    input_type: InputType,
    num_sources: u8,
) -> Result<CheckRequest, ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    Ok(CheckRequest {
        content: content.to_string(),
        input_type,
        num_sources: validate_num_sources(num_sources)?,
    })
}
