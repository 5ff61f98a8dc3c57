//! Failures inside the rewriting steps.
//!
//! None of these reach the caller; the orchestrator logs them and returns
//! the original response.

use thiserror::Error;

use crate::transform::TransformError;

#[derive(Debug, Error)]
pub enum InterceptError {
    /// Response claimed JSON but the body did not parse.
    #[error("response body is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Rewritten payload could not be serialized.
    #[error("cannot serialize rewritten payload: {0}")]
    Rebuild(#[source] serde_json::Error),

    /// A pipeline step panicked.
    #[error("rewrite step panicked: {0}")]
    Panicked(String),
}
