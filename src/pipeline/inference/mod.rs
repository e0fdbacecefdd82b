pub mod client;
pub mod prompt;
pub mod parser;
pub mod adapter;

pub use client::*;
pub use prompt::*;
pub use parser::*;
pub use adapter::*;

use thiserror::Error;

/// Failures of the remote inference path. All of them are recoverable: the
/// dispatcher answers each one with a rule-engine run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    #[error("Inference endpoint is not reachable at {0}")]
    Connection(String),

    #[error("Inference request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Inference endpoint returned error (status {status}): {body}")]
    EndpointError { status: u16, body: String },

    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Inference result has no usable fields")]
    EmptyResult,
}
