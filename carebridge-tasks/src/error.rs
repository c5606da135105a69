use std::time::Duration;

use thiserror::Error;

/// Failure reported by the text-generation capability.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation service unavailable: {0}")]
    Unavailable(String),

    #[error("Generation failed: {0}")]
    Upstream(String),

    #[error("Generation timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Invalid response from generation service: {0}")]
    InvalidResponse(String),

    #[error("Invalid generation service endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Failure recovering a JSON array from a model reply.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Expected a JSON array")]
    NotAnArray,

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Item {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("Item {index} has an unexpected shape: {source}")]
    Item {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// The reply could not be turned into the expected items. `raw_response` is the
    /// reply exactly as the generator returned it.
    #[error("{message}")]
    Parse {
        message: String,
        raw_response: String,
        #[source]
        source: ExtractError,
    },
}

pub type Result<T> = std::result::Result<T, TaskError>;
