use std::time::Duration;

use thiserror::Error;

/// Failures of a tool call that produced no report text.
///
/// Remote-side failures never land here; tools describe them in their output.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The registry cut the call off
    #[error("Tool call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        ToolError::InvalidArguments(e.to_string())
    }
}

pub type ToolResult<T> = Result<T, ToolError>;
