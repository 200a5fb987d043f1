// ListenHub Core Library
// Speaker resolution, job polling and workflow orchestration for the ListenHub tool bridge

pub mod cache;
pub mod client;
pub mod config;
pub mod format;
pub mod mcp;
pub mod poller;
pub mod session;
pub mod speakers;
pub mod tools;
pub mod workflow;

#[cfg(test)]
mod testing;

// Export core types
pub use cache::TtlCache;
pub use client::{ApiResponse, HttpEndpoint, RemoteEndpoint};
pub use config::ListenHubConfig;
pub use mcp::{
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, McpError, McpServer, Notifier,
    OutboundMessage,
};
pub use poller::{JobPoller, JobStatus, PollOptions, PollOutcome, ProcessStatus};
pub use session::Session;
pub use speakers::{ResolutionError, ResolutionPolicy, ResolvedSpeaker, Speaker, SpeakerResolver};
pub use tools::{Tool, ToolError, ToolRegistry, ToolResult};
pub use workflow::{AbortReason, JobFamily, JobReport};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListenHubError {
    #[error("{message} (Status: {})", .status.map_or_else(|| "N/A".to_string(), |s| s.to_string()))]
    Http { status: Option<u16>, message: String },

    #[error("{0}")]
    Api(String),

    #[error("{0}")]
    MissingData(String),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ListenHubError>;
