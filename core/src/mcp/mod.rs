//! Model Context Protocol (MCP) server side
//!
//! - `types`: JSON-RPC 2.0 and MCP message types
//! - `server`: transport-independent request dispatcher
//! - `prompts`: the podcast creation guide prompt
pub mod prompts;
pub mod server;
pub mod types;

pub use server::{McpServer, Notifier, SERVER_NAME};
pub use types::{
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, McpError, OutboundMessage,
    DEFAULT_PROTOCOL_VERSION, SUPPORTED_PROTOCOL_VERSIONS,
};
