//! Transports that carry MCP traffic between an agent host and the
//! ListenHub tool server.

pub mod http;
pub mod stdio;

use std::fmt;
use std::str::FromStr;

use listenhub_core::{ListenHubConfig, McpServer, Session};
use tracing::info;

pub use http::{router, serve_http};
pub use stdio::{serve_lines, serve_stdio};

#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

/// How the server talks to its host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Newline-delimited JSON-RPC over stdin/stdout
    Stdio,
    /// JSON-RPC over `POST /mcp`
    Http,
}

impl FromStr for Transport {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "stdio" => Ok(Transport::Stdio),
            "http" | "httpstream" | "sse" => Ok(Transport::Http),
            other => Err(BridgeError::Config(format!(
                "unknown transport '{}' (expected stdio or http)",
                other
            ))),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Stdio => write!(f, "stdio"),
            Transport::Http => write!(f, "http"),
        }
    }
}

/// Session and MCP server for a loaded configuration
pub fn build_server(config: &ListenHubConfig) -> Result<McpServer> {
    let session = Session::from_config(config).map_err(|e| BridgeError::Config(e.to_string()))?;
    info!(
        target: "bridge",
        base_url = %config.base_url,
        languages = ?config.catalog_languages,
        "ListenHub MCP server configured"
    );
    Ok(McpServer::new(session))
}
