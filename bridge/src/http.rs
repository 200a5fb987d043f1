//! JSON-RPC over HTTP: one `POST /mcp` per message.

use std::net::SocketAddr;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use listenhub_core::McpServer;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::{BridgeError, Result};

pub fn router(server: McpServer) -> Router {
    Router::new()
        .route("/mcp", post(mcp_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(server)
}

/// Reply with the JSON-RPC response, or 202 with no body for notifications
pub async fn mcp_handler(State(server): State<McpServer>, body: String) -> Response {
    match server.handle_line(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

pub async fn serve_http(server: McpServer, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        target: "bridge",
        url = %format!("http://{}/mcp", addr),
        "HTTP transport ready"
    );
    axum::serve(listener, router(server))
        .await
        .map_err(|e| BridgeError::Transport(e.to_string()))
}
