//! MCP request dispatcher
//!
//! Transport independent: the stdio and HTTP transports hand each decoded
//! message to [`McpServer::handle`] and write back whatever it returns.

use super::prompts::{self, GuideTask, PODCAST_GUIDE};
use super::types::*;
use crate::session::Session;
use crate::tools::{listenhub_registry, no_progress, ProgressSink, ToolError, ToolRegistry};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const SERVER_NAME: &str = "listenhub-mcp-server";

/// Delivers server-initiated notifications to the host
pub type Notifier = Arc<dyn Fn(JsonRpcNotification) + Send + Sync>;

/// MCP server exposing the ListenHub tools and prompt guide
#[derive(Clone)]
pub struct McpServer {
    session: Session,
    registry: ToolRegistry,
    notifier: Option<Notifier>,
}

impl fmt::Debug for McpServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("McpServer")
            .field("tools", &self.registry.len())
            .field("notifies", &self.notifier.is_some())
            .finish_non_exhaustive()
    }
}

impl McpServer {
    pub fn new(session: Session) -> Self {
        let registry = listenhub_registry(&session);
        Self::with_registry(session, registry)
    }

    pub fn with_registry(session: Session, registry: ToolRegistry) -> Self {
        info!(target: "mcp", tools = registry.len(), "MCP server ready");
        Self {
            session,
            registry,
            notifier: None,
        }
    }

    /// Server that reports job progress through `notifier` whenever a
    /// `tools/call` carries a progress token
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Decode and handle one raw JSON-RPC message.
    ///
    /// Returns `None` for notifications; malformed input gets an error
    /// response with a null id.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(target: "mcp", error = %e, "Unparseable message");
                return Some(JsonRpcResponse::failure(Value::Null, &McpError::Json(e)));
            }
        };
        self.handle_value(value).await
    }

    pub async fn handle_value(&self, value: Value) -> Option<JsonRpcResponse> {
        if value.is_array() {
            return Some(JsonRpcResponse::failure(
                Value::Null,
                &McpError::Protocol("Batch requests are not supported".to_string()),
            ));
        }
        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle(request).await,
            Err(e) => Some(JsonRpcResponse::failure(
                id,
                &McpError::Protocol(e.to_string()),
            )),
        }
    }

    /// Dispatch one request
    #[tracing::instrument(skip(self, request), fields(method = %request.method))]
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            debug!(target: "mcp", method = %request.method, "Notification received");
            return None;
        };

        let outcome = match request.method.as_str() {
            "initialize" => self.initialize(request.params),
            "ping" => Ok(json!({})),
            "tools/list" => self.list_tools(),
            "tools/call" => self.call_tool(request.params).await,
            "prompts/list" => self.list_prompts(),
            "prompts/get" => self.get_prompt(request.params).await,
            other => Err(McpError::MethodNotFound(other.to_string())),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                debug!(target: "mcp", code = e.code(), error = %e, "Request failed");
                JsonRpcResponse::failure(id, &e)
            }
        })
    }

    fn initialize(&self, params: Option<Value>) -> Result<Value, McpError> {
        let params: InitializeParams = match params {
            Some(p) => parse_params(p)?,
            None => InitializeParams::default(),
        };
        let version = negotiate_version(params.protocol_version.as_deref());
        info!(
            target: "mcp",
            client = %params.client_info.as_ref().map_or("unknown", |c| c.name.as_str()),
            protocol_version = %version,
            "Initializing session"
        );

        let result = InitializeResult {
            protocol_version: version.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ListChanged::default()),
                prompts: Some(ListChanged::default()),
                experimental: None,
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };
        Ok(serde_json::to_value(result)?)
    }

    fn list_tools(&self) -> Result<Value, McpError> {
        let tools = self
            .registry
            .list_tools()
            .iter()
            .map(|tool| McpTool {
                name: tool.name(),
                description: Some(tool.description()),
                input_schema: tool.parameters(),
                annotations: tool.hints().map(|h| ToolAnnotations {
                    title: h.title.to_string(),
                    read_only_hint: h.read_only,
                    open_world_hint: h.open_world,
                }),
            })
            .collect();
        Ok(serde_json::to_value(ListToolsResult {
            tools,
            next_cursor: None,
        })?)
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, McpError> {
        let params: CallToolParams = parse_params(require(params)?)?;
        info!(target: "mcp", tool = %params.name, "Tool call");

        let token = params.meta.and_then(|meta| meta.progress_token);
        let progress = match (token, self.notifier.clone()) {
            (Some(token), Some(notifier)) => progress_sink(token, notifier),
            _ => no_progress(),
        };
        let result = match self
            .registry
            .call_with_progress(
                &params.name,
                params.arguments.unwrap_or(Value::Null),
                progress,
            )
            .await
        {
            Ok(Value::String(text)) => CallToolResult::text(text, false),
            Ok(other) => CallToolResult::text(other.to_string(), false),
            Err(ToolError::NotFound(name)) => {
                return Err(McpError::InvalidParams(format!("Unknown tool: {}", name)))
            }
            Err(e) => CallToolResult::text(e.to_string(), true),
        };
        Ok(serde_json::to_value(result)?)
    }

    fn list_prompts(&self) -> Result<Value, McpError> {
        Ok(serde_json::to_value(ListPromptsResult {
            prompts: vec![prompts::podcast_guide_prompt()],
        })?)
    }

    async fn get_prompt(&self, params: Option<Value>) -> Result<Value, McpError> {
        let params: GetPromptParams = parse_params(require(params)?)?;
        if params.name != PODCAST_GUIDE {
            return Err(McpError::InvalidParams(format!(
                "Unknown prompt: {}",
                params.name
            )));
        }

        let task = GuideTask::parse(
            params
                .arguments
                .as_ref()
                .and_then(|args| args.get("task"))
                .map(String::as_str),
        );
        let text = prompts::podcast_guide(&self.session, task)
            .await
            .map_err(|e| McpError::Internal(e.to_string()))?;

        Ok(serde_json::to_value(GetPromptResult {
            description: prompts::podcast_guide_prompt().description,
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: Content::Text { text },
            }],
        })?)
    }
}

/// Progress as `notifications/progress`, counting up from 1 per observation
fn progress_sink(token: Value, notifier: Notifier) -> ProgressSink {
    Arc::new(move |status: &str, retry: u32| {
        notifier(JsonRpcNotification::progress(
            token.clone(),
            retry + 1,
            format!("Status: {}", status),
        ))
    })
}

fn require(params: Option<Value>) -> Result<Value, McpError> {
    params.ok_or_else(|| McpError::InvalidParams("Missing params".to_string()))
}

fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, McpError> {
    serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListenHubConfig;
    use crate::client::types::ApiResponse;
    use crate::poller::ProcessStatus;
    use crate::speakers::Speaker;
    use crate::testing::{created, podcast, FakeEndpoint};
    use std::sync::Mutex;

    fn server(endpoint: FakeEndpoint) -> McpServer {
        McpServer::new(Session::new(Arc::new(endpoint), &ListenHubConfig::default()))
    }

    async fn call(server: &McpServer, method: &str, params: Value) -> JsonRpcResponse {
        server
            .handle(JsonRpcRequest::new(1, method, Some(params)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = server(FakeEndpoint::new());
        let resp = call(
            &server,
            "initialize",
            json!({"protocolVersion": "2025-03-26", "capabilities": {}, "clientInfo": {"name": "host", "version": "1"}}),
        )
        .await;

        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert!(result["capabilities"]["tools"].is_object());
        assert!(result["capabilities"]["prompts"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list_carries_annotations() {
        let server = server(FakeEndpoint::new());
        let resp = call(&server, "tools/list", json!({})).await;
        let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();

        assert_eq!(tools.len(), 8);
        let speakers = tools.iter().find(|t| t["name"] == "get_speakers").unwrap();
        assert_eq!(speakers["annotations"]["readOnlyHint"], true);
        assert_eq!(speakers["inputSchema"]["type"], "object");
    }

    #[tokio::test]
    async fn test_notification_gets_no_reply() {
        let server = server(FakeEndpoint::new());
        let reply = server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let server = server(FakeEndpoint::new());

        let unknown = call(&server, "resources/list", json!({})).await;
        assert_eq!(unknown.error.unwrap().code, -32601);

        let garbage = server.handle_line("{not json").await.unwrap();
        assert_eq!(garbage.error.unwrap().code, -32700);
        assert_eq!(garbage.id, Value::Null);

        let no_name = call(&server, "tools/call", json!({"arguments": {}})).await;
        assert_eq!(no_name.error.unwrap().code, -32602);

        let no_tool = call(&server, "tools/call", json!({"name": "nope"})).await;
        assert_eq!(no_tool.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_tool_error_becomes_error_result() {
        let server = server(FakeEndpoint::new());
        let resp = call(
            &server,
            "tools/call",
            json!({"name": "get_podcast_status", "arguments": {"episodeId": "abc"}}),
        )
        .await;

        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("Invalid arguments: episodeId must be exactly 24 characters"));
    }

    #[tokio::test]
    async fn test_tool_call_returns_text() {
        let server = server(
            FakeEndpoint::new().with_partition("en", vec![Speaker::new("id-123", "David", "en")]),
        );
        let resp = call(
            &server,
            "tools/call",
            json!({"name": "get_speakers", "arguments": {"language": "en"}}),
        )
        .await;

        let result = resp.result.unwrap();
        assert!(result.get("isError").is_none());
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("Found 1 available speakers for language: en"));
    }

    #[tokio::test]
    async fn test_prompts() {
        let server = server(FakeEndpoint::new());
        let list = call(&server, "prompts/list", json!({})).await;
        assert_eq!(list.result.unwrap()["prompts"][0]["name"], PODCAST_GUIDE);

        let get = call(
            &server,
            "prompts/get",
            json!({"name": PODCAST_GUIDE, "arguments": {"task": "troubleshooting"}}),
        )
        .await;
        let result = get.result.unwrap();
        assert_eq!(result["messages"][0]["role"], "user");
        assert!(result["messages"][0]["content"]["text"]
            .as_str()
            .unwrap()
            .contains("Speaker not found"));

        let missing = call(&server, "prompts/get", json!({"name": "other"})).await;
        assert_eq!(missing.error.unwrap().code, -32602);
    }

    fn podcast_endpoint() -> FakeEndpoint {
        FakeEndpoint::new()
            .with_partition("en", vec![Speaker::new("id-123", "David", "en")])
            .with_submit(created("6650f0c2a1b2c3d4e5f60718"))
            .with_podcast_status(ApiResponse::ok(podcast("6650f0c2a1b2c3d4e5f60718", ProcessStatus::Pending)))
            .with_podcast_status(ApiResponse::ok(podcast("6650f0c2a1b2c3d4e5f60718", ProcessStatus::Pending)))
            .with_podcast_status(ApiResponse::ok(podcast("6650f0c2a1b2c3d4e5f60718", ProcessStatus::Success)))
    }

    fn collecting(sent: &Arc<Mutex<Vec<JsonRpcNotification>>>) -> Notifier {
        let sent = sent.clone();
        Arc::new(move |n| sent.lock().unwrap().push(n))
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_token_gets_notifications() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let server = server(podcast_endpoint()).with_notifier(collecting(&sent));

        let resp = call(
            &server,
            "tools/call",
            json!({
                "name": "create_podcast",
                "arguments": {"query": "Ownership", "speakers": ["David"]},
                "_meta": {"progressToken": "tok-1"}
            }),
        )
        .await;
        assert!(resp.result.unwrap().get("isError").is_none());

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].method, "notifications/progress");
        let params = sent[1].params.clone().unwrap();
        assert_eq!(params["progressToken"], "tok-1");
        assert_eq!(params["progress"], 2);
        assert_eq!(params["message"], "Status: pending");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_token_no_notifications() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let server = server(podcast_endpoint()).with_notifier(collecting(&sent));

        call(
            &server,
            "tools/call",
            json!({"name": "create_podcast", "arguments": {"query": "Ownership", "speakers": ["David"]}}),
        )
        .await;
        assert!(sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_debug_summarizes_server() {
        let server = server(FakeEndpoint::new());
        let text = format!("{:?}", server);
        assert!(text.starts_with("McpServer { tools: 8, notifies: false"));
    }
}
