use super::error::ToolResult;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Receives `(status, retry)` each time a polled job is still running
pub type ProgressSink = Arc<dyn Fn(&str, u32) + Send + Sync>;

/// Sink for callers that do not follow progress
pub fn no_progress() -> ProgressSink {
    Arc::new(|_: &str, _: u32| {})
}

/// Behaviour hints published alongside a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolHints {
    pub title: &'static str,
    /// The tool only reads remote state
    pub read_only: bool,
    /// The tool talks to a system outside the host
    pub open_world: bool,
}

/// The core trait for all tools exposed to the agent host
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of the tool (e.g., "create_podcast")
    fn name(&self) -> String;

    /// A human-readable description of what the tool does
    fn description(&self) -> String;

    /// The JSON Schema for the tool's arguments
    fn parameters(&self) -> Value;

    fn hints(&self) -> Option<ToolHints> {
        None
    }

    /// Whether the call waits on a remote job. Such calls are bounded by
    /// their poll budget and are not cut off by the registry.
    fn polls(&self) -> bool {
        false
    }

    /// Execute the tool with the given arguments.
    ///
    /// Remote-side failures are part of the returned text; `Err` is reserved
    /// for calls that could not be carried out at all.
    async fn call(&self, arguments: Value) -> ToolResult<Value>;

    /// Like `call`, reporting job progress to `progress`
    async fn call_with_progress(
        &self,
        arguments: Value,
        _progress: ProgressSink,
    ) -> ToolResult<Value> {
        self.call(arguments).await
    }
}
