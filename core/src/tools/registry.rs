use super::error::{ToolError, ToolResult};
use super::traits::{no_progress, ProgressSink, Tool};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Default upper bound on a single tool call
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// A registry for managing available tools
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Arc<DashMap<String, Arc<dyn Tool>>>,
    call_timeout: Duration,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_CALL_TIMEOUT)
    }

    /// Registry whose calls are cut off after `call_timeout`
    pub fn with_timeout(call_timeout: Duration) -> Self {
        Self {
            tools: Arc::new(DashMap::new()),
            call_timeout,
        }
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Register a new tool, replacing one with the same name
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let name = tool.name();
        info!(target: "tool_registry", tool = %name, "Registering tool");

        if self.tools.insert(name.clone(), tool).is_some() {
            warn!(target: "tool_registry", tool = %name, "Replaced existing tool");
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).map(|t| t.clone())
    }

    /// List all registered tools, ordered by name
    pub fn list_tools(&self) -> Vec<Arc<dyn Tool>> {
        let mut tools: Vec<Arc<dyn Tool>> = self.tools.iter().map(|t| t.clone()).collect();
        tools.sort_by_key(|t| t.name());
        tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Call a tool by name, without following progress
    pub async fn call(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> ToolResult<serde_json::Value> {
        self.call_with_progress(name, arguments, no_progress()).await
    }

    /// Call a tool by name, forwarding job progress to `progress`.
    ///
    /// Polling tools run to the end of their own poll budget; every other
    /// tool is cut off after the registry's call timeout.
    #[tracing::instrument(skip(self, arguments, progress), fields(tool.name = %name))]
    pub async fn call_with_progress(
        &self,
        name: &str,
        arguments: serde_json::Value,
        progress: ProgressSink,
    ) -> ToolResult<serde_json::Value> {
        let start_time = tokio::time::Instant::now();

        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        debug!(target: "tool_registry", tool = %name, polls = tool.polls(), "Invoking tool");

        let call = tool.call_with_progress(arguments, progress);
        let result = if tool.polls() {
            call.await
        } else {
            match timeout(self.call_timeout, call).await {
                Ok(res) => res,
                Err(_) => {
                    warn!(target: "tool_registry", tool = %name, timeout = ?self.call_timeout, "Tool execution timed out");
                    Err(ToolError::Timeout(self.call_timeout))
                }
            }
        };

        let elapsed_ms = start_time.elapsed().as_secs_f64() * 1000.0;
        match &result {
            Ok(_) => {
                debug!(target: "tool_registry", tool = %name, elapsed_ms, "Tool execution succeeded")
            }
            Err(e) => {
                warn!(target: "tool_registry", tool = %name, elapsed_ms, error = %e, "Tool execution failed")
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Tool;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> String {
            "echo".to_string()
        }

        fn description(&self) -> String {
            "Echo the arguments back".to_string()
        }

        fn parameters(&self) -> Value {
            json!({"type": "object"})
        }

        async fn call(&self, arguments: Value) -> ToolResult<Value> {
            Ok(arguments)
        }
    }

    struct SlowTool;

    #[async_trait]
    impl Tool for SlowTool {
        fn name(&self) -> String {
            "slow".to_string()
        }

        fn description(&self) -> String {
            "Never finishes in time".to_string()
        }

        fn parameters(&self) -> Value {
            json!({"type": "object"})
        }

        async fn call(&self, _arguments: Value) -> ToolResult<Value> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Value::Null)
        }
    }

    /// Outlives any call timeout, reporting progress on the way
    struct PollingTool;

    #[async_trait]
    impl Tool for PollingTool {
        fn name(&self) -> String {
            "polling".to_string()
        }

        fn description(&self) -> String {
            "Waits on a slow remote job".to_string()
        }

        fn parameters(&self) -> Value {
            json!({"type": "object"})
        }

        fn polls(&self) -> bool {
            true
        }

        async fn call(&self, arguments: Value) -> ToolResult<Value> {
            self.call_with_progress(arguments, no_progress()).await
        }

        async fn call_with_progress(
            &self,
            _arguments: Value,
            progress: ProgressSink,
        ) -> ToolResult<Value> {
            for retry in 0..3 {
                progress("pending", retry);
                tokio::time::sleep(Duration::from_secs(600)).await;
            }
            Ok(json!("Episode ID: E9"))
        }
    }

    #[tokio::test]
    async fn test_register_and_call() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        registry.register(Arc::new(SlowTool));

        let names: Vec<_> = registry.list_tools().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["echo", "slow"]);

        let out = registry.call("echo", json!({"x": 1})).await.unwrap();
        assert_eq!(out, json!({"x": 1}));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.call("missing", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(name) if name == "missing"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_timeout() {
        let registry = ToolRegistry::with_timeout(Duration::from_secs(5));
        registry.register(Arc::new(SlowTool));
        let err = registry.call("slow", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::Timeout(d) if d == Duration::from_secs(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_tool_is_not_cut_off() {
        let registry = ToolRegistry::with_timeout(Duration::from_secs(5));
        registry.register(Arc::new(PollingTool));

        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let out = registry
            .call_with_progress(
                "polling",
                json!({}),
                Arc::new(move |status: &str, retry: u32| {
                    sink.lock().unwrap().push((status.to_string(), retry))
                }),
            )
            .await
            .unwrap();

        assert_eq!(out, json!("Episode ID: E9"));
        assert_eq!(seen.lock().unwrap().len(), 3);
        assert_eq!(seen.lock().unwrap()[2], ("pending".to_string(), 2));
    }
}
