use async_trait::async_trait;
use serde_json::{json, Value};

use crate::session::Session;
use crate::tools::{Tool, ToolHints, ToolResult};
use crate::workflow;

/// Subscription, credits and plan of the API key owner
pub struct UserSubscriptionTool {
    session: Session,
}

impl UserSubscriptionTool {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for UserSubscriptionTool {
    fn name(&self) -> String {
        "get_user_subscription".to_string()
    }

    fn description(&self) -> String {
        "Get current user subscription information, including subscription status, credit usage, plan details, and renewal status.".to_string()
    }

    fn parameters(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    fn hints(&self) -> Option<ToolHints> {
        Some(ToolHints {
            title: "Get User Subscription",
            read_only: true,
            open_world: true,
        })
    }

    async fn call(&self, _arguments: Value) -> ToolResult<Value> {
        let lookup = workflow::subscription(&self.session).await;
        Ok(Value::String(lookup.to_string()))
    }
}
