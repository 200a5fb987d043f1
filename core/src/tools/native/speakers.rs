use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::parse_args;
use crate::session::Session;
use crate::tools::{Tool, ToolHints, ToolResult};
use crate::workflow;

#[derive(Debug, Default, Deserialize)]
struct GetSpeakersArgs {
    #[serde(default)]
    language: Option<String>,
}

/// Lists published speakers of one language
pub struct GetSpeakersTool {
    session: Session,
}

impl GetSpeakersTool {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for GetSpeakersTool {
    fn name(&self) -> String {
        "get_speakers".to_string()
    }

    fn description(&self) -> String {
        "Get list of available published speakers for podcast generation. Supports filtering by language code (e.g. \"zh\", \"en\"). Returns speaker ID, name, language, gender and demo audio URL. Defaults to Chinese speakers if no language specified.".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "language": {
                    "type": "string",
                    "default": self.session.default_language(),
                    "description": "Filter by language code (e.g. \"zh\" for Chinese, \"en\" for English)"
                }
            }
        })
    }

    fn hints(&self) -> Option<ToolHints> {
        Some(ToolHints {
            title: "Get Speakers",
            read_only: true,
            open_world: true,
        })
    }

    async fn call(&self, arguments: Value) -> ToolResult<Value> {
        let args: GetSpeakersArgs = parse_args(arguments)?;
        let language = args
            .language
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| self.session.default_language().to_string());

        debug!(target: "listenhub_tools", language = %language, "Fetching published speakers");
        let listing = workflow::speakers(&self.session, &language).await;
        Ok(Value::String(listing.to_string()))
    }
}
