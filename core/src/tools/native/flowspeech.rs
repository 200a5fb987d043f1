use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{check_episode_id, forward, parse_args};
use crate::client::types::{FlowspeechMode, Source, SourceKind};
use crate::session::Session;
use crate::tools::{no_progress, ProgressSink, Tool, ToolError, ToolHints, ToolResult};
use crate::workflow::{self, FlowspeechParams};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateFlowspeechArgs {
    source_type: SourceKind,
    source_content: String,
    speaker_id: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    mode: FlowspeechMode,
}

/// Text or URL to speech with a single speaker
pub struct CreateFlowspeechTool {
    session: Session,
}

impl CreateFlowspeechTool {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for CreateFlowspeechTool {
    fn name(&self) -> String {
        "create_flowspeech".to_string()
    }

    fn description(&self) -> String {
        "Create a FlowSpeech episode by converting text or URL content to speech. Supports smart mode (AI-enhanced, fixes grammar) and direct mode (no modifications). This tool will automatically poll until generation is complete.".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "sourceType": {
                    "type": "string",
                    "enum": ["text", "url"],
                    "description": "Source type: text or url"
                },
                "sourceContent": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Source content (text or URL)"
                },
                "speakerId": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Speaker name or ID. Use speaker name from get_speakers tool output (the \"name\" field, not speakerId). Full speaker ID also supported."
                },
                "language": {
                    "type": "string",
                    "description": format!(
                        "Language code (e.g., \"zh\" for Chinese, \"en\" for English). Default: {}",
                        self.session.default_language()
                    )
                },
                "mode": {
                    "type": "string",
                    "enum": ["smart", "direct"],
                    "default": "smart",
                    "description": "Generation mode: \"smart\" (AI-enhanced, fixes grammar) or \"direct\" (no modifications)"
                }
            },
            "required": ["sourceType", "sourceContent", "speakerId"]
        })
    }

    fn hints(&self) -> Option<ToolHints> {
        Some(ToolHints {
            title: "Create FlowSpeech",
            read_only: false,
            open_world: true,
        })
    }

    fn polls(&self) -> bool {
        true
    }

    async fn call(&self, arguments: Value) -> ToolResult<Value> {
        self.call_with_progress(arguments, no_progress()).await
    }

    async fn call_with_progress(
        &self,
        arguments: Value,
        progress: ProgressSink,
    ) -> ToolResult<Value> {
        let args: CreateFlowspeechArgs = parse_args(arguments)?;
        if args.speaker_id.trim().is_empty() {
            return Err(ToolError::InvalidArguments(
                "speakerId must not be empty".to_string(),
            ));
        }
        info!(
            target: "listenhub_tools",
            source_type = ?args.source_type,
            content_len = args.source_content.len(),
            speaker = %args.speaker_id,
            mode = args.mode.as_str(),
            "create_flowspeech"
        );

        let report = workflow::create_flowspeech(
            &self.session,
            FlowspeechParams {
                source: Source {
                    kind: args.source_type,
                    content: args.source_content,
                },
                speaker: args.speaker_id,
                language: args.language,
                mode: args.mode,
            },
            forward(progress),
        )
        .await;
        Ok(Value::String(report.to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowspeechStatusArgs {
    episode_id: String,
}

pub struct FlowspeechStatusTool {
    session: Session,
}

impl FlowspeechStatusTool {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for FlowspeechStatusTool {
    fn name(&self) -> String {
        "get_flowspeech_status".to_string()
    }

    fn description(&self) -> String {
        "Query detailed information of a FlowSpeech episode, including generation status, audio URLs, scripts, outline, and metadata. Does not poll - returns current status immediately.".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "episodeId": {
                    "type": "string",
                    "minLength": 1,
                    "description": "The FlowSpeech episode ID"
                }
            },
            "required": ["episodeId"]
        })
    }

    fn hints(&self) -> Option<ToolHints> {
        Some(ToolHints {
            title: "Get FlowSpeech Status",
            read_only: true,
            open_world: true,
        })
    }

    async fn call(&self, arguments: Value) -> ToolResult<Value> {
        let args: FlowspeechStatusArgs = parse_args(arguments)?;
        check_episode_id(&args.episode_id, None)?;

        let lookup = workflow::flowspeech_status(&self.session, &args.episode_id).await;
        Ok(Value::String(lookup.to_string()))
    }
}
