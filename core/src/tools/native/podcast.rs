use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{check_episode_id, forward, parse_args, EPISODE_ID_LEN};
use crate::client::types::{PodcastMode, ScriptLine, Source};
use crate::session::Session;
use crate::tools::{no_progress, ProgressSink, Tool, ToolError, ToolHints, ToolResult};
use crate::workflow::{self, AudioParams, PodcastParams};

const MODE_DESCRIPTION: &str = "Generation mode (time indicates podcast audio length): \
\"quick\" (3-5 min audio): fast-paced content for simple topics, news summaries, brief introductions. \
\"deep\" (8-15 min audio): comprehensive analysis, in-depth explanations, thorough coverage. \
\"debate\" (5-10 min audio): conversational discussion, interviews, dialogues, Q&A sessions. \
All modes support 1-2 speakers. Default: quick";

fn sources_schema() -> Value {
    json!({
        "type": "array",
        "description": "Additional sources (text or URLs)",
        "items": {
            "type": "object",
            "properties": {
                "type": { "type": "string", "enum": ["text", "url"], "description": "Source type: text or url" },
                "content": { "type": "string", "description": "Source content (text content or URL)" }
            },
            "required": ["type", "content"]
        }
    })
}

fn speakers_schema() -> Value {
    json!({
        "type": "array",
        "items": { "type": "string" },
        "minItems": 1,
        "maxItems": 2,
        "description": "1-2 speaker names or IDs. Use speaker names from get_speakers tool output (the \"name\" field, not speakerId). Full speaker IDs also supported. Names will be automatically resolved to IDs."
    })
}

fn mode_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["quick", "deep", "debate"],
        "default": "quick",
        "description": MODE_DESCRIPTION
    })
}

fn episode_id_schema(description: &str) -> Value {
    json!({
        "type": "string",
        "minLength": EPISODE_ID_LEN,
        "maxLength": EPISODE_ID_LEN,
        "description": description
    })
}

fn default_wait() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePodcastArgs {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    sources: Option<Vec<Source>>,
    speakers: Vec<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    mode: PodcastMode,
}

/// Full podcast generation, polled until complete
pub struct CreatePodcastTool {
    session: Session,
}

impl CreatePodcastTool {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for CreatePodcastTool {
    fn name(&self) -> String {
        "create_podcast".to_string()
    }

    fn description(&self) -> String {
        "Create a podcast episode with full generation (text + audio). Supports single-speaker (solo) or dual-speaker (dialogue) formats with 1-2 speakers (can use speaker names or IDs). Choose from 3 generation modes: quick (3-5 min podcast), deep (8-15 min podcast), or debate (5-10 min podcast). Accepts text or URL sources. This tool will automatically poll until generation is complete (may take several minutes).".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "The content or topic for the podcast (optional if sources provided)" },
                "sources": sources_schema(),
                "speakers": speakers_schema(),
                "language": {
                    "type": "string",
                    "description": "Language code (e.g., \"zh\" for Chinese, \"en\" for English). Should match the selected speaker's language. If not specified, will use the first speaker's language."
                },
                "mode": mode_schema()
            },
            "required": ["speakers"]
        })
    }

    fn hints(&self) -> Option<ToolHints> {
        Some(ToolHints {
            title: "Create Podcast",
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
        let args: CreatePodcastArgs = parse_args(arguments)?;
        info!(target: "listenhub_tools", speakers = ?args.speakers, mode = args.mode.as_str(), "create_podcast");

        let report = workflow::create_podcast(
            &self.session,
            PodcastParams {
                query: args.query,
                sources: args.sources.unwrap_or_default(),
                speakers: args.speakers,
                language: args.language,
                mode: args.mode,
                wait_for_completion: true,
            },
            forward(progress),
        )
        .await;
        Ok(Value::String(report.to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EpisodeArgs {
    episode_id: String,
}

/// Immediate podcast status query
pub struct PodcastStatusTool {
    session: Session,
}

impl PodcastStatusTool {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for PodcastStatusTool {
    fn name(&self) -> String {
        "get_podcast_status".to_string()
    }

    fn description(&self) -> String {
        "Query detailed information of a podcast episode, including generation status, audio URLs, scripts, outline, and metadata. Does not poll - returns current status immediately.".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "episodeId": episode_id_schema(
                    "The complete 24-character episode ID. Copy the FULL Episode ID from the previous response."
                )
            },
            "required": ["episodeId"]
        })
    }

    fn hints(&self) -> Option<ToolHints> {
        Some(ToolHints {
            title: "Get Podcast Status",
            read_only: true,
            open_world: true,
        })
    }

    async fn call(&self, arguments: Value) -> ToolResult<Value> {
        let args: EpisodeArgs = parse_args(arguments)?;
        check_episode_id(&args.episode_id, Some(EPISODE_ID_LEN))?;

        let lookup = workflow::podcast_status(&self.session, &args.episode_id).await;
        Ok(Value::String(lookup.to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePodcastTextArgs {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    sources: Option<Vec<Source>>,
    speaker_ids: Vec<String>,
    language: String,
    #[serde(default)]
    mode: PodcastMode,
    #[serde(default = "default_wait")]
    wait_for_completion: bool,
}

/// First stage of two-stage generation
pub struct CreatePodcastTextOnlyTool {
    session: Session,
}

impl CreatePodcastTextOnlyTool {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for CreatePodcastTextOnlyTool {
    fn name(&self) -> String {
        "create_podcast_text_only".to_string()
    }

    fn description(&self) -> String {
        "Create podcast episode with text content only (no audio generation). Supports 1-2 speakers (names or IDs) and the quick, deep and debate modes. This is the first stage of two-stage generation. After text generation completes you can review the scripts, then call generate_podcast_audio (optionally with customScripts) to produce audio.".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "The content or topic for the podcast (optional if sources provided)" },
                "sources": sources_schema(),
                "speakerIds": speakers_schema(),
                "language": {
                    "type": "string",
                    "description": "Language code (e.g., \"zh\" for Chinese, \"en\" for English). Must match the selected speaker's language"
                },
                "mode": mode_schema(),
                "waitForCompletion": {
                    "type": "boolean",
                    "default": true,
                    "description": "Whether to wait for text generation to complete"
                }
            },
            "required": ["speakerIds", "language"]
        })
    }

    fn hints(&self) -> Option<ToolHints> {
        Some(ToolHints {
            title: "Create Podcast Text Only",
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
        let args: CreatePodcastTextArgs = parse_args(arguments)?;
        if args.language.trim().is_empty() {
            return Err(ToolError::InvalidArguments(
                "language must not be empty".to_string(),
            ));
        }
        info!(target: "listenhub_tools", speakers = ?args.speaker_ids, language = %args.language, "create_podcast_text_only");

        let report = workflow::create_podcast_text_only(
            &self.session,
            PodcastParams {
                query: args.query,
                sources: args.sources.unwrap_or_default(),
                speakers: args.speaker_ids,
                language: Some(args.language),
                mode: args.mode,
                wait_for_completion: args.wait_for_completion,
            },
            forward(progress),
        )
        .await;
        Ok(Value::String(report.to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateAudioArgs {
    episode_id: String,
    #[serde(default)]
    custom_scripts: Option<Vec<ScriptLine>>,
    #[serde(default = "default_wait")]
    wait_for_completion: bool,
}

/// Second stage: audio from an episode's finished text
pub struct GeneratePodcastAudioTool {
    session: Session,
}

impl GeneratePodcastAudioTool {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for GeneratePodcastAudioTool {
    fn name(&self) -> String {
        "generate_podcast_audio".to_string()
    }

    fn description(&self) -> String {
        "Generate audio for a podcast episode that already has text content. This is the second stage of two-stage generation. The episode must have contentStatus=text-success. You can optionally provide customScripts to override the generated scripts; this is the only way to use modified scripts.".to_string()
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "episodeId": episode_id_schema(
                    "The complete 24-character episode ID from the previous create_podcast_text_only response. Do not truncate or shorten it."
                ),
                "customScripts": {
                    "type": "array",
                    "description": "Optional custom scripts to override generated ones",
                    "items": {
                        "type": "object",
                        "properties": {
                            "content": { "type": "string", "description": "Script text content" },
                            "speakerId": { "type": "string", "description": "Speaker ID" }
                        },
                        "required": ["content", "speakerId"]
                    }
                },
                "waitForCompletion": {
                    "type": "boolean",
                    "default": true,
                    "description": "Whether to wait for audio generation to complete"
                }
            },
            "required": ["episodeId"]
        })
    }

    fn hints(&self) -> Option<ToolHints> {
        Some(ToolHints {
            title: "Generate Podcast Audio",
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
        let args: GenerateAudioArgs = parse_args(arguments)?;
        check_episode_id(&args.episode_id, Some(EPISODE_ID_LEN))?;
        info!(
            target: "listenhub_tools",
            episode_id = %args.episode_id,
            custom_scripts = args.custom_scripts.is_some(),
            "generate_podcast_audio"
        );

        let report = workflow::generate_podcast_audio(
            &self.session,
            AudioParams {
                episode_id: args.episode_id,
                custom_scripts: args.custom_scripts,
                wait_for_completion: args.wait_for_completion,
            },
            forward(progress),
        )
        .await;
        Ok(Value::String(report.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::types::ApiResponse;
    use crate::config::ListenHubConfig;
    use crate::poller::ProcessStatus;
    use crate::speakers::Speaker;
    use crate::testing::{created, podcast, FakeEndpoint};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    const EPISODE: &str = "65f1a2b3c4d5e6f7a8b9c0d1";

    fn session(endpoint: &Arc<FakeEndpoint>) -> Session {
        Session::new(endpoint.clone(), &ListenHubConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_podcast_tool() {
        let endpoint = Arc::new(
            FakeEndpoint::new()
                .with_partition("en", vec![Speaker::new("id-123", "David", "en")])
                .with_submit(created(EPISODE))
                .with_podcast_status(ApiResponse::ok(podcast(EPISODE, ProcessStatus::Success))),
        );
        let tool = CreatePodcastTool::new(session(&endpoint));

        let out = tool
            .call(json!({
                "query": "Explain borrow checking",
                "sources": [{"type": "url", "content": "https://doc.rust-lang.org"}],
                "speakers": ["david"],
                "mode": "deep"
            }))
            .await
            .unwrap();

        assert!(out.as_str().unwrap().starts_with("Podcast Generation Completed"));
        let request = endpoint.last_podcast_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.mode, Some(PodcastMode::Deep));
        assert_eq!(request.sources.map(|s| s.len()), Some(1));
    }

    #[tokio::test]
    async fn test_create_podcast_rejects_bad_arguments() {
        let endpoint = Arc::new(FakeEndpoint::new());
        let tool = CreatePodcastTool::new(session(&endpoint));

        let missing = tool.call(json!({"query": "x"})).await.unwrap_err();
        assert!(matches!(missing, ToolError::InvalidArguments(_)));

        let bad_mode = tool
            .call(json!({"query": "x", "speakers": ["a"], "mode": "marathon"}))
            .await
            .unwrap_err();
        assert!(matches!(bad_mode, ToolError::InvalidArguments(_)));
        assert_eq!(endpoint.submit_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_status_tool_checks_id_length() {
        let endpoint = Arc::new(FakeEndpoint::new());
        let tool = PodcastStatusTool::new(session(&endpoint));
        let err = tool.call(json!({"episodeId": "short"})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert_eq!(endpoint.status_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_text_only_tool_without_waiting() {
        let endpoint = Arc::new(
            FakeEndpoint::new()
                .with_partition("zh", vec![Speaker::new("zh-1", "Xiaoming", "zh")])
                .with_submit(created(EPISODE)),
        );
        let tool = CreatePodcastTextOnlyTool::new(session(&endpoint));
        let out = tool
            .call(json!({
                "query": "Tea culture",
                "speakerIds": ["Xiaoming"],
                "language": "zh",
                "waitForCompletion": false
            }))
            .await
            .unwrap();

        let text = out.as_str().unwrap();
        assert!(text.starts_with("Podcast text generation started"));
        assert!(text.contains(EPISODE));
    }

    #[tokio::test]
    async fn test_audio_tool_not_ready() {
        let episode = podcast(EPISODE, ProcessStatus::Pending);
        let endpoint = Arc::new(FakeEndpoint::new().with_podcast_status(ApiResponse::ok(episode)));
        let tool = GeneratePodcastAudioTool::new(session(&endpoint));

        let out = tool.call(json!({"episodeId": EPISODE})).await.unwrap();
        assert_eq!(
            out.as_str().unwrap(),
            "Cannot generate audio: Episode contentStatus is unknown, must be text-success"
        );
    }
}
