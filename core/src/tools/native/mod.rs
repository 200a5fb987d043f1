//! ListenHub tools, one per remote operation.

pub mod flowspeech;
pub mod podcast;
pub mod speakers;
pub mod user;

pub use flowspeech::{CreateFlowspeechTool, FlowspeechStatusTool};
pub use podcast::{
    CreatePodcastTextOnlyTool, CreatePodcastTool, GeneratePodcastAudioTool, PodcastStatusTool,
};
pub use speakers::GetSpeakersTool;
pub use user::UserSubscriptionTool;

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::session::Session;
use crate::tools::{ProgressSink, ToolError, ToolRegistry, ToolResult};

/// Extra time a single-request tool may take beyond the request timeout
const CALL_HEADROOM: Duration = Duration::from_secs(30);

/// Length of a podcast episode id
pub(crate) const EPISODE_ID_LEN: usize = 24;

/// Deserialize tool arguments, treating `null` as an empty object
pub(crate) fn parse_args<T: DeserializeOwned>(arguments: Value) -> ToolResult<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    Ok(serde_json::from_value(arguments)?)
}

/// Poll observer handing each observation to `progress`
pub(crate) fn forward(progress: ProgressSink) -> impl FnMut(&str, u32) + Send {
    move |status: &str, retry: u32| progress(status, retry)
}

pub(crate) fn check_episode_id(episode_id: &str, exact_len: Option<usize>) -> ToolResult<()> {
    if episode_id.trim().is_empty() {
        return Err(ToolError::InvalidArguments(
            "episodeId must not be empty".to_string(),
        ));
    }
    if let Some(len) = exact_len {
        if episode_id.chars().count() != len {
            return Err(ToolError::InvalidArguments(format!(
                "episodeId must be exactly {} characters, got {}",
                len,
                episode_id.chars().count()
            )));
        }
    }
    Ok(())
}

/// Registry with every ListenHub tool bound to `session`.
///
/// Job tools poll and end with their own report, which carries the episode
/// id. The call timeout only bounds the single-request tools.
pub fn listenhub_registry(session: &Session) -> ToolRegistry {
    let registry = ToolRegistry::with_timeout(session.request_timeout() + CALL_HEADROOM);

    registry.register(Arc::new(GetSpeakersTool::new(session.clone())));
    registry.register(Arc::new(CreatePodcastTool::new(session.clone())));
    registry.register(Arc::new(PodcastStatusTool::new(session.clone())));
    registry.register(Arc::new(CreatePodcastTextOnlyTool::new(session.clone())));
    registry.register(Arc::new(GeneratePodcastAudioTool::new(session.clone())));
    registry.register(Arc::new(CreateFlowspeechTool::new(session.clone())));
    registry.register(Arc::new(FlowspeechStatusTool::new(session.clone())));
    registry.register(Arc::new(UserSubscriptionTool::new(session.clone())));
    registry
}
