//! ListenHub remote endpoint
//!
//! The core reaches the remote API only through `RemoteEndpoint`; the HTTP
//! implementation lives in `http`, wire types in `types`.

pub mod http;
pub mod types;

pub use http::HttpEndpoint;
pub use types::{
    ApiResponse, ContentStatus, CreateFlowspeechRequest, CreatePodcastRequest, EpisodeCreated,
    FlowspeechEpisode, FlowspeechMode, GeneratePodcastAudioRequest, GeneratePodcastAudioResponse,
    PodcastEpisode, PodcastMode, PodcastScript, ScriptLine, Source, SourceKind, SpeakerList,
    SpeakerRef, SubscriptionPlan, UserSubscription,
};

use crate::Result;
use async_trait::async_trait;

/// Request/response contract of the remote content-generation API
#[async_trait]
pub trait RemoteEndpoint: Send + Sync {
    /// List published speakers, optionally for one language (a catalog partition)
    async fn list_speakers(&self, language: Option<&str>) -> Result<ApiResponse<SpeakerList>>;

    /// Submit a full podcast job (text + audio)
    async fn create_podcast(
        &self,
        request: &CreatePodcastRequest,
    ) -> Result<ApiResponse<EpisodeCreated>>;

    /// Submit a text-only podcast job
    async fn create_podcast_text_only(
        &self,
        request: &CreatePodcastRequest,
    ) -> Result<ApiResponse<EpisodeCreated>>;

    /// Start audio generation for an episode whose text is ready
    async fn generate_podcast_audio(
        &self,
        episode_id: &str,
        request: &GeneratePodcastAudioRequest,
    ) -> Result<ApiResponse<GeneratePodcastAudioResponse>>;

    /// Current state of a podcast episode
    async fn podcast_episode(&self, episode_id: &str) -> Result<ApiResponse<PodcastEpisode>>;

    /// Submit a FlowSpeech (speech from source) job
    async fn create_flowspeech(
        &self,
        request: &CreateFlowspeechRequest,
    ) -> Result<ApiResponse<EpisodeCreated>>;

    /// Current state of a FlowSpeech episode
    async fn flowspeech_episode(&self, episode_id: &str)
        -> Result<ApiResponse<FlowspeechEpisode>>;

    /// Subscription and credits of the API key owner
    async fn user_subscription(&self) -> Result<ApiResponse<UserSubscription>>;
}
