//! ListenHub API wire types
//!
//! Every remote call returns the `ApiResponse` envelope; payloads are typed per
//! job family so shape checks happen at deserialization time.

use serde::{Deserialize, Serialize};

use crate::poller::{JobStatus, ProcessStatus};
use crate::speakers::Speaker;

/// Response envelope shared by all endpoints (`code == 0` means accepted)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    // `default` would add a `T: Default` bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            message: None,
            data: Some(data),
        }
    }

    pub fn error(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == 0
    }

    /// Remote message, or "Unknown error" when the server sent none
    pub fn message_or_unknown(&self) -> &str {
        self.message.as_deref().unwrap_or("Unknown error")
    }
}

/// Speaker list payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeakerList {
    #[serde(default)]
    pub items: Vec<Speaker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// Input source for a generation job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Text,
    Url,
}

/// Speaker reference as sent to the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerRef {
    pub speaker_id: String,
}

/// Podcast generation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PodcastMode {
    /// 3-5 minutes of audio
    #[default]
    Quick,
    /// 8-15 minutes of audio
    Deep,
    /// 5-10 minutes, conversational
    Debate,
}

impl PodcastMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PodcastMode::Quick => "quick",
            PodcastMode::Deep => "deep",
            PodcastMode::Debate => "debate",
        }
    }
}

/// Body of both podcast creation endpoints (full and text-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePodcastRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
    pub speakers: Vec<SpeakerRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<PodcastMode>,
}

/// Submit response carrying the new episode id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeCreated {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Replacement script line for audio generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptLine {
    pub content: String,
    pub speaker_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratePodcastAudioRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scripts: Option<Vec<ScriptLine>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePodcastAudioResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub episode_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_status: Option<ContentStatus>,
}

/// Stage marker of two-stage podcast generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentStatus {
    TextSuccess,
    TextFail,
    AudioSuccess,
    AudioFail,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::TextSuccess => "text-success",
            ContentStatus::TextFail => "text-fail",
            ContentStatus::AudioSuccess => "audio-success",
            ContentStatus::AudioFail => "audio-fail",
        }
    }
}

/// One line of a generated podcast script
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastScript {
    pub speaker_id: String,
    pub speaker_name: String,
    pub content: String,
}

/// Podcast episode as returned by the status endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastEpisode {
    pub episode_id: String,
    pub process_status: ProcessStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_status: Option<ContentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_stream_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts: Option<Vec<PodcastScript>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_duration: Option<f64>,
}

impl PodcastEpisode {
    pub fn has_scripts(&self) -> bool {
        self.scripts.as_ref().is_some_and(|s| !s.is_empty())
    }
}

impl JobStatus for PodcastEpisode {
    fn process_status(&self) -> &ProcessStatus {
        &self.process_status
    }

    fn failure_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn failure_code(&self) -> Option<i64> {
        self.fail_code
    }
}

/// FlowSpeech generation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowspeechMode {
    /// AI-enhanced, fixes grammar
    #[default]
    Smart,
    /// Reads the source unchanged
    Direct,
}

impl FlowspeechMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowspeechMode::Smart => "smart",
            FlowspeechMode::Direct => "direct",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlowspeechRequest {
    pub sources: Vec<Source>,
    pub speakers: Vec<SpeakerRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<FlowspeechMode>,
}

/// FlowSpeech episode as returned by the status endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowspeechEpisode {
    pub episode_id: String,
    pub process_status: ProcessStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_stream_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_duration: Option<f64>,
}

impl JobStatus for FlowspeechEpisode {
    fn process_status(&self) -> &ProcessStatus {
        &self.process_status
    }

    fn failure_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn failure_code(&self) -> Option<i64> {
        self.fail_code
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub name: String,
    pub duration: String,
    pub platform: String,
}

/// Subscription and credit usage of the API key owner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSubscription {
    #[serde(default)]
    pub subscription_started_at: Option<i64>,
    #[serde(default)]
    pub subscription_expires_at: Option<i64>,
    #[serde(default)]
    pub usage_available_monthly_credits: f64,
    #[serde(default)]
    pub usage_total_monthly_credits: f64,
    #[serde(default)]
    pub usage_available_permanent_credits: f64,
    #[serde(default)]
    pub usage_total_permanent_credits: f64,
    #[serde(default)]
    pub usage_available_limited_time_credits: f64,
    #[serde(default)]
    pub total_available_credits: f64,
    #[serde(default)]
    pub reset_at: Option<i64>,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub renew_status: bool,
    #[serde(default)]
    pub paid_status: bool,
    pub subscription_plan: SubscriptionPlan,
}
