//! Scripted endpoint shared by the transport tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use listenhub_core::client::types::*;
use listenhub_core::{
    ListenHubConfig, ListenHubError, McpServer, ProcessStatus, RemoteEndpoint, Result, Session,
    Speaker,
};

#[derive(Default)]
pub struct ScriptedEndpoint {
    pub speakers: Vec<Speaker>,
    pub podcast_statuses: Mutex<VecDeque<PodcastEpisode>>,
}

impl ScriptedEndpoint {
    pub fn with_speakers(speakers: Vec<Speaker>) -> Self {
        Self {
            speakers,
            ..Self::default()
        }
    }

    pub fn then_podcast(self, episode_id: &str, status: ProcessStatus) -> Self {
        self.podcast_statuses.lock().unwrap().push_back(PodcastEpisode {
            episode_id: episode_id.to_string(),
            process_status: status,
            ..PodcastEpisode::default()
        });
        self
    }
}

fn unscripted<T>() -> Result<ApiResponse<T>> {
    Err(ListenHubError::Api("not scripted".to_string()))
}

#[async_trait]
impl RemoteEndpoint for ScriptedEndpoint {
    async fn list_speakers(&self, language: Option<&str>) -> Result<ApiResponse<SpeakerList>> {
        let items = self
            .speakers
            .iter()
            .filter(|s| language.map_or(true, |l| s.language == l))
            .cloned()
            .collect();
        Ok(ApiResponse::ok(SpeakerList { items, total: None }))
    }

    async fn create_podcast(&self, _: &CreatePodcastRequest) -> Result<ApiResponse<EpisodeCreated>> {
        Ok(ApiResponse::ok(EpisodeCreated {
            episode_id: Some("6650f0c2a1b2c3d4e5f60718".to_string()),
            ..EpisodeCreated::default()
        }))
    }

    async fn create_podcast_text_only(
        &self,
        _: &CreatePodcastRequest,
    ) -> Result<ApiResponse<EpisodeCreated>> {
        unscripted()
    }

    async fn generate_podcast_audio(
        &self,
        _: &str,
        _: &GeneratePodcastAudioRequest,
    ) -> Result<ApiResponse<GeneratePodcastAudioResponse>> {
        unscripted()
    }

    async fn podcast_episode(&self, _: &str) -> Result<ApiResponse<PodcastEpisode>> {
        match self.podcast_statuses.lock().unwrap().pop_front() {
            Some(episode) => Ok(ApiResponse::ok(episode)),
            None => unscripted(),
        }
    }

    async fn create_flowspeech(
        &self,
        _: &CreateFlowspeechRequest,
    ) -> Result<ApiResponse<EpisodeCreated>> {
        unscripted()
    }

    async fn flowspeech_episode(&self, _: &str) -> Result<ApiResponse<FlowspeechEpisode>> {
        unscripted()
    }

    async fn user_subscription(&self) -> Result<ApiResponse<UserSubscription>> {
        Ok(ApiResponse::error(401, "Invalid API key"))
    }
}

pub fn server(endpoint: ScriptedEndpoint) -> McpServer {
    McpServer::new(Session::new(Arc::new(endpoint), &ListenHubConfig::default()))
}
