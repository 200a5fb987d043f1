//! Endpoint double for the integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use listenhub_core::client::types::*;
use listenhub_core::{
    ListenHubConfig, ListenHubError, ProcessStatus, RemoteEndpoint, Result, Session, Speaker,
};

/// Catalog partitions plus a queue of podcast statuses, with call counters
#[derive(Default)]
pub struct CatalogEndpoint {
    partitions: HashMap<String, Vec<Speaker>>,
    statuses: Mutex<VecDeque<ProcessStatus>>,
    next_episode: Mutex<Option<String>>,
    slow_flowspeech: Option<(String, Duration)>,
    pub list_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub last_request: Mutex<Option<CreatePodcastRequest>>,
}

impl CatalogEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition(mut self, language: &str, speakers: &[(&str, &str)]) -> Self {
        self.partitions.insert(
            language.to_string(),
            speakers
                .iter()
                .map(|(id, name)| Speaker::new(*id, *name, language))
                .collect(),
        );
        self
    }

    pub fn episode(self, episode_id: &str, statuses: &[ProcessStatus]) -> Self {
        *self.next_episode.lock().unwrap() = Some(episode_id.to_string());
        self.statuses.lock().unwrap().extend(statuses.iter().cloned());
        self
    }

    /// FlowSpeech job whose every status fetch takes `delay` and stays pending
    pub fn slow_flowspeech(mut self, episode_id: &str, delay: Duration) -> Self {
        self.slow_flowspeech = Some((episode_id.to_string(), delay));
        self
    }

    pub fn lists(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn submits(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_fetches(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

fn unscripted<T>() -> Result<ApiResponse<T>> {
    Err(ListenHubError::Api("not scripted".to_string()))
}

#[async_trait]
impl RemoteEndpoint for CatalogEndpoint {
    async fn list_speakers(&self, language: Option<&str>) -> Result<ApiResponse<SpeakerList>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let items = language
            .and_then(|l| self.partitions.get(l).cloned())
            .unwrap_or_default();
        Ok(ApiResponse::ok(SpeakerList { items, total: None }))
    }

    async fn create_podcast(
        &self,
        request: &CreatePodcastRequest,
    ) -> Result<ApiResponse<EpisodeCreated>> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        Ok(ApiResponse::ok(EpisodeCreated {
            episode_id: self.next_episode.lock().unwrap().clone(),
            ..EpisodeCreated::default()
        }))
    }

    async fn create_podcast_text_only(
        &self,
        request: &CreatePodcastRequest,
    ) -> Result<ApiResponse<EpisodeCreated>> {
        self.create_podcast(request).await
    }

    async fn generate_podcast_audio(
        &self,
        _episode_id: &str,
        _request: &GeneratePodcastAudioRequest,
    ) -> Result<ApiResponse<GeneratePodcastAudioResponse>> {
        unscripted()
    }

    async fn podcast_episode(&self, episode_id: &str) -> Result<ApiResponse<PodcastEpisode>> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        match self.statuses.lock().unwrap().pop_front() {
            Some(status) => Ok(ApiResponse::ok(PodcastEpisode {
                episode_id: episode_id.to_string(),
                process_status: status,
                ..PodcastEpisode::default()
            })),
            None => unscripted(),
        }
    }

    async fn create_flowspeech(
        &self,
        _request: &CreateFlowspeechRequest,
    ) -> Result<ApiResponse<EpisodeCreated>> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        match &self.slow_flowspeech {
            Some((episode_id, _)) => Ok(ApiResponse::ok(EpisodeCreated {
                episode_id: Some(episode_id.clone()),
                ..EpisodeCreated::default()
            })),
            None => unscripted(),
        }
    }

    async fn flowspeech_episode(&self, episode_id: &str) -> Result<ApiResponse<FlowspeechEpisode>> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let Some((_, delay)) = &self.slow_flowspeech else {
            return unscripted();
        };
        tokio::time::sleep(*delay).await;
        Ok(ApiResponse::ok(FlowspeechEpisode {
            episode_id: episode_id.to_string(),
            process_status: ProcessStatus::Pending,
            ..FlowspeechEpisode::default()
        }))
    }

    async fn user_subscription(&self) -> Result<ApiResponse<UserSubscription>> {
        unscripted()
    }
}

pub fn session(endpoint: &Arc<CatalogEndpoint>) -> Session {
    Session::new(endpoint.clone(), &ListenHubConfig::default())
}
