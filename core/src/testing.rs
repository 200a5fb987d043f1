//! Scripted `RemoteEndpoint` double shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::types::*;
use crate::client::RemoteEndpoint;
use crate::poller::ProcessStatus;
use crate::speakers::Speaker;
use crate::{ListenHubError, Result};

#[derive(Default)]
pub(crate) struct FakeEndpoint {
    partitions: Mutex<HashMap<String, ApiResponse<SpeakerList>>>,
    submits: Mutex<VecDeque<Result<ApiResponse<EpisodeCreated>>>>,
    audio_submits: Mutex<VecDeque<ApiResponse<GeneratePodcastAudioResponse>>>,
    podcast_statuses: Mutex<VecDeque<Result<ApiResponse<PodcastEpisode>>>>,
    flowspeech_statuses: Mutex<VecDeque<Result<ApiResponse<FlowspeechEpisode>>>>,
    subscription: Mutex<Option<ApiResponse<UserSubscription>>>,
    pub list_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub last_podcast_request: Mutex<Option<CreatePodcastRequest>>,
    pub last_flowspeech_request: Mutex<Option<CreateFlowspeechRequest>>,
    pub last_audio_request: Mutex<Option<GeneratePodcastAudioRequest>>,
}

impl FakeEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_partition(self, language: &str, speakers: Vec<Speaker>) -> Self {
        let total = speakers.len() as u64;
        self.with_partition_response(
            language,
            ApiResponse::ok(SpeakerList {
                items: speakers,
                total: Some(total),
            }),
        )
    }

    pub fn with_partition_response(self, language: &str, resp: ApiResponse<SpeakerList>) -> Self {
        self.partitions
            .lock()
            .unwrap()
            .insert(language.to_string(), resp);
        self
    }

    pub fn with_submit(self, resp: ApiResponse<EpisodeCreated>) -> Self {
        self.submits.lock().unwrap().push_back(Ok(resp));
        self
    }

    pub fn with_submit_error(self, err: ListenHubError) -> Self {
        self.submits.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn with_audio_submit(self, resp: ApiResponse<GeneratePodcastAudioResponse>) -> Self {
        self.audio_submits.lock().unwrap().push_back(resp);
        self
    }

    pub fn with_podcast_status(self, resp: ApiResponse<PodcastEpisode>) -> Self {
        self.podcast_statuses.lock().unwrap().push_back(Ok(resp));
        self
    }

    pub fn with_podcast_status_error(self, err: ListenHubError) -> Self {
        self.podcast_statuses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn with_flowspeech_status(self, resp: ApiResponse<FlowspeechEpisode>) -> Self {
        self.flowspeech_statuses.lock().unwrap().push_back(Ok(resp));
        self
    }

    pub fn with_subscription(self, resp: ApiResponse<UserSubscription>) -> Self {
        *self.subscription.lock().unwrap() = Some(resp);
        self
    }

    fn next_submit(&self) -> Result<ApiResponse<EpisodeCreated>> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submits
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ListenHubError::Api("no scripted submit".into())))
    }
}

pub(crate) fn created(episode_id: &str) -> ApiResponse<EpisodeCreated> {
    ApiResponse::ok(EpisodeCreated {
        episode_id: Some(episode_id.to_string()),
        ..EpisodeCreated::default()
    })
}

pub(crate) fn podcast(episode_id: &str, status: ProcessStatus) -> PodcastEpisode {
    PodcastEpisode {
        episode_id: episode_id.to_string(),
        process_status: status,
        ..PodcastEpisode::default()
    }
}

pub(crate) fn flowspeech(episode_id: &str, status: ProcessStatus) -> FlowspeechEpisode {
    FlowspeechEpisode {
        episode_id: episode_id.to_string(),
        process_status: status,
        ..FlowspeechEpisode::default()
    }
}

#[async_trait]
impl RemoteEndpoint for FakeEndpoint {
    async fn list_speakers(&self, language: Option<&str>) -> Result<ApiResponse<SpeakerList>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let partitions = self.partitions.lock().unwrap();
        Ok(language
            .and_then(|l| partitions.get(l).cloned())
            .unwrap_or_else(|| ApiResponse::ok(SpeakerList::default())))
    }

    async fn create_podcast(
        &self,
        request: &CreatePodcastRequest,
    ) -> Result<ApiResponse<EpisodeCreated>> {
        *self.last_podcast_request.lock().unwrap() = Some(request.clone());
        self.next_submit()
    }

    async fn create_podcast_text_only(
        &self,
        request: &CreatePodcastRequest,
    ) -> Result<ApiResponse<EpisodeCreated>> {
        *self.last_podcast_request.lock().unwrap() = Some(request.clone());
        self.next_submit()
    }

    async fn generate_podcast_audio(
        &self,
        _episode_id: &str,
        request: &GeneratePodcastAudioRequest,
    ) -> Result<ApiResponse<GeneratePodcastAudioResponse>> {
        *self.last_audio_request.lock().unwrap() = Some(request.clone());
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .audio_submits
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ApiResponse::ok(GeneratePodcastAudioResponse::default())))
    }

    async fn podcast_episode(&self, _episode_id: &str) -> Result<ApiResponse<PodcastEpisode>> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.podcast_statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ListenHubError::Api("no scripted status".into())))
    }

    async fn create_flowspeech(
        &self,
        request: &CreateFlowspeechRequest,
    ) -> Result<ApiResponse<EpisodeCreated>> {
        *self.last_flowspeech_request.lock().unwrap() = Some(request.clone());
        self.next_submit()
    }

    async fn flowspeech_episode(
        &self,
        _episode_id: &str,
    ) -> Result<ApiResponse<FlowspeechEpisode>> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.flowspeech_statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ListenHubError::Api("no scripted status".into())))
    }

    async fn user_subscription(&self) -> Result<ApiResponse<UserSubscription>> {
        self.subscription
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ListenHubError::Api("no scripted subscription".into()))
    }
}
