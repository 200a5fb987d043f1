//! Job workflows: resolve speakers, submit, poll, report.
//!
//! Each operation is the final handler for everything that can go wrong in it
//! and returns a report value rather than an error.

pub mod report;

pub use report::{AbortReason, EpisodeView, JobReport, Lookup, SpeakerListing};

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::client::types::*;
use crate::config::PollingConfig;
use crate::poller::{JobPoller, PollOptions, PollOutcome};
use crate::session::Session;
use crate::speakers::ResolvedSpeaker;
use crate::{ListenHubError, Result};

/// Kind of remote job a workflow drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobFamily {
    /// Full podcast, text and audio
    Podcast,
    /// Podcast text only
    PodcastText,
    /// Audio for an existing podcast text
    PodcastAudio,
    /// Speech generated from a source
    Flowspeech,
}

impl JobFamily {
    pub fn label(&self) -> &'static str {
        match self {
            JobFamily::Podcast => "Podcast generation",
            JobFamily::PodcastText => "Podcast text generation",
            JobFamily::PodcastAudio => "Audio generation",
            JobFamily::Flowspeech => "FlowSpeech generation",
        }
    }

    /// Verb phrase used in abort messages
    pub fn action(&self) -> &'static str {
        match self {
            JobFamily::Podcast => "create podcast",
            JobFamily::PodcastText => "create podcast text",
            JobFamily::PodcastAudio => "generate podcast audio",
            JobFamily::Flowspeech => "create FlowSpeech",
        }
    }

    /// Tool that queries this family's status without polling
    pub fn status_tool(&self) -> &'static str {
        match self {
            JobFamily::Flowspeech => "get_flowspeech_status",
            _ => "get_podcast_status",
        }
    }

    pub fn poll_options(&self, polling: &PollingConfig) -> PollOptions {
        match self {
            JobFamily::Flowspeech => polling.flowspeech_options(),
            _ => polling.podcast_options(),
        }
    }

    /// Allowed number of speakers
    pub fn speaker_range(&self) -> (usize, usize) {
        match self {
            JobFamily::Flowspeech => (1, 1),
            _ => (1, 2),
        }
    }
}

/// Parameters of the podcast families (full and text only)
#[derive(Debug, Clone, Default)]
pub struct PodcastParams {
    pub query: Option<String>,
    pub sources: Vec<Source>,
    /// Speaker names or ids, resolved before submission
    pub speakers: Vec<String>,
    pub language: Option<String>,
    pub mode: PodcastMode,
    pub wait_for_completion: bool,
}

/// Parameters of audio generation for an existing episode
#[derive(Debug, Clone, Default)]
pub struct AudioParams {
    pub episode_id: String,
    pub custom_scripts: Option<Vec<ScriptLine>>,
    pub wait_for_completion: bool,
}

#[derive(Debug, Clone)]
pub struct FlowspeechParams {
    pub source: Source,
    pub speaker: String,
    pub language: Option<String>,
    pub mode: FlowspeechMode,
}

fn check_count(family: JobFamily, count: usize) -> std::result::Result<(), String> {
    let (min, max) = family.speaker_range();
    if count < min {
        return Err(format!("At least {} speaker(s) required", min));
    }
    if count > max {
        return Err(format!("Maximum {} speaker(s) allowed", max));
    }
    Ok(())
}

fn validate_speakers(
    family: JobFamily,
    speakers: &[ResolvedSpeaker],
) -> std::result::Result<(), String> {
    check_count(family, speakers.len())?;
    let unique: HashSet<&str> = speakers.iter().map(|s| s.speaker_id.as_str()).collect();
    if unique.len() != speakers.len() {
        return Err("Duplicate speakers are not allowed".to_string());
    }
    Ok(())
}

/// Resolve and validate speakers, or produce the abort reason
async fn prepare_speakers(
    session: &Session,
    family: JobFamily,
    raws: &[String],
) -> std::result::Result<Vec<ResolvedSpeaker>, AbortReason> {
    // count is checked before any catalog fetch
    check_count(family, raws.len()).map_err(AbortReason::Validation)?;

    let resolved = session.resolve_speakers(raws).await.map_err(|e| match e {
        ListenHubError::Resolution(e) => AbortReason::Resolution(e),
        other => AbortReason::Transport(other.to_string()),
    })?;
    validate_speakers(family, &resolved).map_err(AbortReason::Validation)?;
    Ok(resolved)
}

/// Explicit language, else the first speaker's catalog language, else the
/// session default.
async fn infer_language(
    session: &Session,
    explicit: Option<String>,
    speakers: &[ResolvedSpeaker],
) -> String {
    if let Some(language) = explicit.filter(|l| !l.is_empty()) {
        return language;
    }
    if let Some(first) = speakers.first() {
        match session.speaker_by_id(&first.speaker_id).await {
            Ok(Some(speaker)) if !speaker.language.is_empty() => return speaker.language,
            Ok(_) => {}
            Err(e) => {
                warn!(target: "workflow", error = %e, "Speaker lookup failed, using default language")
            }
        }
    }
    session.default_language().to_string()
}

/// Envelope of a status fetch inside a poll loop
fn status_payload<T>(response: ApiResponse<T>) -> Result<T> {
    if !response.is_ok() {
        return Err(ListenHubError::Api(
            response
                .message
                .unwrap_or_else(|| "Failed to query status".to_string()),
        ));
    }
    response
        .data
        .ok_or_else(|| ListenHubError::MissingData("No episode data returned".to_string()))
}

async fn fetch_podcast(session: &Session, episode_id: &str) -> Result<PodcastEpisode> {
    status_payload(session.endpoint().podcast_episode(episode_id).await?)
}

async fn fetch_flowspeech(session: &Session, episode_id: &str) -> Result<FlowspeechEpisode> {
    status_payload(session.endpoint().flowspeech_episode(episode_id).await?)
}

/// Episode id from a submission envelope
fn submitted_id(
    response: Result<ApiResponse<EpisodeCreated>>,
) -> std::result::Result<String, AbortReason> {
    let response = response.map_err(|e| AbortReason::Transport(e.to_string()))?;
    if !response.is_ok() {
        return Err(AbortReason::SubmitRejected {
            code: response.code,
            message: response.message_or_unknown().to_string(),
        });
    }
    response
        .data
        .and_then(|d| d.episode_id)
        .filter(|id| !id.is_empty())
        .ok_or(AbortReason::MissingJobId)
}

fn into_report<T: EpisodeView>(
    family: JobFamily,
    episode_id: String,
    options: PollOptions,
    outcome: Result<PollOutcome<T>>,
) -> JobReport<T> {
    match outcome {
        Ok(PollOutcome::Success(episode)) => {
            info!(target: "workflow", family = ?family, episode_id = %episode_id, "Job completed");
            JobReport::Completed { family, episode }
        }
        Ok(PollOutcome::Failed { reason, .. }) => {
            warn!(target: "workflow", family = ?family, episode_id = %episode_id, reason = %reason, "Job failed");
            JobReport::Failed {
                family,
                episode_id,
                reason,
            }
        }
        Ok(PollOutcome::TimedOut { last_status }) => {
            warn!(target: "workflow", family = ?family, episode_id = %episode_id, last_status = %last_status, "Job still processing");
            JobReport::StillProcessing {
                family,
                episode_id,
                last_status,
                waited: options.budget(),
            }
        }
        Err(e) => {
            warn!(target: "workflow", family = ?family, episode_id = %episode_id, error = %e, "Status polling errored");
            JobReport::Errored {
                family,
                episode_id,
                error: e.to_string(),
            }
        }
    }
}

/// Drive the poller over a podcast episode
async fn poll_podcast<P>(
    session: &Session,
    family: JobFamily,
    episode_id: String,
    on_progress: &mut P,
) -> JobReport<PodcastEpisode>
where
    P: FnMut(&str, u32) + Send,
{
    let options = family.poll_options(session.polling());
    let id = episode_id.as_str();
    let outcome = JobPoller::new(options)
        .on_progress(|status, retry| {
            debug!(target: "workflow", episode_id = %id, status = %status, retry = %format!("{}/{}", retry, options.max_retries), "{} in progress", family.label());
            on_progress(status, retry);
        })
        .run(move || fetch_podcast(session, id))
        .await;
    into_report(family, episode_id, options, outcome)
}

async fn submit_podcast<P>(
    session: &Session,
    family: JobFamily,
    params: PodcastParams,
    mut on_progress: P,
) -> JobReport<PodcastEpisode>
where
    P: FnMut(&str, u32) + Send,
{
    let abort = |reason| JobReport::Aborted { family, reason };

    if params.query.as_deref().map_or(true, str::is_empty) && params.sources.is_empty() {
        return abort(AbortReason::Validation(
            "Either query or sources must be provided".to_string(),
        ));
    }

    let speakers = match prepare_speakers(session, family, &params.speakers).await {
        Ok(speakers) => speakers,
        Err(reason) => return abort(reason),
    };
    let language = infer_language(session, params.language, &speakers).await;

    let request = CreatePodcastRequest {
        query: params.query.filter(|q| !q.is_empty()),
        sources: (!params.sources.is_empty()).then_some(params.sources),
        speakers: speakers
            .iter()
            .map(|s| SpeakerRef {
                speaker_id: s.speaker_id.clone(),
            })
            .collect(),
        language: Some(language),
        mode: Some(params.mode),
    };
    info!(
        target: "workflow",
        family = ?family,
        speakers = request.speakers.len(),
        language = ?request.language,
        mode = params.mode.as_str(),
        "Submitting podcast job"
    );

    let response = match family {
        JobFamily::PodcastText => session.endpoint().create_podcast_text_only(&request).await,
        _ => session.endpoint().create_podcast(&request).await,
    };
    let episode_id = match submitted_id(response) {
        Ok(id) => id,
        Err(reason) => return abort(reason),
    };
    info!(target: "workflow", family = ?family, episode_id = %episode_id, "Job submitted");

    if !params.wait_for_completion {
        return JobReport::Submitted { family, episode_id };
    }
    poll_podcast(session, family, episode_id, &mut on_progress).await
}

/// Full podcast generation (text and audio)
#[tracing::instrument(skip_all, fields(speakers = ?params.speakers))]
pub async fn create_podcast<P>(
    session: &Session,
    params: PodcastParams,
    on_progress: P,
) -> JobReport<PodcastEpisode>
where
    P: FnMut(&str, u32) + Send,
{
    submit_podcast(session, JobFamily::Podcast, params, on_progress).await
}

/// First stage of two-stage generation: text only
#[tracing::instrument(skip_all, fields(speakers = ?params.speakers))]
pub async fn create_podcast_text_only<P>(
    session: &Session,
    params: PodcastParams,
    on_progress: P,
) -> JobReport<PodcastEpisode>
where
    P: FnMut(&str, u32) + Send,
{
    submit_podcast(session, JobFamily::PodcastText, params, on_progress).await
}

/// Second stage: audio for an episode whose text succeeded
#[tracing::instrument(skip_all, fields(episode_id = %params.episode_id))]
pub async fn generate_podcast_audio<P>(
    session: &Session,
    params: AudioParams,
    mut on_progress: P,
) -> JobReport<PodcastEpisode>
where
    P: FnMut(&str, u32) + Send,
{
    let family = JobFamily::PodcastAudio;
    let abort = |reason| JobReport::Aborted { family, reason };

    let current = match session.endpoint().podcast_episode(&params.episode_id).await {
        Ok(response) if !response.is_ok() => {
            return abort(AbortReason::StatusRejected(
                response.message_or_unknown().to_string(),
            ))
        }
        Ok(response) => match response.data {
            Some(episode) => episode,
            None => return abort(AbortReason::EpisodeNotFound),
        },
        Err(e) => return abort(AbortReason::Transport(e.to_string())),
    };

    if current.content_status != Some(ContentStatus::TextSuccess) {
        return abort(AbortReason::NotReady {
            content_status: current.content_status.map(|s| s.as_str().to_string()),
        });
    }

    let request = GeneratePodcastAudioRequest {
        scripts: params.custom_scripts.filter(|s| !s.is_empty()),
    };
    match session
        .endpoint()
        .generate_podcast_audio(&params.episode_id, &request)
        .await
    {
        Ok(response) if !response.is_ok() => {
            return abort(AbortReason::SubmitRejected {
                code: response.code,
                message: response.message_or_unknown().to_string(),
            })
        }
        Ok(_) => {}
        Err(e) => return abort(AbortReason::Transport(e.to_string())),
    }
    info!(target: "workflow", episode_id = %params.episode_id, custom_scripts = request.scripts.is_some(), "Audio generation submitted");

    if !params.wait_for_completion {
        return JobReport::Submitted {
            family,
            episode_id: params.episode_id,
        };
    }
    poll_podcast(session, family, params.episode_id, &mut on_progress).await
}

/// Speech from a single text or URL source
#[tracing::instrument(skip_all, fields(speaker = %params.speaker))]
pub async fn create_flowspeech<P>(
    session: &Session,
    params: FlowspeechParams,
    mut on_progress: P,
) -> JobReport<FlowspeechEpisode>
where
    P: FnMut(&str, u32) + Send,
{
    let family = JobFamily::Flowspeech;
    let abort = |reason| JobReport::Aborted { family, reason };

    if params.source.content.trim().is_empty() {
        return abort(AbortReason::Validation(
            "Source content must not be empty".to_string(),
        ));
    }

    let speakers = match prepare_speakers(session, family, &[params.speaker]).await {
        Ok(speakers) => speakers,
        Err(reason) => return abort(reason),
    };
    let language = infer_language(session, params.language, &speakers).await;

    let request = CreateFlowspeechRequest {
        sources: vec![params.source],
        speakers: speakers
            .iter()
            .map(|s| SpeakerRef {
                speaker_id: s.speaker_id.clone(),
            })
            .collect(),
        language: Some(language),
        mode: Some(params.mode),
    };
    info!(
        target: "workflow",
        language = ?request.language,
        mode = params.mode.as_str(),
        "Submitting FlowSpeech job"
    );

    let episode_id = match submitted_id(session.endpoint().create_flowspeech(&request).await) {
        Ok(id) => id,
        Err(reason) => return abort(reason),
    };
    info!(target: "workflow", episode_id = %episode_id, "FlowSpeech job submitted");

    let options = family.poll_options(session.polling());
    let id = episode_id.as_str();
    let outcome = JobPoller::new(options)
        .on_progress(|status, retry| {
            debug!(target: "workflow", episode_id = %id, status = %status, retry = %format!("{}/{}", retry, options.max_retries), "FlowSpeech generation in progress");
            on_progress(status, retry);
        })
        .run(move || fetch_flowspeech(session, id))
        .await;
    into_report(family, episode_id, options, outcome)
}

fn lookup<T>(response: Result<ApiResponse<T>>) -> Lookup<T> {
    match response {
        Ok(response) if !response.is_ok() => {
            Lookup::Rejected(response.message_or_unknown().to_string())
        }
        Ok(response) => response.data.map_or(Lookup::NotFound, Lookup::Found),
        Err(e) => Lookup::Errored(e.to_string()),
    }
}

/// Current podcast episode state, without polling
pub async fn podcast_status(session: &Session, episode_id: &str) -> Lookup<PodcastEpisode> {
    debug!(target: "workflow", episode_id = %episode_id, "Querying podcast status");
    lookup(session.endpoint().podcast_episode(episode_id).await)
}

/// Current FlowSpeech episode state, without polling
pub async fn flowspeech_status(session: &Session, episode_id: &str) -> Lookup<FlowspeechEpisode> {
    debug!(target: "workflow", episode_id = %episode_id, "Querying FlowSpeech status");
    lookup(session.endpoint().flowspeech_episode(episode_id).await)
}

/// One catalog partition, fetched directly (uncached)
pub async fn speakers(session: &Session, language: &str) -> Lookup<SpeakerListing> {
    debug!(target: "workflow", language = %language, "Listing speakers");
    match lookup(session.endpoint().list_speakers(Some(language)).await) {
        Lookup::Found(list) => Lookup::Found(SpeakerListing {
            language: language.to_string(),
            speakers: list.items,
        }),
        // a missing payload is an empty partition
        Lookup::NotFound => Lookup::Found(SpeakerListing {
            language: language.to_string(),
            speakers: Vec::new(),
        }),
        Lookup::Rejected(msg) => Lookup::Rejected(msg),
        Lookup::Errored(e) => Lookup::Errored(e),
    }
}

pub async fn subscription(session: &Session) -> Lookup<UserSubscription> {
    lookup(session.endpoint().user_subscription().await)
}
