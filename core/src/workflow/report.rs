//! Caller-facing outcomes of workflow operations.
//!
//! Every condition a workflow can hit ends up in one of these values; their
//! `Display` output is what the tool layer returns to the agent.

use std::fmt;
use std::time::Duration;

use crate::client::types::{FlowspeechEpisode, PodcastEpisode, UserSubscription};
use crate::format;
use crate::poller::JobStatus;
use crate::speakers::{ResolutionError, Speaker};

use super::JobFamily;

/// Episode payload a report can render
pub trait EpisodeView: JobStatus {
    /// Heading of an immediate status query
    const STATUS_HEADING: &'static str;

    fn episode_id(&self) -> &str;
    fn has_audio(&self) -> bool;
    fn has_outline(&self) -> bool;
    fn has_scripts(&self) -> bool;
    fn render(&self) -> String;
}

impl EpisodeView for PodcastEpisode {
    const STATUS_HEADING: &'static str = "Podcast Episode Information";

    fn episode_id(&self) -> &str {
        &self.episode_id
    }

    fn has_audio(&self) -> bool {
        self.audio_url.as_deref().is_some_and(|u| !u.is_empty())
    }

    fn has_outline(&self) -> bool {
        self.outline.as_deref().is_some_and(|o| !o.is_empty())
    }

    fn has_scripts(&self) -> bool {
        PodcastEpisode::has_scripts(self)
    }

    fn render(&self) -> String {
        format::podcast_episode(self)
    }
}

impl EpisodeView for FlowspeechEpisode {
    const STATUS_HEADING: &'static str = "FlowSpeech Episode Information";

    fn episode_id(&self) -> &str {
        &self.episode_id
    }

    fn has_audio(&self) -> bool {
        self.audio_url.as_deref().is_some_and(|u| !u.is_empty())
    }

    fn has_outline(&self) -> bool {
        self.outline.as_deref().is_some_and(|o| !o.is_empty())
    }

    fn has_scripts(&self) -> bool {
        self.scripts.as_deref().is_some_and(|s| !s.is_empty())
    }

    fn render(&self) -> String {
        format::flowspeech_episode(self)
    }
}

/// Why a workflow stopped before (or while) submitting its job
#[derive(Debug, Clone)]
pub enum AbortReason {
    /// Caller input rejected locally
    Validation(String),
    /// One or more speakers could not be resolved
    Resolution(ResolutionError),
    /// The remote refused the submission
    SubmitRejected { code: i64, message: String },
    /// Submission accepted but no episode id came back
    MissingJobId,
    /// Network or protocol failure outside the poll loop
    Transport(String),
    /// Audio requested for an episode whose text is not ready
    NotReady { content_status: Option<String> },
    /// Precondition lookup of the episode was refused
    StatusRejected(String),
    EpisodeNotFound,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::Validation(msg) => write!(f, "Validation error: {}", msg),
            AbortReason::Resolution(e) => write!(f, "{}", e),
            AbortReason::SubmitRejected { message, .. } => {
                write!(f, "Failed to submit task: {}", message)
            }
            AbortReason::MissingJobId => write!(f, "Failed to submit task: No episodeId returned"),
            AbortReason::Transport(msg) => write!(f, "{}", msg),
            AbortReason::NotReady { content_status } => write!(
                f,
                "Cannot generate audio: Episode contentStatus is {}, must be text-success",
                content_status.as_deref().unwrap_or("unknown")
            ),
            AbortReason::StatusRejected(msg) => write!(f, "Failed to query episode: {}", msg),
            AbortReason::EpisodeNotFound => write!(f, "Episode not found"),
        }
    }
}

/// Terminal report of one job workflow
#[derive(Debug, Clone)]
pub enum JobReport<T> {
    Completed {
        family: JobFamily,
        episode: T,
    },
    /// Submitted without waiting for completion
    Submitted {
        family: JobFamily,
        episode_id: String,
    },
    Failed {
        family: JobFamily,
        episode_id: String,
        reason: String,
    },
    /// Poll budget spent; the job keeps running remotely
    StillProcessing {
        family: JobFamily,
        episode_id: String,
        last_status: String,
        waited: Duration,
    },
    /// A status fetch failed mid-poll
    Errored {
        family: JobFamily,
        episode_id: String,
        error: String,
    },
    Aborted {
        family: JobFamily,
        reason: AbortReason,
    },
}

impl<T> JobReport<T> {
    pub fn family(&self) -> JobFamily {
        match self {
            JobReport::Completed { family, .. }
            | JobReport::Submitted { family, .. }
            | JobReport::Failed { family, .. }
            | JobReport::StillProcessing { family, .. }
            | JobReport::Errored { family, .. }
            | JobReport::Aborted { family, .. } => *family,
        }
    }

    /// Episode id, once the job was submitted
    pub fn episode_id(&self) -> Option<&str>
    where
        T: EpisodeView,
    {
        match self {
            JobReport::Completed { episode, .. } => Some(episode.episode_id()),
            JobReport::Submitted { episode_id, .. }
            | JobReport::Failed { episode_id, .. }
            | JobReport::StillProcessing { episode_id, .. }
            | JobReport::Errored { episode_id, .. } => Some(episode_id),
            JobReport::Aborted { .. } => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, JobReport::Completed { .. })
    }

    /// Whether the report describes a failure (timeouts and submissions are not)
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            JobReport::Failed { .. } | JobReport::Errored { .. } | JobReport::Aborted { .. }
        )
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn see_below(flag: bool) -> &'static str {
    if flag {
        "Yes (see below)"
    } else {
        "No"
    }
}

fn waited_for(waited: Duration) -> String {
    let secs = waited.as_secs();
    match secs {
        s if s >= 60 && s % 60 == 0 => format!("{} minutes", s / 60),
        s => format!("{} seconds", s),
    }
}

impl<T: EpisodeView> fmt::Display for JobReport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobReport::Completed { family, episode } => match family {
                JobFamily::Podcast => write!(
                    f,
                    "Podcast Generation Completed\n\nContent Included:\n- Basic Info: Episode ID, Title, Speakers, Language, Status\n- Audio Files: {}\n- Outline: {}\n- Scripts: {}\n\n{}",
                    yes_no(episode.has_audio()),
                    see_below(episode.has_outline()),
                    see_below(episode.has_scripts()),
                    episode.render()
                ),
                JobFamily::PodcastText => write!(
                    f,
                    "Podcast Text Generation Completed\n\nContent Generated:\n- Outline: {}\n- Scripts: {}\n\n{}\n\nNext step: Use generate_podcast_audio to create audio from these scripts.",
                    see_below(episode.has_outline()),
                    see_below(episode.has_scripts()),
                    episode.render()
                ),
                JobFamily::PodcastAudio => write!(
                    f,
                    "Podcast Audio Generation Completed\n\nContent Included:\n- Audio Files: {}\n- Outline: {}\n- Scripts: {}\n\n{}",
                    yes_no(episode.has_audio()),
                    see_below(episode.has_outline()),
                    see_below(episode.has_scripts()),
                    episode.render()
                ),
                JobFamily::Flowspeech => write!(
                    f,
                    "FlowSpeech Generation Completed\n\n{}",
                    episode.render()
                ),
            },
            JobReport::Submitted { family, episode_id } => write!(
                f,
                "{} started\n\nEpisode ID: {}\nStatus: pending\n\nUse {} to check progress.",
                family.label(),
                episode_id,
                family.status_tool()
            ),
            JobReport::Failed { family, reason, .. } => {
                write!(f, "{} failed: {}", family.label(), reason)
            }
            JobReport::StillProcessing {
                family,
                episode_id,
                last_status,
                waited,
            } => write!(
                f,
                "Task is still processing after {}.\n\nEpisode ID: {}\nLast Status: {}\n\nThe task is running in the background. Use {} tool with this Episode ID to check progress.",
                waited_for(*waited),
                episode_id,
                last_status,
                family.status_tool()
            ),
            JobReport::Errored {
                family,
                episode_id,
                error,
            } => write!(
                f,
                "{} status check failed: {}\n\nEpisode ID: {}\n\nThe task may still be running. Use {} tool with this Episode ID to check progress.",
                family.label(),
                error,
                episode_id,
                family.status_tool()
            ),
            JobReport::Aborted { family, reason } => match reason {
                AbortReason::Resolution(_) | AbortReason::Transport(_) => {
                    write!(f, "Failed to {}: {}", family.action(), reason)
                }
                AbortReason::SubmitRejected { message, .. } if *family == JobFamily::PodcastAudio => {
                    write!(f, "Failed to start audio generation: {}", message)
                }
                other => write!(f, "{}", other),
            },
        }
    }
}

/// Result of an immediate (non-polling) query
#[derive(Debug, Clone)]
pub enum Lookup<T> {
    Found(T),
    /// Non-zero envelope code, with the remote message
    Rejected(String),
    NotFound,
    /// Transport failure
    Errored(String),
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn found(&self) -> Option<&T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }
}

/// One catalog partition, as listed by the speakers query
#[derive(Debug, Clone)]
pub struct SpeakerListing {
    pub language: String,
    pub speakers: Vec<Speaker>,
}

fn fmt_episode_lookup<T: EpisodeView>(lookup: &Lookup<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match lookup {
        Lookup::Found(episode) => write!(f, "{}\n\n{}", T::STATUS_HEADING, episode.render()),
        Lookup::Rejected(msg) => write!(f, "Failed to query episode: {}", msg),
        Lookup::NotFound => write!(f, "Episode not found"),
        Lookup::Errored(e) => write!(f, "Failed to query episode status: {}", e),
    }
}

impl fmt::Display for Lookup<PodcastEpisode> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_episode_lookup(self, f)
    }
}

impl fmt::Display for Lookup<FlowspeechEpisode> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_episode_lookup(self, f)
    }
}

impl fmt::Display for Lookup<SpeakerListing> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Found(listing) => {
                write!(f, "{}", format::speaker_list(&listing.language, &listing.speakers))
            }
            Lookup::Rejected(msg) => write!(f, "Error: {}", msg),
            Lookup::NotFound => write!(f, "No speakers available"),
            Lookup::Errored(e) => write!(f, "Failed to get speakers: {}", e),
        }
    }
}

impl fmt::Display for Lookup<UserSubscription> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Found(sub) => write!(f, "{}", format::subscription(sub)),
            Lookup::Rejected(msg) => write!(f, "Failed to query subscription: {}", msg),
            Lookup::NotFound => write!(f, "No subscription data available"),
            Lookup::Errored(e) => write!(f, "Failed to query user subscription: {}", e),
        }
    }
}
