//! Plain-text rendering of episodes, speakers and subscriptions.

use chrono::{DateTime, SecondsFormat};

use crate::client::types::{FlowspeechEpisode, PodcastEpisode, UserSubscription};
use crate::speakers::Speaker;

const NA: &str = "N/A";

/// Millisecond epoch timestamp as RFC 3339 UTC, or `N/A`
pub fn timestamp(ms: Option<i64>) -> String {
    ms.filter(|ms| *ms != 0)
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| NA.to_string())
}

fn seconds(total: u64) -> String {
    if total < 60 {
        format!("{}s", total)
    } else {
        format!("{}m {}s", total / 60, total % 60)
    }
}

/// Elapsed time between two millisecond timestamps
pub fn duration_between(start_ms: Option<i64>, end_ms: Option<i64>) -> String {
    match (start_ms, end_ms) {
        (Some(start), Some(end)) if start != 0 && end != 0 => {
            seconds(((end - start).max(0) / 1000) as u64)
        }
        _ => NA.to_string(),
    }
}

/// Audio length given in (fractional) seconds
pub fn audio_duration(secs: Option<f64>) -> String {
    match secs {
        Some(s) if s > 0.0 => seconds(s.floor() as u64),
        _ => NA.to_string(),
    }
}

fn credits(credits: Option<f64>) -> String {
    credits.map_or_else(|| NA.to_string(), |c| c.to_string())
}

fn opt(value: Option<&str>) -> &str {
    value.unwrap_or(NA)
}

pub fn podcast_episode(episode: &PodcastEpisode) -> String {
    let speakers = match episode.scripts.as_deref() {
        Some(scripts) if !scripts.is_empty() => {
            let mut names: Vec<&str> = Vec::new();
            for script in scripts {
                if !names.contains(&script.speaker_name.as_str()) {
                    names.push(&script.speaker_name);
                }
            }
            names.join(", ")
        }
        _ => NA.to_string(),
    };

    let mut lines = vec![
        format!("**Episode ID**: `{}`", episode.episode_id),
        format!("**Title**: {}", opt(episode.title.as_deref())),
        format!("**Speakers**: {}", speakers),
        format!("**Language**: {}", opt(episode.language.as_deref())),
        format!("**Status**: {}", episode.process_status),
    ];
    if let Some(status) = &episode.content_status {
        lines.push(format!("**Content Status**: {}", status.as_str()));
    }
    lines.extend(common_lines(
        episode.audio_duration,
        episode.created_at,
        episode.completed_time,
        episode.credits,
    ));
    lines.extend(links(
        "Podcast",
        episode.audio_url.as_deref(),
        episode.audio_stream_url.as_deref(),
    ));
    if let Some(outline) = episode.outline.as_deref().filter(|o| !o.is_empty()) {
        lines.extend(section("## 📋 Outline", outline));
    }
    if let Some(scripts) = episode.scripts.as_deref().filter(|s| !s.is_empty()) {
        let text = scripts
            .iter()
            .enumerate()
            .map(|(i, s)| format!("### Speaker {}: {}\n\n{}", i + 1, s.speaker_name, s.content))
            .collect::<Vec<_>>()
            .join("\n\n");
        lines.extend(section("## 📝 Scripts", &text));
    }
    lines.join("\n")
}

pub fn flowspeech_episode(episode: &FlowspeechEpisode) -> String {
    let mut lines = vec![
        format!("**Episode ID**: `{}`", episode.episode_id),
        format!("**Title**: {}", opt(episode.title.as_deref())),
        format!("**Language**: {}", opt(episode.language.as_deref())),
        format!("**Status**: {}", episode.process_status),
    ];
    lines.extend(common_lines(
        episode.audio_duration,
        episode.created_at,
        episode.completed_time,
        episode.credits,
    ));
    lines.extend(links(
        "FlowSpeech",
        episode.audio_url.as_deref(),
        episode.audio_stream_url.as_deref(),
    ));
    if let Some(outline) = episode.outline.as_deref().filter(|o| !o.is_empty()) {
        lines.extend(section("## 📋 Outline", outline));
    }
    if let Some(script) = episode.scripts.as_deref().filter(|s| !s.is_empty()) {
        lines.extend(section("## 📝 Script", script));
    }
    lines.join("\n")
}

fn common_lines(
    audio_secs: Option<f64>,
    created_at: Option<i64>,
    completed: Option<i64>,
    used: Option<f64>,
) -> Vec<String> {
    vec![
        format!("**Audio Duration**: {}", audio_duration(audio_secs)),
        format!("**Generation Time**: {}", duration_between(created_at, completed)),
        format!("**Credits Used**: {}", credits(used)),
        format!("**Created**: {}", timestamp(created_at)),
        format!("**Completed**: {}", timestamp(completed)),
    ]
}

fn links(kind: &str, audio: Option<&str>, stream: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(url) = audio.filter(|u| !u.is_empty()) {
        lines.push(format!("\n🎧 **Audio**: [Listen to {}]({})", kind, url));
    }
    if let Some(url) = stream.filter(|u| !u.is_empty()) {
        lines.push(format!("🔊 **Stream**: [Open Stream]({})", url));
    }
    lines
}

fn section(heading: &str, body: &str) -> Vec<String> {
    vec![
        String::new(),
        "---".to_string(),
        String::new(),
        heading.to_string(),
        String::new(),
        body.to_string(),
    ]
}

pub fn speaker_list(language: &str, speakers: &[Speaker]) -> String {
    if speakers.is_empty() {
        return format!("No speakers available for language: {}", language);
    }
    let table = speakers
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "{}. {}\n   - ID: {}\n   - Language: {}\n   - Gender: {}\n   - Audio Preview: [🎧 Listen to voice sample]({})",
                i + 1,
                s.name,
                s.speaker_id,
                s.language,
                s.gender,
                s.demo_audio_url
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "Found {} available speakers for language: {}\n\nYou can use either the speaker name or speaker ID when creating podcasts.\n\n{}",
        speakers.len(),
        language,
        table
    )
}

pub fn subscription(sub: &UserSubscription) -> String {
    let enabled = |on: bool, yes: &'static str, no: &'static str| if on { yes } else { no };
    [
        "=== Subscription Information ===".to_string(),
        String::new(),
        "** Subscription Period **".to_string(),
        format!("Started: {}", timestamp(sub.subscription_started_at)),
        format!("Expires: {}", timestamp(sub.subscription_expires_at)),
        format!("Reset Date: {}", timestamp(sub.reset_at)),
        String::new(),
        "** Credit Usage **".to_string(),
        format!(
            "Monthly Credits: {} / {} available",
            sub.usage_available_monthly_credits, sub.usage_total_monthly_credits
        ),
        format!(
            "Permanent Credits: {} / {} available",
            sub.usage_available_permanent_credits, sub.usage_total_permanent_credits
        ),
        format!(
            "Limited-Time Credits: {}",
            sub.usage_available_limited_time_credits
        ),
        format!("Total Available Credits: {}", sub.total_available_credits),
        String::new(),
        "** Subscription Plan **".to_string(),
        format!("Plan: {}", sub.subscription_plan.name.to_uppercase()),
        format!("Duration: {}", sub.subscription_plan.duration),
        format!("Platform: {}", sub.subscription_plan.platform),
        String::new(),
        "** Status **".to_string(),
        format!("Auto-Renew: {}", enabled(sub.renew_status, "Enabled", "Disabled")),
        format!("Paid Status: {}", enabled(sub.paid_status, "Active", "Inactive")),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::types::{ContentStatus, PodcastScript};
    use crate::poller::ProcessStatus;

    #[test]
    fn test_timestamp() {
        assert_eq!(timestamp(Some(0)), "N/A");
        assert_eq!(timestamp(None), "N/A");
        assert_eq!(timestamp(Some(1_700_000_000_000)), "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn test_durations() {
        assert_eq!(duration_between(Some(1_000), Some(46_000)), "45s");
        assert_eq!(duration_between(Some(1_000), Some(126_500)), "2m 5s");
        assert_eq!(duration_between(Some(1_000), None), "N/A");
        assert_eq!(audio_duration(Some(59.9)), "59s");
        assert_eq!(audio_duration(Some(600.0)), "10m 0s");
        assert_eq!(audio_duration(Some(0.0)), "N/A");
    }

    #[test]
    fn test_podcast_episode_rendering() {
        let episode = PodcastEpisode {
            episode_id: "E1".into(),
            process_status: ProcessStatus::Success,
            title: Some("Rust Weekly".into()),
            content_status: Some(ContentStatus::AudioSuccess),
            audio_url: Some("https://cdn/e1.mp3".into()),
            scripts: Some(vec![
                PodcastScript {
                    speaker_id: "a".into(),
                    speaker_name: "David".into(),
                    content: "Hello".into(),
                },
                PodcastScript {
                    speaker_id: "b".into(),
                    speaker_name: "Lily".into(),
                    content: "Hi".into(),
                },
                PodcastScript {
                    speaker_id: "a".into(),
                    speaker_name: "David".into(),
                    content: "Bye".into(),
                },
            ]),
            ..PodcastEpisode::default()
        };

        let text = podcast_episode(&episode);
        assert!(text.starts_with("**Episode ID**: `E1`"));
        assert!(text.contains("**Speakers**: David, Lily\n"));
        assert!(text.contains("**Content Status**: audio-success"));
        assert!(text.contains("[Listen to Podcast](https://cdn/e1.mp3)"));
        assert!(text.contains("### Speaker 3: David\n\nBye"));
        assert!(!text.contains("Outline"));
    }

    #[test]
    fn test_flowspeech_episode_rendering() {
        let episode = FlowspeechEpisode {
            episode_id: "F1".into(),
            process_status: ProcessStatus::Pending,
            scripts: Some("Full script".into()),
            ..FlowspeechEpisode::default()
        };
        let text = flowspeech_episode(&episode);
        assert!(text.contains("**Status**: pending"));
        assert!(text.contains("**Credits Used**: N/A"));
        assert!(text.ends_with("## 📝 Script\n\nFull script"));
    }

    #[test]
    fn test_speaker_list() {
        assert_eq!(
            speaker_list("ja", &[]),
            "No speakers available for language: ja"
        );
        let text = speaker_list("en", &[Speaker::new("id-123", "David", "en")]);
        assert!(text.starts_with("Found 1 available speakers for language: en"));
        assert!(text.contains("1. David\n   - ID: id-123"));
    }
}
