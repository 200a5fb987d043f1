use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::poller::PollOptions;
use crate::speakers::{ResolutionPolicy, DEFAULT_MIN_CANONICAL_LEN, DEFAULT_SEPARATOR};
use crate::{ListenHubError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.marswave.ai/openapi";
pub const DEFAULT_CONFIG_FILE: &str = "listenhub.toml";
pub const SPEAKERS_HINT: &str = "Use get_speakers tool to see all available speakers.";

/// Runtime configuration of a ListenHub session
#[derive(Clone, Debug)]
pub struct ListenHubConfig {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub speaker_cache_ttl_secs: u64,
    /// Catalog partitions fetched, in merge order
    pub catalog_languages: Vec<String>,
    /// Language used when neither the caller nor the speaker names one
    pub default_language: String,
    pub resolution: ResolutionPolicy,
    pub polling: PollingConfig,
}

/// Poll budgets per job family
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollingConfig {
    pub interval_ms: u64,
    pub podcast_max_retries: u32,
    pub flowspeech_max_retries: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5_000,
            podcast_max_retries: 60,
            flowspeech_max_retries: 120,
        }
    }
}

impl PollingConfig {
    pub fn podcast_options(&self) -> PollOptions {
        PollOptions::new(
            Duration::from_millis(self.interval_ms),
            self.podcast_max_retries,
        )
    }

    pub fn flowspeech_options(&self) -> PollOptions {
        PollOptions::new(
            Duration::from_millis(self.interval_ms),
            self.flowspeech_max_retries,
        )
    }
}

impl Default for ListenHubConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 30_000,
            speaker_cache_ttl_secs: 600,
            catalog_languages: vec!["zh".to_string(), "en".to_string()],
            default_language: "zh".to_string(),
            resolution: ResolutionPolicy {
                separator: DEFAULT_SEPARATOR,
                min_canonical_len: DEFAULT_MIN_CANONICAL_LEN,
                hint: Some(SPEAKERS_HINT.to_string()),
            },
            polling: PollingConfig::default(),
        }
    }
}

impl ListenHubConfig {
    /// Defaults overlaid with process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with variables from `lookup`; empty values are ignored
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = var("LISTENHUB_API_KEY") {
            config.api_key = v;
        }
        if let Some(v) = var("LISTENHUB_BASE_URL") {
            config.base_url = v;
        }
        if let Some(v) = var("LISTENHUB_REQUEST_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            config.request_timeout_ms = v;
        }
        if let Some(v) = var("LISTENHUB_SPEAKER_CACHE_TTL_SECS").and_then(|v| v.parse().ok()) {
            config.speaker_cache_ttl_secs = v;
        }
        if let Some(v) = var("LISTENHUB_LANGUAGES") {
            config.catalog_languages = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        config
    }

    /// Load configuration from a TOML file (path via LISTENHUB_CONFIG or
    /// ./listenhub.toml), overlaying values onto env-driven defaults.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var("LISTENHUB_CONFIG")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        Self::load_from(explicit.as_deref())
    }

    /// Like `load`, with an explicit TOML path. A missing explicit file is an
    /// error; a missing default file is not.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let base = Self::from_env();
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !path.exists() {
            if required {
                return Err(ListenHubError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            tracing::info!(target: "config", path = %path.display(), "No TOML config found; using defaults/env");
            return Ok(base);
        }

        let text = fs::read_to_string(&path)?;
        let config = Self::overlay_toml(base, &text)?;
        tracing::info!(target: "config", path = %path.display(), "Loaded TOML config");
        Ok(config)
    }

    /// Apply a TOML document on top of `base`
    pub fn overlay_toml(base: Self, text: &str) -> Result<Self> {
        let parsed: ListenHubToml = toml::from_str(text)
            .map_err(|e| ListenHubError::Config(format!("Failed to parse TOML: {}", e)))?;
        Ok(parsed.overlay(base))
    }

    /// Reject configurations the session cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ListenHubError::Config(
                "LISTENHUB_API_KEY environment variable is required".to_string(),
            ));
        }
        if self.catalog_languages.is_empty() {
            return Err(ListenHubError::Config(
                "catalog_languages must name at least one language".to_string(),
            ));
        }
        if self.polling.interval_ms == 0 {
            return Err(ListenHubError::Config(
                "polling.interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn speaker_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.speaker_cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct ListenHubToml {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub speaker_cache_ttl_secs: Option<u64>,
    pub catalog_languages: Option<Vec<String>>,
    pub default_language: Option<String>,
    pub resolution: Option<ResolutionToml>,
    pub polling: Option<PollingToml>,
}

impl ListenHubToml {
    fn overlay(self, mut base: ListenHubConfig) -> ListenHubConfig {
        if let Some(v) = self.api_key {
            base.api_key = v;
        }
        if let Some(v) = self.base_url {
            base.base_url = v;
        }
        if let Some(v) = self.request_timeout_ms {
            base.request_timeout_ms = v;
        }
        if let Some(v) = self.speaker_cache_ttl_secs {
            base.speaker_cache_ttl_secs = v;
        }
        if let Some(v) = self.catalog_languages {
            base.catalog_languages = v;
        }
        if let Some(v) = self.default_language {
            base.default_language = v;
        }
        if let Some(r) = self.resolution {
            r.apply(&mut base.resolution);
        }
        if let Some(p) = self.polling {
            p.apply(&mut base.polling);
        }
        base
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct ResolutionToml {
    pub separator: Option<char>,
    pub min_canonical_len: Option<usize>,
    pub hint: Option<String>,
}
impl ResolutionToml {
    fn apply(self, r: &mut ResolutionPolicy) {
        if let Some(v) = self.separator {
            r.separator = v;
        }
        if let Some(v) = self.min_canonical_len {
            r.min_canonical_len = v;
        }
        if let Some(v) = self.hint {
            // an empty hint disables it
            r.hint = (!v.is_empty()).then_some(v);
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct PollingToml {
    pub interval_ms: Option<u64>,
    pub podcast_max_retries: Option<u32>,
    pub flowspeech_max_retries: Option<u32>,
}
impl PollingToml {
    fn apply(self, p: &mut PollingConfig) {
        if let Some(v) = self.interval_ms {
            p.interval_ms = v;
        }
        if let Some(v) = self.podcast_max_retries {
            p.podcast_max_retries = v;
        }
        if let Some(v) = self.flowspeech_max_retries {
            p.flowspeech_max_retries = v;
        }
    }
}
