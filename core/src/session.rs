//! Explicit per-process session state.
//!
//! A `Session` owns the remote endpoint handle, the speaker catalog cache and
//! the resolution policy. It is cheap to clone and is passed to every
//! workflow call instead of living in a global.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::client::{HttpEndpoint, RemoteEndpoint};
use crate::client::http::EndpointConfig;
use crate::config::{ListenHubConfig, PollingConfig};
use crate::speakers::{merge_partitions, ResolvedSpeaker, Speaker, SpeakerResolver, ALL_SPEAKERS_KEY};
use crate::Result;

#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    endpoint: Arc<dyn RemoteEndpoint>,
    speaker_cache: TtlCache<Arc<[Speaker]>>,
    resolver: SpeakerResolver,
    catalog_languages: Vec<String>,
    default_language: String,
    polling: PollingConfig,
    request_timeout: Duration,
}

impl Session {
    /// Session over an arbitrary endpoint
    pub fn new(endpoint: Arc<dyn RemoteEndpoint>, config: &ListenHubConfig) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                endpoint,
                speaker_cache: TtlCache::new(config.speaker_cache_ttl()),
                resolver: SpeakerResolver::new(config.resolution.clone()),
                catalog_languages: config.catalog_languages.clone(),
                default_language: config.default_language.clone(),
                polling: config.polling.clone(),
                request_timeout: config.request_timeout(),
            }),
        }
    }

    /// Validate `config` and connect through the HTTP endpoint
    pub fn from_config(config: &ListenHubConfig) -> Result<Self> {
        config.validate()?;
        let endpoint = HttpEndpoint::new(EndpointConfig::from(config))?;
        info!(target: "session", base_url = %config.base_url, "ListenHub session ready");
        Ok(Self::new(Arc::new(endpoint), config))
    }

    pub fn endpoint(&self) -> &dyn RemoteEndpoint {
        self.inner.endpoint.as_ref()
    }

    pub fn resolver(&self) -> &SpeakerResolver {
        &self.inner.resolver
    }

    pub fn polling(&self) -> &PollingConfig {
        &self.inner.polling
    }

    /// Upper bound of a single remote request
    pub fn request_timeout(&self) -> Duration {
        self.inner.request_timeout
    }

    pub fn default_language(&self) -> &str {
        &self.inner.default_language
    }

    /// Merged catalog across all configured languages, served from the cache
    /// while fresh.
    pub async fn catalog(&self) -> Result<Arc<[Speaker]>> {
        if let Some(cached) = self.inner.speaker_cache.get(ALL_SPEAKERS_KEY) {
            debug!(target: "speakers", count = cached.len(), "Speaker catalog cache hit");
            return Ok(cached);
        }

        let mut partitions = Vec::with_capacity(self.inner.catalog_languages.len());
        for language in &self.inner.catalog_languages {
            let response = self.endpoint().list_speakers(Some(language)).await?;
            if !response.is_ok() {
                warn!(
                    target: "speakers",
                    language = %language,
                    code = response.code,
                    "Speaker partition rejected, skipping"
                );
                continue;
            }
            match response.data {
                Some(list) if !list.items.is_empty() => partitions.push(list.items),
                _ => debug!(target: "speakers", language = %language, "Empty speaker partition"),
            }
        }

        let merged: Arc<[Speaker]> = merge_partitions(partitions).into();
        info!(target: "speakers", count = merged.len(), "Speaker catalog refreshed");
        self.inner
            .speaker_cache
            .set(ALL_SPEAKERS_KEY, Arc::clone(&merged));
        Ok(merged)
    }

    /// Cached catalog, optionally restricted to one language
    pub async fn cached_speakers(&self, language: Option<&str>) -> Result<Vec<Speaker>> {
        let catalog = self.catalog().await?;
        Ok(catalog
            .iter()
            .filter(|s| language.map_or(true, |l| s.language == l))
            .cloned()
            .collect())
    }

    pub async fn speaker_by_id(&self, speaker_id: &str) -> Result<Option<Speaker>> {
        let catalog = self.catalog().await?;
        Ok(catalog.iter().find(|s| s.speaker_id == speaker_id).cloned())
    }

    /// Resolve loose identifiers to canonical ids.
    ///
    /// The catalog is only fetched when at least one input does not qualify for
    /// the canonical-id shortcut.
    pub async fn resolve_speakers<S: AsRef<str>>(&self, raws: &[S]) -> Result<Vec<ResolvedSpeaker>> {
        let resolver = &self.inner.resolver;
        let resolved = if resolver.policy().needs_catalog(raws) {
            let catalog = self.catalog().await?;
            resolver.resolve_all(raws, &catalog)?
        } else {
            resolver.resolve_all(raws, &[])?
        };

        for speaker in resolved.iter().filter(|s| s.resolved_from.is_some()) {
            debug!(
                target: "speakers",
                from = ?speaker.resolved_from,
                speaker_id = %speaker.speaker_id,
                "Resolved speaker"
            );
        }
        Ok(resolved)
    }

    pub fn clear_speaker_cache(&self) {
        self.inner.speaker_cache.clear();
    }
}
