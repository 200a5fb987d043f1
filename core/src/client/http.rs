use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, warn};

use super::types::*;
use super::RemoteEndpoint;
use crate::config::ListenHubConfig;
use crate::{ListenHubError, Result};

/// Speaker status filter for published voices
const SPEAKER_STATUS_PUBLISHED: &str = "3";

/// Connection settings of the HTTP endpoint
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_ms: 30_000,
            user_agent: format!("listenhub-mcp-server/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl From<&ListenHubConfig> for EndpointConfig {
    fn from(config: &ListenHubConfig) -> Self {
        Self {
            timeout_ms: config.request_timeout_ms,
            ..Self::new(config.base_url.clone(), config.api_key.clone())
        }
    }
}

/// `RemoteEndpoint` over the ListenHub REST API
pub struct HttpEndpoint {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpEndpoint {
    pub fn new(config: EndpointConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| ListenHubError::Config(format!("Invalid API key: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| ListenHubError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<ApiResponse<T>> {
        let response = request.send().await.map_err(|e| {
            error!(target: "listenhub_http", error = %e, "Request failed");
            transport_error(&e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(target: "listenhub_http", status = %status, "API returned error status");
            return Err(status_error(status, &body));
        }

        response.json::<ApiResponse<T>>().await.map_err(|e| {
            warn!(target: "listenhub_http", error = %e, "Failed to parse API response");
            ListenHubError::Http {
                status: Some(status.as_u16()),
                message: format!("Failed to parse response: {}", e),
            }
        })
    }
}

/// Map a reqwest failure that produced no HTTP response
fn transport_error(e: &reqwest::Error) -> ListenHubError {
    let message = if e.is_builder() {
        format!("Request setup error: {}", e)
    } else {
        "Network error: No response received from server".to_string()
    };
    ListenHubError::Http {
        status: None,
        message,
    }
}

/// Map a non-2xx response, preferring the `message` field of a JSON body
pub(crate) fn status_error(status: StatusCode, body: &str) -> ListenHubError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown status")
            )
        });
    ListenHubError::Http {
        status: Some(status.as_u16()),
        message,
    }
}

#[async_trait]
impl RemoteEndpoint for HttpEndpoint {
    async fn list_speakers(&self, language: Option<&str>) -> Result<ApiResponse<SpeakerList>> {
        debug!(target: "listenhub_http", language = ?language, "Listing speakers");
        let mut query = vec![("status", SPEAKER_STATUS_PUBLISHED)];
        if let Some(language) = language {
            query.push(("language", language));
        }
        self.send(
            self.http_client
                .get(self.url("/v1/speakers/list"))
                .query(&query),
        )
        .await
    }

    async fn create_podcast(
        &self,
        request: &CreatePodcastRequest,
    ) -> Result<ApiResponse<EpisodeCreated>> {
        debug!(target: "listenhub_http", "Creating podcast episode");
        self.send(
            self.http_client
                .post(self.url("/v1/podcast/episodes"))
                .json(request),
        )
        .await
    }

    async fn create_podcast_text_only(
        &self,
        request: &CreatePodcastRequest,
    ) -> Result<ApiResponse<EpisodeCreated>> {
        debug!(target: "listenhub_http", "Creating podcast text content");
        self.send(
            self.http_client
                .post(self.url("/v1/podcast/episodes/text-content"))
                .json(request),
        )
        .await
    }

    async fn generate_podcast_audio(
        &self,
        episode_id: &str,
        request: &GeneratePodcastAudioRequest,
    ) -> Result<ApiResponse<GeneratePodcastAudioResponse>> {
        debug!(target: "listenhub_http", episode_id = %episode_id, "Generating podcast audio");
        self.send(
            self.http_client
                .post(self.url(&format!("/v1/podcast/episodes/{}/audio", episode_id)))
                .json(request),
        )
        .await
    }

    async fn podcast_episode(&self, episode_id: &str) -> Result<ApiResponse<PodcastEpisode>> {
        self.send(
            self.http_client
                .get(self.url(&format!("/v1/podcast/episodes/{}", episode_id))),
        )
        .await
    }

    async fn create_flowspeech(
        &self,
        request: &CreateFlowspeechRequest,
    ) -> Result<ApiResponse<EpisodeCreated>> {
        debug!(target: "listenhub_http", "Creating FlowSpeech episode");
        self.send(
            self.http_client
                .post(self.url("/v1/flow-speech/episodes"))
                .json(request),
        )
        .await
    }

    async fn flowspeech_episode(
        &self,
        episode_id: &str,
    ) -> Result<ApiResponse<FlowspeechEpisode>> {
        self.send(
            self.http_client
                .get(self.url(&format!("/v1/flow-speech/episodes/{}", episode_id))),
        )
        .await
    }

    async fn user_subscription(&self) -> Result<ApiResponse<UserSubscription>> {
        self.send(self.http_client.get(self.url("/v1/user/subscription")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_prefers_body_message() {
        let err = status_error(
            StatusCode::UNAUTHORIZED,
            r#"{"code": 401, "message": "Invalid API key"}"#,
        );
        assert_eq!(err.to_string(), "Invalid API key (Status: 401)");
    }

    #[test]
    fn test_status_error_without_body() {
        let err = status_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway (Status: 502)");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let endpoint =
            HttpEndpoint::new(EndpointConfig::new("https://api.example.com/openapi/", "k"))
                .unwrap();
        assert_eq!(
            endpoint.url("/v1/speakers/list"),
            "https://api.example.com/openapi/v1/speakers/list"
        );
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let result = HttpEndpoint::new(EndpointConfig::new("https://x", "bad\nkey"));
        assert!(matches!(result, Err(ListenHubError::Config(_))));
    }

    #[test]
    fn test_user_agent_carries_version() {
        let config = EndpointConfig::new("https://x", "k");
        assert!(config.user_agent.starts_with("listenhub-mcp-server/"));
        assert_eq!(config.timeout_ms, 30_000);
    }
}
