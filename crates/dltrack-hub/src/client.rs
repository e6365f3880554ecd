//! Model hub API client
//!
//! A thin reqwest wrapper around the hub's "list models by author" endpoint.
//! Results are paginated through the `Link` response header. Failures are
//! returned immediately; the caller decides whether they are fatal.

use crate::models::ModelInfo;
use dltrack_common::{DlTrackError, Result};
use dltrack_config::HubConfig;
use reqwest::header::{HeaderMap, LINK};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Upper bound on followed `rel="next"` links.
pub const MAX_PAGES: usize = 1000;

/// Configuration for the hub API client
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the hub (e.g. "https://huggingface.co")
    pub endpoint: String,
    /// Optional bearer token
    pub token: Option<String>,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://huggingface.co".to_string(),
            token: None,
            timeout_secs: 30,
            user_agent: concat!("dltrack/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new configuration for the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the bearer token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl From<&HubConfig> for ClientConfig {
    fn from(hub: &HubConfig) -> Self {
        Self {
            endpoint: hub.endpoint.clone(),
            token: hub.token.clone(),
            timeout_secs: hub.timeout_seconds,
            ..Default::default()
        }
    }
}

/// Hub API client
#[derive(Debug, Clone)]
pub struct HubClient {
    client: Client,
    config: ClientConfig,
    base_url: Url,
}

impl HubClient {
    /// Create a new hub client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.endpoint).map_err(|e| {
            DlTrackError::config_with_source(format!("Invalid hub endpoint '{}'", config.endpoint), e)
        })?;
        // joins must append to a mounted prefix, not replace its last segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| DlTrackError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// URL of the first listing page for `author`
    pub fn models_url(&self, author: &str) -> Result<Url> {
        let mut url = self.base_url.join("api/models").map_err(|e| {
            DlTrackError::config_with_source("Failed to build models URL", e)
        })?;
        url.query_pairs_mut().append_pair("author", author);
        Ok(url)
    }

    /// List every model owned by `author`, following pagination links
    #[instrument(skip(self))]
    pub async fn list_models(&self, author: &str) -> Result<Vec<ModelInfo>> {
        let mut next = Some(self.models_url(author)?);
        let mut models = Vec::new();
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            if pages == MAX_PAGES {
                return Err(DlTrackError::hub(format!(
                    "Pagination did not terminate after {MAX_PAGES} pages"
                )));
            }
            pages += 1;

            let response = self.send(&url).await?;
            next = self.next_page(&url, response.headers());

            let page: Vec<ModelInfo> = Self::parse_response(response).await?;
            debug!("Page {} returned {} models", pages, page.len());
            models.extend(page);
        }

        info!("Listed {} models for {} across {} page(s)", models.len(), author, pages);
        Ok(models)
    }

    async fn send(&self, url: &Url) -> Result<Response> {
        debug!("Requesting {}", url);

        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            error!("Request failed: {}", e);
            DlTrackError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = body.trim();
        if status.is_client_error() {
            error!("Client error: {}", status);
        } else {
            warn!("Server error: {}", status);
        }
        Err(DlTrackError::hub_with_status(
            Self::status_message(status, detail),
            status.as_u16(),
        ))
    }

    fn status_message(status: StatusCode, detail: &str) -> String {
        if detail.is_empty() {
            format!("API returned {status}")
        } else {
            format!(
                "API returned {status}: {}",
                dltrack_common::truncate_string(detail, 200)
            )
        }
    }

    fn next_page(&self, current: &Url, headers: &HeaderMap) -> Option<Url> {
        let link = headers.get(LINK)?.to_str().ok()?;
        let target = next_page_url(link)?;
        match current.join(target) {
            Ok(url) if url == *current => {
                warn!("Next page link points at the current page, stopping");
                None
            }
            Ok(url) => Some(url),
            Err(e) => {
                warn!("Ignoring unparsable next page link '{}': {}", target, e);
                None
            }
        }
    }

    async fn parse_response<T>(response: Response) -> Result<T>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let text = response
            .text()
            .await
            .map_err(|e| DlTrackError::network_with_source("Failed to read response body", e))?;

        debug!("Response body: {} bytes", text.len());
        Ok(serde_json::from_str(&text)?)
    }
}

/// Extract the `rel="next"` target from an RFC 8288 `Link` header value
pub fn next_page_url(header: &str) -> Option<&str> {
    let mut rest = header;

    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let end = after.find('>')?;
        let target = &after[..end];
        let tail = &after[end + 1..];
        let params = tail.find('<').map_or(tail, |i| &tail[..i]);

        let is_next = params.split(';').any(|param| {
            let param = param.trim().trim_end_matches(',').trim();
            param.split_once('=').is_some_and(|(key, value)| {
                key.trim().eq_ignore_ascii_case("rel")
                    && value
                        .trim()
                        .trim_matches('"')
                        .split_whitespace()
                        .any(|rel| rel.eq_ignore_ascii_case("next"))
            })
        });
        if is_next {
            return Some(target);
        }

        rest = &tail[params.len()..];
    }

    None
}
