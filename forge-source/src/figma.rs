//! Figma REST client.
//!
//! Serves as both [`DocumentSource`] (`GET /v1/files/{id}`) and
//! [`AssetFetcher`] (`GET /v1/images/{id}` followed by a download of the
//! rendered PNG).

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use forge_core::DocumentTree;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::source::{AssetFetcher, AssetQuery, DocumentSource, SourceError, SourceResult};

/// Public Figma API base URL.
pub const DEFAULT_API_URL: &str = "https://api.figma.com";

/// Header carrying the personal access token.
pub const TOKEN_HEADER: &str = "X-FIGMA-TOKEN";

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ASSET_DIR: [&str; 3] = ["ReactApp", "src", "assets"];
const URL_KINDS: [&str; 3] = ["file", "design", "proto"];

/// Configuration for retry with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Initial delay between retries in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum delay between retries in milliseconds.
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 250,
            max_delay_ms: 5_000,
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with custom values.
    #[must_use]
    pub fn new(
        max_attempts: u32,
        initial_delay_ms: u64,
        max_delay_ms: u64,
        multiplier: f64,
    ) -> Self {
        Self {
            max_attempts,
            initial_delay_ms,
            max_delay_ms,
            multiplier,
        }
    }

    /// Calculate delay for a given attempt number (0-indexed).
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap
    )]
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        let base_delay = self.initial_delay_ms as f64 * self.multiplier.powi(attempt as i32);
        base_delay.min(self.max_delay_ms as f64) as u64
    }
}

/// Client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
        }
    }
}

/// Asynchronous Figma API client.
#[derive(Clone)]
pub struct FigmaClient {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    base_url: Url,
    retry: RetryConfig,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    err: Option<String>,
    #[serde(default)]
    images: HashMap<String, Option<String>>,
}

impl FigmaClient {
    /// Create a client against the public API with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client fails to build.
    pub fn new() -> SourceResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom settings.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidUrl`] if the base URL is malformed.
    /// Returns [`SourceError::Http`] if the HTTP client fails to build.
    pub fn with_config(config: ClientConfig) -> SourceResult<Self> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::InvalidUrl(config.base_url));
        }

        let http = Client::builder()
            .user_agent(concat!("forge/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(InnerClient {
                http,
                base_url,
                retry: config.retry,
            }),
        })
    }

    /// API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Retry policy.
    #[must_use]
    pub fn retry_config(&self) -> &RetryConfig {
        &self.inner.retry
    }

    fn endpoint(&self, segments: &[&str]) -> SourceResult<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SourceError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url, token: &str) -> SourceResult<T> {
        let body = self
            .with_retry(url.path(), move || async move {
                let response = self
                    .inner
                    .http
                    .get(url.clone())
                    .header(TOKEN_HEADER, token)
                    .send()
                    .await?
                    .error_for_status()?;
                Ok::<_, SourceError>(response.bytes().await?)
            })
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn download(&self, url: &Url) -> SourceResult<Vec<u8>> {
        let bytes = self
            .with_retry(url.path(), move || async move {
                let response = self
                    .inner
                    .http
                    .get(url.clone())
                    .send()
                    .await?
                    .error_for_status()?;
                Ok::<_, SourceError>(response.bytes().await?)
            })
            .await?;
        Ok(bytes.to_vec())
    }

    async fn with_retry<T, F, Fut>(&self, what: &str, mut operation: F) -> SourceResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = SourceResult<T>>,
    {
        let config = &self.inner.retry;
        let max_attempts = config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() && attempt + 1 < max_attempts => {
                    let delay = config.delay_for_attempt(attempt);
                    warn!(
                        "Request {} failed (attempt {}/{}), retrying in {}ms: {}",
                        what,
                        attempt + 1,
                        max_attempts,
                        delay,
                        error
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[async_trait]
impl DocumentSource for FigmaClient {
    async fn fetch_document(&self, file_id: &str, token: &str) -> SourceResult<DocumentTree> {
        let url = self.endpoint(&["v1", "files", file_id])?;
        let document: DocumentTree = self.get_json(&url, token).await?;
        info!(file_id, name = %document.name, "Fetched document");
        Ok(document)
    }
}

#[async_trait]
impl AssetFetcher for FigmaClient {
    async fn fetch_asset(&self, query: AssetQuery<'_>) -> SourceResult<String> {
        let mut url = self.endpoint(&["v1", "images", query.file_id])?;
        url.query_pairs_mut()
            .append_pair("ids", query.node_id)
            .append_pair("format", "png")
            .append_pair("scale", "2");

        let response: ImagesResponse = self.get_json(&url, query.token).await?;
        if let Some(err) = &response.err {
            debug!(node_id = query.node_id, error = %err, "Image render reported an error");
        }

        let image_url = response
            .images
            .get(query.node_id)
            .cloned()
            .flatten()
            .ok_or_else(|| SourceError::MissingAsset {
                node_id: query.node_id.to_string(),
            })?;
        let image_url = Url::parse(&image_url).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;

        let bytes = self.download(&image_url).await?;
        let (path, relative) = asset_location(query.output_root, query.asset_name, query.frame_index);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;

        debug!(
            node_id = query.node_id,
            path = %path.display(),
            bytes = bytes.len(),
            "Stored asset"
        );
        Ok(relative)
    }
}

/// Absolute target path and asset-relative path for a stored image.
///
/// Path separators in `asset_name` are replaced with `_`.
#[must_use]
pub fn asset_location(
    output_root: &Path,
    asset_name: &str,
    frame_index: Option<u32>,
) -> (PathBuf, String) {
    let file_name = format!("{}.png", asset_name.replace(['/', '\\'], "_"));
    let mut dir: PathBuf = ASSET_DIR.iter().fold(output_root.to_path_buf(), |p, s| p.join(s));

    let relative = match frame_index {
        Some(index) => {
            let subdir = format!("frame_{index}");
            dir.push(&subdir);
            format!("{subdir}/{file_name}")
        }
        None => file_name.clone(),
    };

    (dir.join(file_name), relative)
}

/// Extract the file id from a bare id or a share URL.
///
/// Accepts `https://www.figma.com/{file|design|proto}/<id>/...`, with or
/// without the scheme.
///
/// # Errors
///
/// Returns [`SourceError::InvalidFileReference`] if no id can be found.
pub fn extract_file_id(input: &str) -> SourceResult<String> {
    let input = input.trim();
    let invalid = || SourceError::InvalidFileReference(input.to_string());

    if !input.is_empty() && input.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Ok(input.to_string());
    }

    let url = Url::parse(input)
        .or_else(|_| Url::parse(&format!("https://{input}")))
        .map_err(|_| invalid())?;
    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    segments
        .windows(2)
        .find(|pair| URL_KINDS.contains(&pair[0]))
        .map(|pair| pair[1])
        .filter(|id| id.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_string)
        .ok_or_else(invalid)
}
