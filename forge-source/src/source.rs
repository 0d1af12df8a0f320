//! Collaborator traits for fetching documents and assets.

use std::path::Path;

use async_trait::async_trait;
use forge_core::DocumentTree;
use thiserror::Error;

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors raised by document sources and asset fetchers.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The configured base URL is invalid.
    #[error("invalid source URL: {0}")]
    InvalidUrl(String),

    /// HTTP layer failed (connection, timeout, non-success status).
    #[error("source HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response payload did not parse.
    #[error("failed to parse source payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing an asset to disk failed.
    #[error("asset I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The image endpoint returned no URL for the node.
    #[error("no rendered image for node {node_id}")]
    MissingAsset {
        /// Node that has no image.
        node_id: String,
    },

    /// The file reference could not be turned into a file id.
    #[error("invalid file reference: {0}")]
    InvalidFileReference(String),
}

impl SourceError {
    /// Returns true if this error is retryable (transient HTTP failures).
    ///
    /// Client errors (4xx) and malformed requests are not retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(err) => {
                !err.is_builder() && !err.status().is_some_and(|s| s.is_client_error())
            }
            _ => false,
        }
    }
}

/// Where a fetched asset should come from and where it should land.
#[derive(Debug, Clone, Copy)]
pub struct AssetQuery<'a> {
    /// Design file id.
    pub file_id: &'a str,
    /// Node to rasterize.
    pub node_id: &'a str,
    /// File stem for the stored asset.
    pub asset_name: &'a str,
    /// API token.
    pub token: &'a str,
    /// Project root the asset directory lives under.
    pub output_root: &'a Path,
    /// Frame subdirectory, if any.
    pub frame_index: Option<u32>,
}

/// Supplies design documents.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the document for a file id.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be retrieved or parsed.
    async fn fetch_document(&self, file_id: &str, token: &str) -> SourceResult<DocumentTree>;
}

/// Downloads rasterized nodes.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch one asset and return its path relative to the asset directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be rendered, downloaded or written.
    async fn fetch_asset(&self, query: AssetQuery<'_>) -> SourceResult<String>;
}
