//! In-memory collaborators for driving the Converter without a network.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use forge_core::DocumentTree;
use forge_source::{
    asset_location, AssetFetcher, AssetQuery, DocumentSource, SourceError, SourceResult,
};
use serde_json::Value;

/// Serves documents from a map keyed by file id.
#[derive(Default)]
pub struct MemorySource {
    documents: HashMap<String, Value>,
}

impl MemorySource {
    /// Register a document under a file id.
    pub fn with_document(mut self, file_id: &str, document: Value) -> Self {
        self.documents.insert(file_id.to_string(), document);
        self
    }
}

#[async_trait]
impl DocumentSource for MemorySource {
    async fn fetch_document(&self, file_id: &str, _token: &str) -> SourceResult<DocumentTree> {
        let document = self
            .documents
            .get(file_id)
            .ok_or_else(|| SourceError::InvalidFileReference(file_id.to_string()))?;
        Ok(serde_json::from_value(document.clone())?)
    }
}

/// A recorded asset fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub node_id: String,
    pub asset_name: String,
    pub frame_index: Option<u32>,
}

/// Records every fetch and fails for the configured node ids.
#[derive(Default)]
pub struct RecordingFetcher {
    failing: Vec<String>,
    calls: Mutex<Vec<FetchCall>>,
}

impl RecordingFetcher {
    /// Fail fetches for this node id.
    pub fn failing_on(mut self, node_id: &str) -> Self {
        self.failing.push(node_id.to_string());
        self
    }

    /// Calls made so far, sorted by node id.
    pub fn calls(&self) -> Vec<FetchCall> {
        let mut calls = self.calls.lock().expect("lock").clone();
        calls.sort_by(|a, b| a.node_id.cmp(&b.node_id));
        calls
    }
}

#[async_trait]
impl AssetFetcher for RecordingFetcher {
    async fn fetch_asset(&self, query: AssetQuery<'_>) -> SourceResult<String> {
        self.calls.lock().expect("lock").push(FetchCall {
            node_id: query.node_id.to_string(),
            asset_name: query.asset_name.to_string(),
            frame_index: query.frame_index,
        });

        if self.failing.iter().any(|id| id == query.node_id) {
            return Err(SourceError::MissingAsset {
                node_id: query.node_id.to_string(),
            });
        }

        let (_, relative) = asset_location(query.output_root, query.asset_name, query.frame_index);
        Ok(relative)
    }
}
