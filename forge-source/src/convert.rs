//! Document conversion: fetch, resolve every frame in parallel, fetch assets.

use std::path::Path;
use std::sync::Arc;

use forge_core::{DocumentTree, FrameSlot, ResolveError, ResolveResult, ResolvedFrame};
use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::figma::FigmaClient;
use crate::source::{AssetFetcher, AssetQuery, DocumentSource};

/// Resolves whole documents using a document source and an asset fetcher.
#[derive(Clone)]
pub struct Converter {
    source: Arc<dyn DocumentSource>,
    fetcher: Arc<dyn AssetFetcher>,
}

impl Converter {
    /// Create a converter from its collaborators.
    #[must_use]
    pub fn new(source: Arc<dyn DocumentSource>, fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self { source, fetcher }
    }

    /// Use one Figma client for both documents and assets.
    #[must_use]
    pub fn from_client(client: FigmaClient) -> Self {
        let client = Arc::new(client);
        Self {
            source: client.clone(),
            fetcher: client,
        }
    }

    /// Resolve every frame of a document.
    ///
    /// A source failure or a document without frames yields an empty list.
    /// Frames that fail are logged and left out. When `download_assets` is
    /// set, image nodes get their stored asset path; assets that fail to
    /// download are logged and leave the node without one.
    pub async fn resolve_document(
        &self,
        file_id: &str,
        token: &str,
        download_assets: bool,
        output_root: &Path,
    ) -> Vec<ResolvedFrame> {
        let tree = match self.source.fetch_document(file_id, token).await {
            Ok(tree) => Arc::new(tree),
            Err(err) => {
                let err = ResolveError::SourceUnavailable(err.to_string());
                warn!(file_id, error = %err, "Nothing to resolve");
                return Vec::new();
            }
        };

        let mut frames = resolve_frames(&tree).await;

        if download_assets {
            for frame in &mut frames {
                self.fetch_assets(frame, file_id, token, output_root).await;
            }
        }

        info!(file_id, frames = frames.len(), "Resolved document");
        frames
    }

    /// Fetch every requested asset of a frame concurrently.
    ///
    /// Successful fetches set [`forge_core::ResolvedNode::asset`].
    pub async fn fetch_assets(
        &self,
        frame: &mut ResolvedFrame,
        file_id: &str,
        token: &str,
        output_root: &Path,
    ) {
        let index = frame.frame.frame_index;
        let frame_index = (index != 0).then_some(index);

        let fetches = frame.asset_requests.iter().map(|request| {
            let query = AssetQuery {
                file_id,
                node_id: &request.node_id,
                asset_name: &request.asset_name,
                token,
                output_root,
                frame_index,
            };
            async move { (request.component, self.fetcher.fetch_asset(query).await) }
        });
        let results = join_all(fetches).await;

        for (component, result) in results {
            match result {
                Ok(path) => {
                    if let Some(node) = frame.components.get_mut(component) {
                        debug!(frame_index = index, node = %node.name, path = %path, "Attached asset");
                        node.asset = Some(path);
                    }
                }
                Err(err) => {
                    warn!(frame_index = index, component, error = %err, "Asset fetch failed");
                }
            }
        }
    }
}

/// Resolve every frame of an already-fetched document.
///
/// Each frame runs as its own blocking task over the shared tree. Results are
/// collected in document order regardless of completion order. A failed or
/// panicked task only drops its own frame.
pub async fn resolve_frames(tree: &Arc<DocumentTree>) -> Vec<ResolvedFrame> {
    let slots = tree.frame_slots();
    if slots.is_empty() {
        info!(document = %tree.name, "Document has no frames");
        return Vec::new();
    }

    let tasks: Vec<(FrameSlot, JoinHandle<ResolveResult<ResolvedFrame>>)> = slots
        .into_iter()
        .map(|slot| {
            let tree = Arc::clone(tree);
            (slot, tokio::task::spawn_blocking(move || tree.resolve_slot(slot)))
        })
        .collect();

    let mut frames = Vec::with_capacity(tasks.len());
    for (slot, task) in tasks {
        match task.await {
            Ok(Ok(frame)) => frames.push(frame),
            Ok(Err(err)) => {
                warn!(frame_index = slot.frame_index, error = %err, "Frame resolution failed");
            }
            Err(err) => {
                error!(frame_index = slot.frame_index, error = %err, "Frame task aborted");
            }
        }
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(children: serde_json::Value) -> serde_json::Value {
        json!({
            "type": "FRAME",
            "absoluteBoundingBox": { "x": 0, "y": 0, "width": 100, "height": 100 },
            "children": children
        })
    }

    fn tree(frames: serde_json::Value) -> Arc<DocumentTree> {
        Arc::new(
            serde_json::from_value(json!({
                "name": "Doc",
                "document": { "children": [ { "children": frames } ] }
            }))
            .expect("should parse"),
        )
    }

    #[tokio::test]
    async fn test_frames_keep_document_order() {
        let frames: Vec<_> = (0..8).map(|_| frame(json!([]))).collect();
        let resolved = resolve_frames(&tree(json!(frames))).await;

        let indexes: Vec<u32> = resolved.iter().map(|f| f.frame.frame_index).collect();
        assert_eq!(indexes, (1..=8).collect::<Vec<u32>>());
    }

    #[tokio::test]
    async fn test_failed_frame_is_dropped() {
        let resolved = resolve_frames(&tree(json!([
            frame(json!([])),
            { "type": "FRAME" },
            frame(json!([]))
        ])))
        .await;

        let indexes: Vec<u32> = resolved.iter().map(|f| f.frame.frame_index).collect();
        assert_eq!(indexes, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_no_frames_is_empty() {
        let resolved = resolve_frames(&tree(json!([{ "type": "GROUP" }]))).await;
        assert!(resolved.is_empty());
    }
}
