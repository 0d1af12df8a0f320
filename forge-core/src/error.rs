//! Error types for frame and node resolution.

use thiserror::Error;

/// Result type for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Errors that can occur while resolving a design document.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A color channel was missing, non-numeric, outside `[0, 1]` or not finite.
    #[error("Invalid color input: channel {channel} = {value}")]
    InvalidColorInput {
        /// Channel name (`r`, `g`, `b` or `a`).
        channel: &'static str,
        /// The offending value as written, or `missing`.
        value: String,
    },

    /// A node has neither an absolute bounding box nor render bounds.
    #[error("Node {node:?} has no absoluteBoundingBox or absoluteRenderBounds")]
    MissingGeometry {
        /// Name of the node.
        node: String,
    },

    /// A structural key the resolver depends on is absent.
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// Document data did not match the expected shape.
    #[error("Malformed document data: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A decorative property (effects, constraints, border) of a single node
    /// failed to resolve. Only that node is skipped.
    #[error("Failed to resolve {property} of node {node:?}: {source}")]
    Decoration {
        /// Name of the node.
        node: String,
        /// Which decorative property failed.
        property: &'static str,
        /// The underlying failure.
        #[source]
        source: Box<ResolveError>,
    },

    /// The document source returned nothing usable.
    #[error("Document source unavailable: {0}")]
    SourceUnavailable(String),
}

impl ResolveError {
    /// Shorthand for [`ResolveError::MissingRequiredField`].
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingRequiredField(field.into())
    }

    /// Returns true if the failure is confined to one node rather than its frame.
    #[must_use]
    pub fn is_node_local(&self) -> bool {
        matches!(self, Self::Decoration { .. })
    }
}

/// Attach node and property context to a decorative resolution failure.
pub(crate) fn decoration<T>(
    node: &str,
    property: &'static str,
    result: ResolveResult<T>,
) -> ResolveResult<T> {
    result.map_err(|source| ResolveError::Decoration {
        node: node.to_string(),
        property,
        source: Box::new(source),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoration_is_node_local() {
        let result: ResolveResult<()> = Err(ResolveError::missing("effect.color"));
        let err = decoration("card", "effects", result).unwrap_err();

        assert!(err.is_node_local());
        assert_eq!(
            err.to_string(),
            "Failed to resolve effects of node \"card\": Missing required field: effect.color"
        );
    }

    #[test]
    fn test_missing_is_required_field() {
        let err = ResolveError::missing("frame.children");
        assert_eq!(err.to_string(), "Missing required field: frame.children");
        assert!(!err.is_node_local());
    }

    #[test]
    fn test_geometry_is_not_node_local() {
        let err = ResolveError::MissingGeometry {
            node: "button".into(),
        };
        assert!(!err.is_node_local());
    }
}
