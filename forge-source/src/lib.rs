//! # Forge Source
//!
//! Fetches design documents and rendered assets, and drives whole-document
//! conversion on top of `forge-core`.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  Converter                   │
//! ├──────────────────────────────────────────────┤
//! │  DocumentSource   │  AssetFetcher            │
//! │  - fetch_document │  - fetch_asset           │
//! ├──────────────────────────────────────────────┤
//! │  FigmaClient (reqwest, retry with backoff)   │
//! ├──────────────────────────────────────────────┤
//! │  resolve_frames: one blocking task per frame │
//! └──────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod convert;
pub mod figma;
pub mod source;

pub use convert::{resolve_frames, Converter};
pub use figma::{
    asset_location, extract_file_id, ClientConfig, FigmaClient, RetryConfig, DEFAULT_API_URL,
};
pub use source::{AssetFetcher, AssetQuery, DocumentSource, SourceError, SourceResult};
