//! # Forge CLI
//!
//! Resolves a Figma file into positioned, styled UI components.
//!
//! ## Usage
//!
//! ```bash
//! FIGMA_TOKEN=... forge https://www.figma.com/design/AbC123/Landing --output ./site
//! ```
//!
//! Writes `<output>/resolved.json` and, unless `--no-assets` is given, stores
//! rendered images under `<output>/ReactApp/src/assets`.
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `ForgeConfig` - Run configuration derived from the arguments
//! - `run` - Fetch, resolve and write the output

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use forge_core::ResolvedFrame;
use forge_source::{
    extract_file_id, ClientConfig, Converter, FigmaClient, RetryConfig, DEFAULT_API_URL,
};
use tracing::info;

/// Name of the output document written under the output directory.
pub const OUTPUT_FILE: &str = "resolved.json";

/// Command-line arguments for forge.
#[derive(Debug, Clone, Parser)]
#[command(name = "forge")]
#[command(about = "Resolve Figma frames into styled UI components")]
#[command(version)]
pub struct CliArgs {
    /// Figma file id or share URL
    pub file: String,

    /// Figma personal access token
    #[arg(long, env = "FIGMA_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Output directory
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,

    /// Skip downloading image assets
    #[arg(long)]
    pub no_assets: bool,

    /// Figma API base URL
    #[arg(long, env = "FIGMA_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Attempts per request before giving up
    #[arg(long, default_value = "3")]
    pub max_attempts: u32,
}

/// Run configuration.
#[derive(Debug, Clone)]
pub struct ForgeConfig {
    /// File id or share URL.
    pub file: String,
    /// API token.
    pub token: String,
    /// Output directory.
    pub output: PathBuf,
    /// Whether to download image assets.
    pub download_assets: bool,
    /// API base URL.
    pub api_url: String,
    /// Retry policy for API requests.
    pub retry: RetryConfig,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            file: String::new(),
            token: String::new(),
            output: PathBuf::from("."),
            download_assets: true,
            api_url: DEFAULT_API_URL.to_string(),
            retry: RetryConfig::default(),
        }
    }
}

impl From<CliArgs> for ForgeConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            file: args.file,
            token: args.token,
            output: args.output,
            download_assets: !args.no_assets,
            api_url: args.api_url,
            retry: RetryConfig {
                max_attempts: args.max_attempts,
                ..RetryConfig::default()
            },
        }
    }
}

/// Resolve the configured file and write the result.
///
/// # Errors
///
/// Returns an error if the file reference is invalid, the client cannot be
/// built, or the output cannot be written. An unreachable document is not an
/// error; it resolves to no frames.
pub async fn run(config: &ForgeConfig) -> anyhow::Result<Vec<ResolvedFrame>> {
    let file_id = extract_file_id(&config.file)?;
    let client = FigmaClient::with_config(ClientConfig {
        base_url: config.api_url.clone(),
        retry: config.retry.clone(),
        ..ClientConfig::default()
    })?;

    info!(file_id = %file_id, assets = config.download_assets, "Resolving document");
    let frames = Converter::from_client(client)
        .resolve_document(&file_id, &config.token, config.download_assets, &config.output)
        .await;

    let path = write_output(&config.output, &frames).await?;
    info!(path = %path.display(), frames = frames.len(), "Wrote output");
    Ok(frames)
}

/// Write frames as pretty JSON to `<dir>/resolved.json`.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file written.
pub async fn write_output(dir: &Path, frames: &[ResolvedFrame]) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating {}", dir.display()))?;

    let path = dir.join(OUTPUT_FILE);
    let json = serde_json::to_string_pretty(frames)?;
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// One-line description of a resolved frame.
#[must_use]
pub fn summarize(frame: &ResolvedFrame) -> String {
    let assets = frame
        .components
        .iter()
        .filter(|node| node.asset.is_some())
        .count();
    let mut line = format!(
        "frame {} ({}x{}): {} components, {}/{} assets",
        frame.frame.frame_index,
        frame.frame.width,
        frame.frame.height,
        frame.components.len(),
        assets,
        frame.asset_requests.len()
    );
    if !frame.warnings.is_empty() {
        line.push_str(&format!(", {} skipped", frame.warnings.len()));
    }
    line
}
