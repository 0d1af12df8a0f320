//! # Forge
//!
//! Command-line entry point.

use clap::Parser;
use forge_cli::{run, summarize, CliArgs, ForgeConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing on stderr with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,forge_core=debug,forge_source=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,forge_core=debug,forge_source=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ForgeConfig::from(CliArgs::parse());
    let frames = run(&config).await?;

    if frames.is_empty() {
        anyhow::bail!("no frames resolved from {}", config.file);
    }
    for frame in &frames {
        println!("{}", summarize(frame));
    }
    Ok(())
}
