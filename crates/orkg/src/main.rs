//! ORKG CLI binary.

use anyhow::Result;
use orkg::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the orkg CLI.
///
/// Every command runs its graph operations one after another, so a
/// current_thread runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Controlled via RUST_LOG, e.g. RUST_LOG=orkg=debug,orkg_jsonl=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("orkg=info,orkg_jsonl=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting orkg CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("orkg CLI completed successfully");
    Ok(())
}
