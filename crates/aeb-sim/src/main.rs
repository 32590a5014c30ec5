//! AEB Simulator - Main Entry Point

use aeb_sim::{init_logging, run, Args, Settings};
use anyhow::Context;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;
    args.apply(&mut settings);

    init_logging(&settings.log).context("Failed to initialize logging")?;

    info!("=== AEB TTC Simulator v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Annotating {}", settings.input.display());

    let summary = run(&settings)
        .await
        .with_context(|| format!("Failed to annotate {}", settings.input.display()))?;

    info!("Done: {}", summary);
    println!(
        "New JSON file '{}' has been created with braking state information.",
        settings.output.display()
    );

    Ok(())
}
