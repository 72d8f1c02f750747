//! Tenderwatch - tender listing crawler and extraction service.
//!
//! Crawls the rostender.info tender search, follows each listing to its
//! detail page, extracts the tender fields and aggregates the results
//! into a CSV table. Crawls run as background jobs with pollable status.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if tenderwatch::cli::is_verbose() {
        "tenderwatch=info"
    } else {
        "tenderwatch=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    tenderwatch::cli::run().await
}
