//! # Graphout - Statement Serializer
//!
//! The command-line binary for the graphout-core serializer framework.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                 apps/graphout (THE BINARY)                │
//! │                                                           │
//! │  ┌─────────────┐    ┌──────────────┐    ┌─────────────┐   │
//! │  │    CLI      │    │    Config    │    │  Documents  │   │
//! │  │   (clap)    │    │    (toml)    │    │   (json)    │   │
//! │  └──────┬──────┘    └──────┬───────┘    └──────┬──────┘   │
//! │         └──────────────────┼───────────────────┘          │
//! │                            ▼                              │
//! │                  ┌──────────────────┐                     │
//! │                  │  graphout-core   │                     │
//! │                  │ (THE FRAMEWORK)  │                     │
//! │                  └──────────────────┘                     │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! graphout formats
//! graphout features
//! graphout check dot
//! graphout serialize -i statements.json -f dot -o graph.dot
//! graphout serialize -i statements.json --feature relativeURIs=0
//! ```

use clap::Parser;
use graphout::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // GRAPHOUT_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("GRAPHOUT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "graphout=info,graphout_core=warn".into());

    // stdout carries serialized output, so logs go to stderr.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
