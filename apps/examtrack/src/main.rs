//! # examtrack - Exam Application Tracker
//!
//! The main binary for the examtrack stage-progression engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                apps/examtrack (THE BINARY)               │
//! │                                                          │
//! │  ┌─────────────┐   ┌──────────────┐   ┌──────────────┐   │
//! │  │    CLI      │   │  JSON Store  │   │   Feedback   │   │
//! │  │   (clap)    │   │ (serde_json) │   │ (stage copy) │   │
//! │  └──────┬──────┘   └──────┬───────┘   └──────┬───────┘   │
//! │         │                 │                  │           │
//! │         └─────────────────┼──────────────────┘           │
//! │                           ▼                              │
//! │                  ┌─────────────────┐                     │
//! │                  │ examtrack-core  │                     │
//! │                  │   (THE LOGIC)   │                     │
//! │                  └─────────────────┘                     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Create and progress an application
//! examtrack create -n "IBPS PO 2026" -c banking --fee 850
//! examtrack update -i 1 -s 1 --status cleared --score 82/100
//! examtrack show -i 1
//! ```

use clap::Parser;
use examtrack::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Initialize tracing; EXAMTRACK_LOG_FORMAT=json enables
    // machine-parseable output.
    let log_format = std::env::var("EXAMTRACK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "examtrack=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Print the examtrack startup banner.
fn print_banner() {
    println!(
        r"
  ┌─────────────────────────────────────────┐
  │  examtrack v{:<8}                     │
  │  Prelims -> Mains -> Final Selection    │
  └─────────────────────────────────────────┘
",
        env!("CARGO_PKG_VERSION")
    );
}
