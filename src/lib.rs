// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod config;
pub mod ingest;
pub mod metrics;
pub mod notify;
pub mod pipeline;

// ---- Re-exports for a stable public API ----
pub use analyze::ai_adapter;
pub use analyze::{Analyzer, CompositeAnalysis};
pub use ingest::Collector;
pub use pipeline::{ExecutionRecord, Orchestrator, SelfTestReport};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default `RUST_LOG` when none is set.
pub const DEFAULT_LOG_FILTER: &str = "ai_daily_digest=info,warn";

/// Install the global tracing subscriber: compact human output, or one JSON
/// object per line when `json` is set. Safe to call more than once.
pub fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}
