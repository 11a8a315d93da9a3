// src/notify/mod.rs
//! Report delivery: rendering plus the sinks that receive the daily report.

pub mod email;
pub mod file;
pub mod render;

use async_trait::async_trait;

use crate::analyze::CompositeAnalysis;
use crate::ingest::stats::Stats;
use crate::ingest::types::Bundle;

pub use email::EmailReporter;
pub use file::HtmlFileSink;
pub use render::{render, RenderedReport};

/// Destination for the finished report. Delivery never errors: failures are
/// logged and reported as `false`.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn deliver(&self, analysis: &CompositeAnalysis, bundle: &Bundle, stats: &Stats) -> bool;

    fn name(&self) -> &'static str;
}
