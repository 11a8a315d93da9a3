// src/pipeline.rs
//! Daily workflow: Collector -> Analyzer -> report sink, with per-phase timing.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::analyze::{digest, AnalysisMetadata, Analyzer, FacetKind, FacetResult};
use crate::config::email::EmailConfig;
use crate::ingest::providers::curated::CuratedProvider;
use crate::ingest::stats::Stats;
use crate::ingest::types::{Bundle, SourceProvider};
use crate::ingest::Collector;
use crate::notify::ReportSink;

/// Items handed to the LLM during the self-test.
const SELF_TEST_ITEMS: usize = 2;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("pipeline_runs_total", "Daily workflow runs by outcome.");
    });
}

/// Wall time per phase, in seconds. A phase that never ran stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhaseTimings {
    pub total: f64,
    pub data_retrieval: Option<f64>,
    pub llm_processing: Option<f64>,
    pub automated_actions: Option<f64>,
}

/// Outcome of one daily run, persisted as `workflow_result_<ts>.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionRecord {
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    pub execution_time: PhaseTimings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Stats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisMetadata>,
    pub report_sink: String,
    pub report_delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionRecord {
    pub fn file_name(&self) -> String {
        format!(
            "workflow_result_{}.json",
            self.timestamp.format("%Y%m%d_%H%M%S")
        )
    }

    /// Write the record as pretty JSON into `dir`, returning the file path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        let path = dir.join(self.file_name());
        let json = serde_json::to_string_pretty(self).context("serialize execution record")?;
        std::fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelfTestReport {
    pub data_retrieval: bool,
    pub llm_processing: bool,
    pub email_config: bool,
}

impl SelfTestReport {
    pub fn all_passed(&self) -> bool {
        self.data_retrieval && self.llm_processing && self.email_config
    }

    pub fn checks(&self) -> [(&'static str, bool); 3] {
        [
            ("data_retrieval", self.data_retrieval),
            ("llm_processing", self.llm_processing),
            ("email_config", self.email_config),
        ]
    }
}

struct Completed {
    stats: Stats,
    analysis: AnalysisMetadata,
    delivered: bool,
}

pub struct Orchestrator {
    collector: Collector,
    analyzer: Analyzer,
    sink: Box<dyn ReportSink>,
    email: Option<EmailConfig>,
}

impl Orchestrator {
    pub fn new(collector: Collector, analyzer: Analyzer, sink: Box<dyn ReportSink>) -> Self {
        Self {
            collector,
            analyzer,
            sink,
            email: None,
        }
    }

    /// SMTP settings checked by the self-test.
    pub fn with_email_config(mut self, email: Option<EmailConfig>) -> Self {
        self.email = email;
        self
    }

    async fn run_phases(&self, timings: &mut PhaseTimings) -> Completed {
        tracing::info!(phase = "data_retrieval", "phase started");
        let t = Instant::now();
        let (bundle, stats) = self.collector.collect().await;
        timings.data_retrieval = Some(t.elapsed().as_secs_f64());
        tracing::info!(
            total_items = stats.total_items,
            sources = stats.sources_count,
            secs = timings.data_retrieval,
            "data retrieval complete"
        );

        tracing::info!(phase = "llm_processing", "phase started");
        let t = Instant::now();
        let analysis = self.analyzer.analyze_all(&bundle).await;
        timings.llm_processing = Some(t.elapsed().as_secs_f64());

        tracing::info!(phase = "automated_actions", sink = self.sink.name(), "phase started");
        let t = Instant::now();
        let delivered = self.sink.deliver(&analysis, &bundle, &stats).await;
        timings.automated_actions = Some(t.elapsed().as_secs_f64());

        Completed {
            stats,
            analysis: analysis.metadata,
            delivered,
        }
    }

    /// Run the full workflow once. Never panics; a panic escaping a stage is
    /// reported as `success: false` with its message.
    pub async fn run_daily(&self) -> ExecutionRecord {
        ensure_metrics_described();
        let started = Instant::now();
        let mut timings = PhaseTimings::default();

        let outcome = AssertUnwindSafe(self.run_phases(&mut timings))
            .catch_unwind()
            .await;
        timings.total = started.elapsed().as_secs_f64();

        let record = match outcome {
            Ok(done) => ExecutionRecord {
                success: true,
                timestamp: Utc::now(),
                execution_time: timings,
                statistics: Some(done.stats),
                analysis: Some(done.analysis),
                report_sink: self.sink.name().to_string(),
                report_delivered: done.delivered,
                error: None,
            },
            Err(panic) => {
                let msg = panic_message(panic.as_ref());
                tracing::error!(error = %msg, "workflow failed");
                ExecutionRecord {
                    success: false,
                    timestamp: Utc::now(),
                    execution_time: timings,
                    statistics: None,
                    analysis: None,
                    report_sink: self.sink.name().to_string(),
                    report_delivered: false,
                    error: Some(msg),
                }
            }
        };

        let outcome = if record.success { "success" } else { "failure" };
        counter!("pipeline_runs_total", "outcome" => outcome).increment(1);
        tracing::info!(
            success = record.success,
            total_secs = record.execution_time.total,
            delivered = record.report_delivered,
            "workflow finished"
        );
        record
    }

    /// Checks each stage without sending anything.
    pub async fn run_self_test(&self) -> SelfTestReport {
        let mut report = SelfTestReport::default();

        let curated = CuratedProvider::news_aggregators();
        let fetched = curated.fetch().await;
        report.data_retrieval = fetched.succeeded && !fetched.items.is_empty();
        tracing::info!(ok = report.data_retrieval, "self-test: data retrieval");

        if report.data_retrieval {
            let sample: Vec<_> = fetched.items.into_iter().take(SELF_TEST_ITEMS).collect();
            let bundle: Bundle = vec![(curated.key(), sample)].into_iter().collect();
            let digest = digest::prepare_digest(&bundle);
            report.llm_processing = matches!(
                self.analyzer
                    .run_one(FacetKind::ExecutiveSummary, &digest, &bundle)
                    .await,
                Ok(FacetResult::ExecutiveSummary(ref s)) if !s.is_empty()
            );
        }
        tracing::info!(ok = report.llm_processing, "self-test: llm processing");

        report.email_config = self.email.is_some();
        tracing::info!(ok = report.email_config, "self-test: email configuration");
        report
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "stage panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payloads() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&String::from("bang")), "bang");
        assert_eq!(panic_message(&42u8), "stage panicked");
    }

    #[test]
    fn record_file_name_uses_timestamp() {
        let rec = ExecutionRecord {
            success: true,
            timestamp: DateTime::parse_from_rfc3339("2025-03-04T05:06:07Z")
                .unwrap()
                .with_timezone(&Utc),
            execution_time: PhaseTimings::default(),
            statistics: None,
            analysis: None,
            report_sink: "html-file".into(),
            report_delivered: false,
            error: None,
        };
        assert_eq!(rec.file_name(), "workflow_result_20250304_050607.json");
    }
}
