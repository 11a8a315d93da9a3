// tests/metrics_collect.rs
// One test per binary: the Prometheus recorder is process-global.
use ai_daily_digest::analyze::Analyzer;
use ai_daily_digest::ai_adapter::DisabledClient;
use ai_daily_digest::ingest::types::{Category, Item, SourceProvider};
use ai_daily_digest::ingest::Collector;
use ai_daily_digest::metrics::Metrics;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

struct OneItem;

#[async_trait]
impl SourceProvider for OneItem {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        Ok(vec![Item::new("New model released", "Lab Blog", Category::ModelRelease)])
    }
    fn key(&self) -> &'static str {
        "company_blogs"
    }
    fn name(&self) -> &'static str {
        "Company Blogs"
    }
}

struct Broken;

#[async_trait]
impl SourceProvider for Broken {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        Err(anyhow!("timeout"))
    }
    fn key(&self) -> &'static str {
        "reddit_discussions"
    }
    fn name(&self) -> &'static str {
        "Reddit"
    }
}

#[tokio::test]
async fn collector_and_analyzer_emit_metrics() {
    let metrics = Metrics::init().expect("install recorder");

    let collector = Collector::new(vec![Box::new(OneItem), Box::new(Broken)]);
    let (bundle, stats) = collector.collect().await;
    assert_eq!(stats.total_items, 1);

    let analyzer = Analyzer::new(Arc::new(DisabledClient), Duration::from_secs(5));
    let analysis = analyzer.analyze_all(&bundle).await;
    assert_eq!(analysis.metadata.failed_facets.len(), 7);

    let text = metrics.render();
    assert!(text.contains("digest_build_info"));
    assert!(text.contains("ingest_items_total 1"));
    assert!(text.contains("ingest_provider_errors_total{provider=\"reddit_discussions\"} 1"));
    assert!(text.contains("ingest_fetch_ms"));
    assert!(text.contains("ingest_last_run_ts"));
    assert!(text.contains("analysis_facet_failures_total{facet=\"executive_summary\"} 1"));
    assert!(text.contains("analysis_duration_ms"));

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("metrics.prom");
    metrics.write_to(&out).unwrap();
    assert_eq!(std::fs::read_to_string(out).unwrap(), metrics.render());
}
