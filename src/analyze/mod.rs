// src/analyze/mod.rs
//! Analysis stage: eight facets over one bundle, merged into a `CompositeAnalysis`.

pub mod ai_adapter;
pub mod digest;
pub mod error;
pub mod extract;
pub mod facets;
pub mod importance;
pub mod prompts;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use futures::FutureExt;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use crate::config::ai::AiConfig;
use crate::ingest::types::Bundle;

pub use ai_adapter::{build_client_from_config, AiClient, DynAiClient};
pub use error::{AiError, ExtractError, FacetError};
pub use facets::{
    Breakthrough, FacetKind, FacetResult, KeyDevelopment, SectorImpact, TrendAnalysis,
};
pub use importance::ImportanceBuckets;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "analysis_facet_failures_total",
            "Facets that fell back to their neutral value."
        );
        describe_histogram!("analysis_duration_ms", "Full analysis wall time in milliseconds.");
    });
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisMetadata {
    pub total_items: usize,
    pub analysis_model: String,
    pub processing_ms: u64,
    pub failed_facets: Vec<FacetKind>,
}

/// Merged output of all facets. A slot holds its neutral value when its facet failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeAnalysis {
    pub timestamp: DateTime<Utc>,
    pub executive_summary: String,
    pub key_developments: Vec<KeyDevelopment>,
    pub trends_and_patterns: TrendAnalysis,
    pub breakthrough_technologies: Vec<Breakthrough>,
    pub industry_impact: BTreeMap<String, SectorImpact>,
    pub actionable_insights: BTreeMap<String, Vec<String>>,
    pub future_predictions: BTreeMap<String, Vec<String>>,
    pub prioritization: ImportanceBuckets,
    pub metadata: AnalysisMetadata,
}

impl Default for CompositeAnalysis {
    fn default() -> Self {
        Self {
            timestamp: Utc::now(),
            executive_summary: String::new(),
            key_developments: Vec::new(),
            trends_and_patterns: TrendAnalysis::default(),
            breakthrough_technologies: Vec::new(),
            industry_impact: BTreeMap::new(),
            actionable_insights: BTreeMap::new(),
            future_predictions: BTreeMap::new(),
            prioritization: ImportanceBuckets::default(),
            metadata: AnalysisMetadata::default(),
        }
    }
}

impl CompositeAnalysis {
    /// Store one facet's value in its slot.
    pub fn apply(&mut self, result: FacetResult) {
        match result {
            FacetResult::ExecutiveSummary(v) => self.executive_summary = v,
            FacetResult::KeyDevelopments(v) => self.key_developments = v,
            FacetResult::TrendsAndPatterns(v) => self.trends_and_patterns = v,
            FacetResult::Breakthroughs(v) => self.breakthrough_technologies = v,
            FacetResult::IndustryImpact(v) => self.industry_impact = v,
            FacetResult::ActionableInsights(v) => self.actionable_insights = v,
            FacetResult::FuturePredictions(v) => self.future_predictions = v,
            FacetResult::Importance(v) => self.prioritization = v,
        }
    }

    pub fn failed(&self, kind: FacetKind) -> bool {
        self.metadata.failed_facets.contains(&kind)
    }
}

/// Runs the facets against one LLM client.
pub struct Analyzer {
    client: DynAiClient,
    facet_timeout: Duration,
}

impl Analyzer {
    pub fn new(client: DynAiClient, facet_timeout: Duration) -> Self {
        Self {
            client,
            facet_timeout,
        }
    }

    pub fn from_config(cfg: &AiConfig) -> anyhow::Result<Self> {
        Ok(Self::new(build_client_from_config(cfg)?, cfg.facet_timeout()))
    }

    pub fn client(&self) -> &DynAiClient {
        &self.client
    }

    /// One facet under the timeout and panic barrier.
    pub async fn run_one(
        &self,
        kind: FacetKind,
        digest: &str,
        bundle: &Bundle,
    ) -> Result<FacetResult, FacetError> {
        let fut = AssertUnwindSafe(facets::run_facet(kind, self.client.as_ref(), digest, bundle))
            .catch_unwind();
        match tokio::time::timeout(self.facet_timeout, fut).await {
            Err(_) => Err(FacetError::TimedOut(self.facet_timeout)),
            Ok(Err(_panic)) => Err(FacetError::Panicked),
            Ok(Ok(res)) => res,
        }
    }

    /// All eight facets concurrently. Never fails: a failed facet keeps its
    /// neutral slot and is listed in `metadata.failed_facets`.
    pub async fn analyze_all(&self, bundle: &Bundle) -> CompositeAnalysis {
        ensure_metrics_described();
        let started = Instant::now();
        let digest_text = digest::prepare_digest(bundle);
        let digest = digest_text.as_str();

        tracing::info!(
            items = bundle.total_items(),
            model = self.client.model(),
            provider = self.client.provider_name(),
            "analysis started"
        );

        let futs = FacetKind::ALL
            .iter()
            .map(|&kind| async move { (kind, self.run_one(kind, digest, bundle).await) });
        let results = join_all(futs).await;

        let mut out = CompositeAnalysis::default();
        let mut failed = Vec::new();
        for (kind, res) in results {
            match res {
                Ok(value) => {
                    tracing::debug!(facet = kind.slot(), "facet done");
                    out.apply(value);
                }
                Err(e) => {
                    tracing::warn!(facet = kind.slot(), error = %e, "facet failed, using neutral value");
                    counter!("analysis_facet_failures_total", "facet" => kind.slot()).increment(1);
                    out.apply(FacetResult::neutral(kind));
                    failed.push(kind);
                }
            }
        }

        let processing_ms = started.elapsed().as_millis() as u64;
        histogram!("analysis_duration_ms").record(processing_ms as f64);
        out.metadata = AnalysisMetadata {
            total_items: bundle.total_items(),
            analysis_model: self.client.model().to_string(),
            processing_ms,
            failed_facets: failed,
        };

        tracing::info!(
            processing_ms,
            failed = out.metadata.failed_facets.len(),
            "analysis complete"
        );
        out
    }
}
