// src/notify/file.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::render::render;
use super::ReportSink;
use crate::analyze::CompositeAnalysis;
use crate::ingest::stats::Stats;
use crate::ingest::types::Bundle;

/// Dry-run sink: writes `daily_report_<ts>.html` into a directory.
pub struct HtmlFileSink {
    dir: PathBuf,
}

impl HtmlFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn write(
        &self,
        analysis: &CompositeAnalysis,
        bundle: &Bundle,
        stats: &Stats,
    ) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create {}", self.dir.display()))?;
        let report = render(analysis, bundle, stats);
        let path = self.dir.join(format!(
            "daily_report_{}.html",
            analysis.timestamp.format("%Y%m%d_%H%M%S")
        ));
        tokio::fs::write(&path, report.html)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}

#[async_trait]
impl ReportSink for HtmlFileSink {
    async fn deliver(&self, analysis: &CompositeAnalysis, bundle: &Bundle, stats: &Stats) -> bool {
        match self.write(analysis, bundle, stats).await {
            Ok(path) => {
                tracing::info!(path = %path.display(), "report written");
                true
            }
            Err(e) => {
                tracing::error!(error = ?e, "report write failed");
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "html-file"
    }
}
