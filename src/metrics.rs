// src/metrics.rs
use anyhow::{Context, Result};
use metrics::gauge;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::path::Path;

/// Process-wide Prometheus recorder.
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder. Fails if another recorder is already installed.
    pub fn init() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        gauge!("digest_build_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

        Ok(Self { handle })
    }

    /// Prometheus exposition text for everything recorded so far.
    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        std::fs::write(path, self.render()).with_context(|| format!("write {}", path.display()))
    }
}
