// src/ingest/mod.rs
pub mod config;
pub mod http;
pub mod providers;
pub mod stats;
pub mod types;

use crate::ingest::config::SourcesConfig;
use crate::ingest::providers::{
    arxiv_rss::ArxivProvider, curated::CuratedProvider, github_trending::GithubTrendingProvider,
    huggingface::HuggingFaceProvider, papers_with_code::PapersWithCodeProvider,
    reddit::RedditProvider,
};
use crate::ingest::stats::Stats;
use crate::ingest::types::{Bundle, FetchOutcome, SourceProvider};
use anyhow::Result;
use futures::future::join_all;
use futures::FutureExt;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

/// Marker appended to text cut by [`truncate_summary`].
pub const TRUNCATION_MARKER: &str = "...";

/// One-time metrics registration (so series show up in the exporter output).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_items_total", "Items returned by providers.");
        describe_counter!(
            "ingest_provider_errors_total",
            "Provider fetch/parse errors and panics."
        );
        describe_histogram!("ingest_fetch_ms", "Provider fetch time in milliseconds.");
        describe_gauge!(
            "ingest_last_run_ts",
            "Unix ts when the collector last finished."
        );
    });
}

/// Normalize text: decode entities, strip tags, ASCII quotes, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap: 1500 chars
    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }

    out
}

/// Cap `s` at `cap` chars; the marker is appended only when something was cut.
pub fn truncate_summary(s: &str, cap: usize) -> String {
    if s.chars().count() <= cap {
        return s.to_string();
    }
    let mut out: String = s.chars().take(cap).collect();
    out.truncate(out.trim_end().len());
    out.push_str(TRUNCATION_MARKER);
    out
}

/// Runs every configured provider concurrently and merges the results.
pub struct Collector {
    providers: Vec<Box<dyn SourceProvider>>,
}

impl Collector {
    pub fn new(providers: Vec<Box<dyn SourceProvider>>) -> Self {
        Self { providers }
    }

    /// The seven default sources, sharing one HTTP client.
    pub fn from_config(cfg: &SourcesConfig) -> Result<Self> {
        let client = http::build_client(cfg.timeout(), &cfg.user_agent)?;
        let providers: Vec<Box<dyn SourceProvider>> = vec![
            Box::new(ArxivProvider::new(client.clone(), &cfg.arxiv.url, cfg.arxiv.limit)),
            Box::new(HuggingFaceProvider::new(
                client.clone(),
                &cfg.huggingface.url,
                cfg.huggingface.limit,
            )),
            Box::new(GithubTrendingProvider::new(
                client.clone(),
                &cfg.github.url,
                cfg.github.limit,
                cfg.github.keywords.clone(),
            )),
            Box::new(RedditProvider::new(
                client.clone(),
                &cfg.reddit.base_url,
                cfg.reddit.subreddits.clone(),
                cfg.reddit.limit,
            )),
            Box::new(PapersWithCodeProvider::new(
                client,
                &cfg.papers_with_code.url,
                cfg.papers_with_code.limit,
            )),
            Box::new(CuratedProvider::news_aggregators()),
            Box::new(CuratedProvider::company_blogs()),
        ];
        Ok(Self::new(providers))
    }

    /// Configured bundle keys, in order.
    pub fn keys(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.key()).collect()
    }

    pub fn providers(&self) -> &[Box<dyn SourceProvider>] {
        &self.providers
    }

    /// One attempt per provider; waits for all of them regardless of outcome.
    pub async fn collect(&self) -> (Bundle, Stats) {
        ensure_metrics_described();
        tracing::info!(
            target: "ingest",
            providers = self.providers.len(),
            "starting parallel collection"
        );

        let runs = self.providers.iter().map(|p| async move {
            let t0 = Instant::now();
            let outcome = match AssertUnwindSafe(p.fetch()).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::error!(target: "ingest", provider = p.name(), "provider panicked");
                    counter!("ingest_provider_errors_total", "provider" => p.key()).increment(1);
                    FetchOutcome::failed()
                }
            };
            histogram!("ingest_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
            (p.key(), p.name(), outcome)
        });
        let results = join_all(runs).await;

        let mut bundle = Bundle::with_keys(self.keys());
        let mut succeeded = Vec::new();
        for (key, name, outcome) in results {
            counter!("ingest_items_total").increment(outcome.items.len() as u64);
            if outcome.succeeded {
                succeeded.push(name.to_string());
            }
            bundle.insert(key, outcome.items);
        }

        let stats = Stats::compute(&bundle, &succeeded);
        gauge!("ingest_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

        tracing::info!(
            target: "ingest",
            total_items = stats.total_items,
            sources = stats.sources_count,
            "data collection complete"
        );
        (bundle, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_strips_tags_and_entities() {
        let s = "  <p>Hello,&nbsp;&nbsp;<b>world</b>!</p> &ldquo;ok&rdquo; ";
        assert_eq!(normalize_text(s), r#"Hello, world ! "ok""#);
    }

    #[test]
    fn truncate_summary_only_marks_cut_text() {
        assert_eq!(truncate_summary("short", 10), "short");
        let long = "a".repeat(20);
        let out = truncate_summary(&long, 10);
        assert_eq!(out, format!("{}{}", "a".repeat(10), TRUNCATION_MARKER));
    }

    #[test]
    fn truncate_summary_is_char_safe() {
        let s = "žluťoučký kůň úpěl ďábelské ódy";
        let out = truncate_summary(s, 5);
        assert_eq!(out.chars().count(), 5 + TRUNCATION_MARKER.len());
    }

    #[test]
    fn default_collector_has_seven_keys() {
        let c = Collector::from_config(&SourcesConfig::default()).unwrap();
        assert_eq!(
            c.keys(),
            vec![
                "arxiv_papers",
                "huggingface_models",
                "github_repos",
                "reddit_discussions",
                "papers_with_code",
                "news_articles",
                "company_updates",
            ]
        );
    }
}
