// src/ingest/providers/github_trending.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use crate::ingest::http::get_text;
use crate::ingest::types::{Category, Item, SourceProvider};
use crate::ingest::{normalize_text, truncate_summary};

pub const SUMMARY_CAP: usize = 300;
const NO_DESCRIPTION: &str = "No description";

/// Scrapes github.com/trending and keeps AI-related repositories only.
pub struct GithubTrendingProvider {
    client: reqwest::Client,
    url: String,
    limit: usize,
    keywords: Vec<String>,
}

impl GithubTrendingProvider {
    pub fn new(client: reqwest::Client, url: &str, limit: usize, keywords: Vec<String>) -> Self {
        Self {
            client,
            url: url.to_string(),
            limit,
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Parse a trending page. Only the first `limit` rows are considered; rows that
    /// match no keyword are dropped silently.
    pub fn parse_items_from_str(html: &str, limit: usize, keywords: &[String]) -> Result<Vec<Item>> {
        let row_sel = selector("article.Box-row")?;
        let link_sel = selector("h2 a")?;
        let desc_sel = selector("p.col-9")?;
        let stars_sel = selector("span.d-inline-block.float-sm-right")?;

        let doc = Html::parse_document(html);
        let mut out = Vec::new();
        for row in doc.select(&row_sel).take(limit) {
            let Some(link) = row.select(&link_sel).next() else {
                continue;
            };
            let repo = link
                .value()
                .attr("href")
                .unwrap_or_default()
                .trim()
                .trim_matches('/')
                .to_string();
            if repo.is_empty() {
                continue;
            }

            let description = row
                .select(&desc_sel)
                .next()
                .map(element_text)
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| NO_DESCRIPTION.to_string());

            if !matches_keywords(&format!("{repo} {description}"), keywords) {
                continue;
            }

            let stars = row
                .select(&stars_sel)
                .next()
                .map(element_text)
                .and_then(|t| parse_count(&t));

            out.push(
                Item::new(format!("Trending: {repo}"), "GitHub", Category::OpenSourceTool)
                    .with_summary(truncate_summary(&description, SUMMARY_CAP))
                    .with_url(format!("https://github.com/{repo}"))
                    .with_stars(stars),
            );
        }
        Ok(out)
    }
}

fn selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| anyhow!("invalid selector {s:?}: {e:?}"))
}

fn element_text(el: ElementRef<'_>) -> String {
    normalize_text(&el.text().collect::<Vec<_>>().join(" "))
}

/// Case-insensitive substring match against any keyword. An empty list keeps everything.
pub fn matches_keywords(text: &str, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return true;
    }
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k.as_str()))
}

/// "1,234 stars today" -> 1234
fn parse_count(text: &str) -> Option<u64> {
    let digits: String = text
        .split_whitespace()
        .next()?
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[async_trait]
impl SourceProvider for GithubTrendingProvider {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        let body = get_text(&self.client, &self.url).await?;
        Self::parse_items_from_str(&body, self.limit, &self.keywords)
    }

    fn key(&self) -> &'static str {
        "github_repos"
    }

    fn name(&self) -> &'static str {
        "GitHub"
    }
}
