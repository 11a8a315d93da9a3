// src/ingest/providers/arxiv_rss.rs
use anyhow::Result;
use async_trait::async_trait;

use crate::ingest::http::get_text;
use crate::ingest::providers::rss::{parse_feed, FeedEntry};
use crate::ingest::truncate_summary;
use crate::ingest::types::{Category, Item, SourceProvider};

pub const SUMMARY_CAP: usize = 300;

/// Latest cs.AI papers from the arXiv RSS feed.
pub struct ArxivProvider {
    client: reqwest::Client,
    url: String,
    limit: usize,
}

impl ArxivProvider {
    pub fn new(client: reqwest::Client, url: &str, limit: usize) -> Self {
        Self {
            client,
            url: url.to_string(),
            limit,
        }
    }

    pub fn parse_items_from_str(xml: &str, limit: usize) -> Result<Vec<Item>> {
        Ok(parse_feed(xml, limit)?.into_iter().map(to_item).collect())
    }
}

fn to_item(e: FeedEntry) -> Item {
    // arXiv descriptions start with "arXiv:<id> Announce Type: new Abstract: ..."
    let abstract_text = e
        .description
        .split_once("Abstract:")
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or(e.description);
    Item::new(e.title, "arXiv", Category::ResearchPaper)
        .with_summary(truncate_summary(&abstract_text, SUMMARY_CAP))
        .with_url(e.link.unwrap_or_default())
        .with_published(e.published)
        .with_author(e.author)
}

#[async_trait]
impl SourceProvider for ArxivProvider {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        let body = get_text(&self.client, &self.url).await?;
        Self::parse_items_from_str(&body, self.limit)
    }

    fn key(&self) -> &'static str {
        "arxiv_papers"
    }

    fn name(&self) -> &'static str {
        "arXiv"
    }
}
