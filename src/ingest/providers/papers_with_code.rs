// src/ingest/providers/papers_with_code.rs
use anyhow::Result;
use async_trait::async_trait;

use crate::ingest::http::get_text;
use crate::ingest::providers::rss::parse_feed;
use crate::ingest::truncate_summary;
use crate::ingest::types::{Category, Item, SourceProvider};

pub const SUMMARY_CAP: usize = 300;

/// Latest entries of the Papers with Code RSS feed.
pub struct PapersWithCodeProvider {
    client: reqwest::Client,
    url: String,
    limit: usize,
}

impl PapersWithCodeProvider {
    pub fn new(client: reqwest::Client, url: &str, limit: usize) -> Self {
        Self {
            client,
            url: url.to_string(),
            limit,
        }
    }

    pub fn parse_items_from_str(xml: &str, limit: usize) -> Result<Vec<Item>> {
        let items = parse_feed(xml, limit)?
            .into_iter()
            .map(|e| {
                Item::new(e.title, "Papers with Code", Category::ResearchWithCode)
                    .with_summary(truncate_summary(&e.description, SUMMARY_CAP))
                    .with_url(e.link.unwrap_or_default())
                    .with_published(e.published)
                    .with_author(e.author)
            })
            .collect();
        Ok(items)
    }
}

#[async_trait]
impl SourceProvider for PapersWithCodeProvider {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        let body = get_text(&self.client, &self.url).await?;
        Self::parse_items_from_str(&body, self.limit)
    }

    fn key(&self) -> &'static str {
        "papers_with_code"
    }

    fn name(&self) -> &'static str {
        "Papers with Code"
    }
}
