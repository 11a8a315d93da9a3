// src/ingest/providers/reddit.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::ingest::http::get_json;
use crate::ingest::types::{Category, Item, SourceProvider};
use crate::ingest::{normalize_text, truncate_summary};

pub const SUMMARY_CAP: usize = 200;

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    title: Option<String>,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    ups: i64,
    #[serde(default)]
    num_comments: i64,
    #[serde(default)]
    permalink: String,
    created_utc: Option<f64>,
    author: Option<String>,
}

/// Hot posts from a fixed list of AI subreddits.
pub struct RedditProvider {
    client: reqwest::Client,
    base_url: String,
    subreddits: Vec<String>,
    limit: usize,
}

impl RedditProvider {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        subreddits: Vec<String>,
        limit: usize,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            subreddits,
            limit,
        }
    }

    pub fn parse_items_from_str(json: &str, subreddit: &str) -> Result<Vec<Item>> {
        let listing: Listing = serde_json::from_str(json)?;
        Ok(to_items(listing, subreddit))
    }

    async fn fetch_subreddit(&self, subreddit: &str) -> Result<Vec<Item>> {
        let url = format!(
            "{}/r/{}/hot.json?limit={}",
            self.base_url, subreddit, self.limit
        );
        let listing: Listing = get_json(&self.client, &url).await?;
        Ok(to_items(listing, subreddit))
    }
}

fn to_items(listing: Listing, subreddit: &str) -> Vec<Item> {
    listing
        .data
        .children
        .into_iter()
        .filter_map(|c| {
            let p = c.data;
            let title = normalize_text(p.title.as_deref().unwrap_or_default());
            if title.is_empty() {
                return None;
            }
            let body = normalize_text(&p.selftext);
            let published = p
                .created_utc
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts as i64, 0));
            let url = if p.permalink.is_empty() {
                String::new()
            } else {
                format!("https://reddit.com{}", p.permalink)
            };
            Some(
                Item::new(title, format!("Reddit r/{subreddit}"), Category::CommunityDiscussion)
                    .with_summary(truncate_summary(&body, SUMMARY_CAP))
                    .with_url(url)
                    .with_published(published)
                    .with_author(p.author)
                    .with_engagement(p.ups.max(0) as u64, p.num_comments.max(0) as u64),
            )
        })
        .collect()
}

#[async_trait]
impl SourceProvider for RedditProvider {
    /// Subreddits are fetched one after another; a failing subreddit is skipped.
    /// The provider only fails when every subreddit failed.
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        let mut all = Vec::new();
        let mut failures = 0usize;
        for sub in &self.subreddits {
            match self.fetch_subreddit(sub).await {
                Ok(mut items) => all.append(&mut items),
                Err(e) => {
                    failures += 1;
                    tracing::warn!(target: "ingest", error = ?e, subreddit = %sub, "subreddit fetch failed");
                }
            }
        }
        if !self.subreddits.is_empty() && failures == self.subreddits.len() {
            return Err(anyhow!("all {failures} subreddits failed"));
        }
        Ok(all)
    }

    fn key(&self) -> &'static str {
        "reddit_discussions"
    }

    fn name(&self) -> &'static str {
        "Reddit"
    }
}
