// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// URL used when a source does not expose a link for an item.
pub const URL_PLACEHOLDER: &str = "#";

/// Open tag set describing what kind of content an item is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    ResearchPaper,
    ResearchWithCode,
    OpenSourceTool,
    ModelRelease,
    CommunityDiscussion,
    ToolUpdate,
    PlatformUpdate,
    ImageGeneration,
    OpenSourceRelease,
    News,
    Unknown,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::ResearchPaper => "Research Paper",
            Category::ResearchWithCode => "Research with Code",
            Category::OpenSourceTool => "Open Source Tool",
            Category::ModelRelease => "Model Release",
            Category::CommunityDiscussion => "Community Discussion",
            Category::ToolUpdate => "Tool Update",
            Category::PlatformUpdate => "Platform Update",
            Category::ImageGeneration => "Image Generation",
            Category::OpenSourceRelease => "Open Source Release",
            Category::News => "News",
            Category::Unknown => "Unknown",
            Category::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        match s.trim() {
            "" | "Unknown" => Category::Unknown,
            "Research Paper" => Category::ResearchPaper,
            "Research with Code" => Category::ResearchWithCode,
            "Open Source Tool" => Category::OpenSourceTool,
            "Model Release" => Category::ModelRelease,
            "Community Discussion" => Category::CommunityDiscussion,
            "Tool Update" => Category::ToolUpdate,
            "Platform Update" => Category::PlatformUpdate,
            "Image Generation" => Category::ImageGeneration,
            "Open Source Release" => Category::OpenSourceRelease,
            "News" => Category::News,
            other => Category::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::from(s.as_str())
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized piece of collected content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub source: String,
    #[serde(default = "default_category")]
    pub category: Category,
    #[serde(default = "Utc::now")]
    pub published: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
}

fn default_url() -> String {
    URL_PLACEHOLDER.to_string()
}

fn default_category() -> Category {
    Category::Unknown
}

impl Item {
    pub fn new(title: impl Into<String>, source: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            summary: String::new(),
            url: default_url(),
            source: source.into(),
            category,
            published: Utc::now(),
            author: None,
            stars: None,
            upvotes: None,
            comments: None,
            downloads: None,
            likes: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Empty links keep the placeholder.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if !url.trim().is_empty() {
            self.url = url;
        }
        self
    }

    pub fn with_published(mut self, published: Option<DateTime<Utc>>) -> Self {
        if let Some(ts) = published {
            self.published = ts;
        }
        self
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author.filter(|a| !a.trim().is_empty());
        self
    }

    pub fn with_stars(mut self, stars: Option<u64>) -> Self {
        self.stars = stars;
        self
    }

    pub fn with_engagement(mut self, upvotes: u64, comments: u64) -> Self {
        self.upvotes = Some(upvotes);
        self.comments = Some(comments);
        self
    }

    pub fn with_popularity(mut self, downloads: Option<u64>, likes: Option<u64>) -> Self {
        self.downloads = downloads;
        self.likes = likes;
        self
    }
}

/// Per-cycle collection of items grouped by fetcher key.
///
/// Keys keep their insertion order (the configured fetcher order). Once the
/// collector hands a bundle out it is only ever read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bundle {
    groups: Vec<(String, Vec<Item>)>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed every key with an empty sequence.
    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut b = Self::new();
        for k in keys {
            b.insert(k, Vec::new());
        }
        b
    }

    /// Append `items` under `key`, creating the key if needed.
    pub fn insert(&mut self, key: impl Into<String>, mut items: Vec<Item>) {
        let key = key.into();
        match self.groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.append(&mut items),
            None => self.groups.push((key, items)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[Item]> {
        self.groups
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Item])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// All items across all keys, in key order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.groups.iter().flat_map(|(_, v)| v.iter())
    }

    pub fn total_items(&self) -> usize {
        self.groups.iter().map(|(_, v)| v.len()).sum()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<Item>)> for Bundle {
    fn from_iter<T: IntoIterator<Item = (K, Vec<Item>)>>(iter: T) -> Self {
        let mut b = Bundle::new();
        for (k, v) in iter {
            b.insert(k, v);
        }
        b
    }
}

impl Serialize for Bundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (k, v) in &self.groups {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// What a single fetcher produced in one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    pub items: Vec<Item>,
    pub succeeded: bool,
}

impl FetchOutcome {
    pub fn ok(items: Vec<Item>) -> Self {
        Self {
            items,
            succeeded: true,
        }
    }

    pub fn failed() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    /// Raw fetch; any error is reported to the caller.
    async fn fetch_latest(&self) -> Result<Vec<Item>>;

    /// Bundle key this provider fills, e.g. `arxiv_papers`.
    fn key(&self) -> &'static str;

    /// Human-readable source name, e.g. `arXiv`.
    fn name(&self) -> &'static str;

    /// Never fails: errors are logged and degrade to an empty, unsuccessful outcome.
    async fn fetch(&self) -> FetchOutcome {
        match self.fetch_latest().await {
            Ok(items) => {
                tracing::info!(
                    target: "ingest",
                    provider = self.name(),
                    items = items.len(),
                    "provider fetched"
                );
                FetchOutcome::ok(items)
            }
            Err(e) => {
                tracing::warn!(target: "ingest", error = ?e, provider = self.name(), "provider error");
                metrics::counter!("ingest_provider_errors_total", "provider" => self.key())
                    .increment(1);
                FetchOutcome::failed()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_known_and_custom_tags() {
        assert_eq!(Category::from("Model Release"), Category::ModelRelease);
        assert_eq!(Category::from(""), Category::Unknown);
        let custom = Category::from("Policy");
        assert_eq!(custom, Category::Other("Policy".into()));
        assert_eq!(custom.to_string(), "Policy");
        let json = serde_json::to_string(&Category::ResearchWithCode).unwrap();
        assert_eq!(json, "\"Research with Code\"");
    }

    #[test]
    fn bundle_keeps_key_order_and_appends() {
        let mut b = Bundle::with_keys(["b", "a"]);
        b.insert("a", vec![Item::new("x", "S", Category::News)]);
        b.insert("a", vec![Item::new("y", "S", Category::News)]);
        assert_eq!(b.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(b.get("a").map(|v| v.len()), Some(2));
        assert_eq!(b.get("b").map(|v| v.len()), Some(0));
        assert_eq!(b.total_items(), 2);
    }

    #[test]
    fn bundle_serializes_as_object() {
        let b: Bundle = vec![("k", vec![Item::new("t", "S", Category::News)])]
            .into_iter()
            .collect();
        let v = serde_json::to_value(&b).unwrap();
        assert_eq!(v["k"][0]["title"], "t");
        assert_eq!(v["k"][0]["url"], URL_PLACEHOLDER);
    }
}
