// src/analyze/importance.rs
//! Deterministic keyword bucketing of every collected item.

use serde::{Deserialize, Serialize};

use crate::ingest::types::{Bundle, Item};

pub const CRITICAL_KEYWORDS: &[&str] = &[
    "breakthrough",
    "release",
    "launches",
    "announces",
    "gpt",
    "gemini",
];
pub const HIGH_KEYWORDS: &[&str] = &["improves", "enhances", "new model", "open source"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Critical,
    High,
    Medium,
    Low,
}

/// Every item of the bundle lands in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportanceBuckets {
    pub critical: Vec<Item>,
    pub high: Vec<Item>,
    pub medium: Vec<Item>,
    pub low: Vec<Item>,
}

impl ImportanceBuckets {
    pub fn total(&self) -> usize {
        self.critical.len() + self.high.len() + self.medium.len() + self.low.len()
    }

    fn push(&mut self, level: Level, item: Item) {
        match level {
            Level::Critical => self.critical.push(item),
            Level::High => self.high.push(item),
            Level::Medium => self.medium.push(item),
            Level::Low => self.low.push(item),
        }
    }
}

/// First matching rule wins: title keywords, then the group key.
pub fn classify(group_key: &str, title: &str) -> Level {
    let title = title.to_lowercase();
    if CRITICAL_KEYWORDS.iter().any(|kw| title.contains(kw)) {
        return Level::Critical;
    }
    if HIGH_KEYWORDS.iter().any(|kw| title.contains(kw)) {
        return Level::High;
    }
    let key = group_key.to_lowercase();
    if key.contains("research") || key.contains("paper") {
        Level::Medium
    } else {
        Level::Low
    }
}

pub fn categorize(bundle: &Bundle) -> ImportanceBuckets {
    let mut buckets = ImportanceBuckets::default();
    for (key, items) in bundle.iter() {
        for item in items {
            buckets.push(classify(key, &item.title), item.clone());
        }
    }
    tracing::debug!(
        critical = buckets.critical.len(),
        high = buckets.high.len(),
        medium = buckets.medium.len(),
        low = buckets.low.len(),
        "items categorized"
    );
    buckets
}
