// src/ingest/stats.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ingest::types::{Bundle, Category};

const UNKNOWN: &str = "Unknown";

/// Aggregate counts derived from one bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_items: usize,
    /// Providers that reported success in this cycle.
    pub sources_count: usize,
    pub sources_list: Vec<String>,
    pub by_category: BTreeMap<String, usize>,
    pub by_source: BTreeMap<String, usize>,
}

impl Stats {
    /// Single pass over every item; `succeeded` lists provider names that reported success.
    pub fn compute(bundle: &Bundle, succeeded: &[String]) -> Self {
        let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_source: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_items = 0usize;

        for item in bundle.items() {
            total_items += 1;

            let cat = match &item.category {
                Category::Other(s) if s.trim().is_empty() => UNKNOWN,
                c => c.as_str(),
            };
            *by_category.entry(cat.to_string()).or_default() += 1;

            let src = if item.source.trim().is_empty() {
                UNKNOWN
            } else {
                item.source.as_str()
            };
            *by_source.entry(src.to_string()).or_default() += 1;
        }

        Self {
            total_items,
            sources_count: succeeded.len(),
            sources_list: succeeded.to_vec(),
            by_category,
            by_source,
        }
    }

    /// Sum of the counts for the given categories.
    pub fn count_of(&self, categories: &[Category]) -> usize {
        categories
            .iter()
            .map(|c| self.by_category.get(c.as_str()).copied().unwrap_or(0))
            .sum()
    }
}
