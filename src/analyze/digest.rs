// src/analyze/digest.rs
//! Compact text rendering of a bundle, shared by every LLM prompt.

use crate::ingest::truncate_summary;
use crate::ingest::types::Bundle;
use std::fmt::Write;

/// Items listed per group.
pub const MAX_ITEMS_PER_GROUP: usize = 15;
/// Summary chars kept per item.
pub const MAX_SUMMARY_CHARS: usize = 150;

/// `KEY NAME` header for a bundle key (`arxiv_papers` -> `ARXIV PAPERS`).
pub fn group_header(key: &str) -> String {
    key.to_uppercase().replace('_', " ")
}

/// One block per non-empty group: header, then up to 15 numbered items with
/// an indented summary line when the item has one.
pub fn prepare_digest(bundle: &Bundle) -> String {
    let mut out = String::new();
    for (key, items) in bundle.iter() {
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{}:", group_header(key));
        for (i, item) in items.iter().take(MAX_ITEMS_PER_GROUP).enumerate() {
            let _ = writeln!(out, "{}. {} [{}]", i + 1, item.title, item.source);
            let summary = item.summary.trim();
            if !summary.is_empty() {
                let _ = writeln!(out, "   {}", truncate_summary(summary, MAX_SUMMARY_CHARS));
            }
        }
    }
    out.trim().to_string()
}
