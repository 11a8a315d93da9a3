// src/ingest/providers/mod.rs
pub mod arxiv_rss;
pub mod curated;
pub mod github_trending;
pub mod huggingface;
pub mod papers_with_code;
pub mod reddit;
pub mod rss;
