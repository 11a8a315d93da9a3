// src/ingest/providers/huggingface.rs
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::ingest::http::get_json;
use crate::ingest::types::{Category, Item, SourceProvider};

#[derive(Debug, Deserialize)]
struct HfModel {
    #[serde(rename = "modelId")]
    model_id: Option<String>,
    id: Option<String>,
    downloads: Option<u64>,
    likes: Option<u64>,
    #[serde(rename = "pipeline_tag")]
    pipeline_tag: Option<String>,
}

/// Most-downloaded models from the Hugging Face hub listing API.
pub struct HuggingFaceProvider {
    client: reqwest::Client,
    url: String,
    limit: usize,
}

impl HuggingFaceProvider {
    pub fn new(client: reqwest::Client, url: &str, limit: usize) -> Self {
        Self {
            client,
            url: url.to_string(),
            limit,
        }
    }

    pub fn parse_items_from_str(json: &str, limit: usize) -> Result<Vec<Item>> {
        let models: Vec<HfModel> = serde_json::from_str(json)?;
        Ok(Self::to_items(models, limit))
    }

    fn to_items(models: Vec<HfModel>, limit: usize) -> Vec<Item> {
        models
            .into_iter()
            .filter_map(|m| {
                let id = m.model_id.or(m.id)?.trim().to_string();
                if id.is_empty() {
                    return None;
                }
                let mut summary = format!(
                    "{} downloads, {} likes",
                    m.downloads.unwrap_or(0),
                    m.likes.unwrap_or(0)
                );
                if let Some(tag) = m.pipeline_tag.filter(|t| !t.is_empty()) {
                    summary.push_str(&format!(" ({tag})"));
                }
                Some(
                    Item::new(id.clone(), "Hugging Face", Category::ModelRelease)
                        .with_summary(summary)
                        .with_url(format!("https://huggingface.co/{id}"))
                        .with_popularity(m.downloads, m.likes),
                )
            })
            .take(limit)
            .collect()
    }
}

#[async_trait]
impl SourceProvider for HuggingFaceProvider {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        let models: Vec<HfModel> = get_json(&self.client, &self.url).await?;
        Ok(Self::to_items(models, self.limit))
    }

    fn key(&self) -> &'static str {
        "huggingface_models"
    }

    fn name(&self) -> &'static str {
        "Hugging Face"
    }
}
