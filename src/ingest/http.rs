// src/ingest/http.rs
//! Thin reqwest helpers shared by the network-backed providers.

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = "ai-daily-digest/0.1 (AI news aggregator)";

/// Client with a bounded per-request timeout and a descriptive user agent.
pub fn build_client(timeout: Duration, user_agent: &str) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout.min(Duration::from_secs(4)))
        .timeout(timeout)
        .build()
        .context("building reqwest client")
}

async fn get_checked(client: &reqwest::Client, url: &str) -> Result<reqwest::Response> {
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let snippet: String = body.chars().take(200).collect();
        return Err(anyhow!("GET {url} returned {status}: {snippet}"));
    }
    Ok(resp)
}

/// GET a body as text; non-2xx is an error.
pub async fn get_text(client: &reqwest::Client, url: &str) -> Result<String> {
    get_checked(client, url)
        .await?
        .text()
        .await
        .with_context(|| format!("reading body of {url}"))
}

/// GET and decode JSON; non-2xx and shape mismatch are errors.
pub async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T> {
    let body = get_text(client, url).await?;
    serde_json::from_str(&body).with_context(|| format!("decoding JSON from {url}"))
}
