//! AI adapter: LLM provider abstraction used by the analysis facets.
//!
//! Every provider implements `submit(prompt) -> text`. Structured replies are
//! interpreted by the caller (see `analyze::extract`), never here.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analyze::error::AiError;
use crate::config::ai::AiConfig;

// ------------------------------------------------------------
// Public surface
// ------------------------------------------------------------

pub type AiFuture<'a> = Pin<Box<dyn Future<Output = Result<String, AiError>> + Send + 'a>>;

/// Trait object used by the analyzer and tests.
pub trait AiClient: Send + Sync {
    /// Submit one prompt and return the raw reply text.
    fn submit<'a>(&'a self, prompt: &'a str) -> AiFuture<'a>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
    /// Model identifier recorded in the analysis metadata.
    fn model(&self) -> &str;
}

/// Convenient alias used by callers.
pub type DynAiClient = Arc<dyn AiClient>;

const GEMINI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const OPENAI_BASE: &str = "https://api.openai.com/v1/chat/completions";

/// Factory: build a client according to config and environment variables.
///
/// * If `AI_TEST_MODE=mock`, returns a deterministic mock client.
/// * Else if `config.enabled==false`, returns a disabled client.
/// * Else builds the configured provider.
pub fn build_client_from_config(config: &AiConfig) -> anyhow::Result<DynAiClient> {
    if std::env::var("AI_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Ok(Arc::new(MockClient::new("Neutral summary (mock)")));
    }

    if !config.enabled {
        return Ok(Arc::new(DisabledClient));
    }

    let timeout = config.request_timeout();
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiProvider::new(
            config.api_key.clone(),
            config.model_name(),
            config.base_url.as_deref(),
            timeout,
        )?)),
        "openai" => Ok(Arc::new(OpenAiProvider::new(
            config.api_key.clone(),
            config.model_name(),
            config.base_url.as_deref(),
            timeout,
        )?)),
        other => anyhow::bail!("unsupported AI provider: {other}"),
    }
}

fn http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    use anyhow::Context;
    reqwest::Client::builder()
        .user_agent(concat!("ai-daily-digest/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(10))
        .timeout(timeout)
        .build()
        .context("building LLM http client")
}

async fn error_for_status(resp: reqwest::Response) -> Result<reqwest::Response, AiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(AiError::Status {
        status: status.as_u16(),
        body: body.chars().take(300).collect(),
    })
}

// ------------------------------------------------------------
// Gemini (Generative Language API, generateContent)
// ------------------------------------------------------------

pub struct GeminiProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(
        api_key: String,
        model: &str,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            http: http_client(timeout)?,
            api_key,
            model: model.to_string(),
            base_url: base_url.unwrap_or(GEMINI_BASE).trim_end_matches('/').to_string(),
        })
    }

    async fn submit_impl(&self, prompt: &str) -> Result<String, AiError> {
        if self.api_key.is_empty() {
            return Err(AiError::MissingApiKey("gemini"));
        }

        #[derive(Serialize)]
        struct Part<'a> {
            text: &'a str,
        }
        #[derive(Serialize)]
        struct Content<'a> {
            parts: Vec<Part<'a>>,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            contents: Vec<Content<'a>>,
        }
        #[derive(Deserialize)]
        struct Resp {
            #[serde(default)]
            candidates: Vec<Candidate>,
        }
        #[derive(Deserialize)]
        struct Candidate {
            content: Option<RespContent>,
        }
        #[derive(Deserialize)]
        struct RespContent {
            #[serde(default)]
            parts: Vec<RespPart>,
        }
        #[derive(Deserialize)]
        struct RespPart {
            #[serde(default)]
            text: String,
        }

        let req = Req {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&req)
            .send()
            .await?;
        let body: Resp = error_for_status(resp).await?.json().await?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(text)
    }
}

impl AiClient for GeminiProvider {
    fn submit<'a>(&'a self, prompt: &'a str) -> AiFuture<'a> {
        Box::pin(self.submit_impl(prompt))
    }
    fn provider_name(&self) -> &'static str {
        "gemini"
    }
    fn model(&self) -> &str {
        &self.model
    }
}

// ------------------------------------------------------------
// OpenAI-compatible chat completions
// ------------------------------------------------------------

pub struct OpenAiProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl OpenAiProvider {
    /// `base_url` is the full chat-completions endpoint.
    pub fn new(
        api_key: String,
        model: &str,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            http: http_client(timeout)?,
            api_key,
            model: model.to_string(),
            url: base_url.unwrap_or(OPENAI_BASE).to_string(),
        })
    }

    async fn submit_impl(&self, prompt: &str) -> Result<String, AiError> {
        if self.api_key.is_empty() {
            return Err(AiError::MissingApiKey("openai"));
        }

        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            #[serde(default)]
            content: Option<String>,
        }

        let req = Req {
            model: &self.model,
            messages: vec![Msg {
                role: "user",
                content: prompt,
            }],
            temperature: 0.4,
        };

        let resp = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?;
        let body: Resp = error_for_status(resp).await?.json().await?;
        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(text)
    }
}

impl AiClient for OpenAiProvider {
    fn submit<'a>(&'a self, prompt: &'a str) -> AiFuture<'a> {
        Box::pin(self.submit_impl(prompt))
    }
    fn provider_name(&self) -> &'static str {
        "openai"
    }
    fn model(&self) -> &str {
        &self.model
    }
}

// ------------------------------------------------------------
// Disabled + mock
// ------------------------------------------------------------

/// Always fails with `AiError::Disabled`; every LLM facet falls back to neutral.
pub struct DisabledClient;

impl AiClient for DisabledClient {
    fn submit<'a>(&'a self, _prompt: &'a str) -> AiFuture<'a> {
        Box::pin(async { Err(AiError::Disabled) })
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
    fn model(&self) -> &str {
        "none"
    }
}

/// Returns the same reply for every prompt.
#[derive(Clone)]
pub struct MockClient {
    pub fixed: String,
}

impl MockClient {
    pub fn new(fixed: impl Into<String>) -> Self {
        Self {
            fixed: fixed.into(),
        }
    }
}

impl AiClient for MockClient {
    fn submit<'a>(&'a self, _prompt: &'a str) -> AiFuture<'a> {
        let out = self.fixed.clone();
        Box::pin(async move { Ok(out) })
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
    fn model(&self) -> &str {
        "mock"
    }
}
