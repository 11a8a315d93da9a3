// src/config/ai.rs
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use std::{env, fs, path::Path};

const ENV_PATH: &str = "AI_CONFIG_PATH";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

fn default_request_timeout_secs() -> u64 {
    60
}
fn default_facet_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    pub enabled: bool,
    /// "gemini" | "openai" (case-insensitive)
    pub provider: String,
    /// Provider default when absent.
    #[serde(default)]
    pub model: Option<String>,
    /// "ENV" means: read from GEMINI_API_KEY / OPENAI_API_KEY (by provider)
    pub api_key: String,
    /// Override for OpenAI-compatible gateways or tests.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Upper bound for one analysis facet, LLM call included.
    #[serde(default = "default_facet_timeout_secs")]
    pub facet_timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: "gemini".into(),
            model: None,
            api_key: String::new(),
            base_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            facet_timeout_secs: default_facet_timeout_secs(),
        }
    }
}

impl AiConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        use anyhow::Context;
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading AI config from {}", path.display()))?;
        let mut cfg: AiConfig = serde_json::from_str(&data).context("parsing AI config json")?;

        // Normalize provider
        cfg.provider = cfg.provider.trim().to_lowercase();

        // Resolve api key if "ENV"
        if cfg.api_key.trim().eq_ignore_ascii_case("env") {
            let var = api_key_var(&cfg.provider)?;
            cfg.api_key = match env::var(var) {
                Ok(k) if !k.trim().is_empty() => k,
                _ => {
                    tracing::warn!(var, "API key variable unset, LLM analysis disabled");
                    cfg.enabled = false;
                    String::new()
                }
            };
        }

        cfg.sanitize();
        Ok(cfg)
    }

    /// Pure env configuration: AI_PROVIDER (default gemini), AI_MODEL, AI_BASE_URL and the
    /// provider's key variable. Enabled iff a key is present.
    pub fn from_env() -> Self {
        let provider = env::var("AI_PROVIDER")
            .map(|p| p.trim().to_lowercase())
            .unwrap_or_else(|_| "gemini".into());
        let api_key = api_key_var(&provider)
            .ok()
            .and_then(|var| env::var(var).ok())
            .unwrap_or_default();
        let mut cfg = Self {
            enabled: !api_key.trim().is_empty(),
            provider,
            model: env::var("AI_MODEL").ok().filter(|m| !m.trim().is_empty()),
            api_key,
            base_url: env::var("AI_BASE_URL").ok().filter(|u| !u.trim().is_empty()),
            ..Self::default()
        };
        cfg.sanitize();
        cfg
    }

    /// 1) $AI_CONFIG_PATH  2) config/ai.json  3) environment only.
    pub fn load_default() -> anyhow::Result<Self> {
        if let Ok(p) = env::var(ENV_PATH) {
            return Self::load_from_file(PathBuf::from(p));
        }
        let p = PathBuf::from("config/ai.json");
        if p.exists() {
            return Self::load_from_file(p);
        }
        Ok(Self::from_env())
    }

    pub fn model_name(&self) -> &str {
        match self.model.as_deref() {
            Some(m) => m,
            None if self.provider == "openai" => DEFAULT_OPENAI_MODEL,
            None => DEFAULT_GEMINI_MODEL,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn facet_timeout(&self) -> Duration {
        Duration::from_secs(self.facet_timeout_secs)
    }

    /// Key shown as `abcdefgh...wxyz`; short keys are fully masked.
    pub fn masked_key(&self) -> String {
        mask_secret(&self.api_key)
    }

    fn sanitize(&mut self) {
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = default_request_timeout_secs();
        }
        if self.facet_timeout_secs == 0 {
            self.facet_timeout_secs = default_facet_timeout_secs();
        }
    }
}

fn api_key_var(provider: &str) -> anyhow::Result<&'static str> {
    match provider {
        "gemini" => Ok("GEMINI_API_KEY"),
        "openai" => Ok("OPENAI_API_KEY"),
        other => anyhow::bail!("Unsupported provider in config: {other}"),
    }
}

pub fn mask_secret(s: &str) -> String {
    let n = s.chars().count();
    if n == 0 {
        return "(unset)".into();
    }
    if n <= 12 {
        return "*".repeat(n);
    }
    let head: String = s.chars().take(8).collect();
    let tail: String = s.chars().skip(n - 4).collect();
    format!("{head}...{tail}")
}
