// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ingest::http::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

const ENV_PATH: &str = "DIGEST_SOURCES_PATH";

pub const DEFAULT_AI_KEYWORDS: &[&str] = &[
    "ai",
    "ml",
    "machine learning",
    "deep learning",
    "neural",
    "llm",
    "gpt",
    "transformer",
    "model",
];

/// Static per-source settings. Every field has a default so partial files work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub arxiv: FeedSource,
    pub huggingface: FeedSource,
    pub github: GithubSource,
    pub reddit: RedditSource,
    pub papers_with_code: FeedSource,
}

/// Empty `url` or zero `limit` fall back to the source's built-in value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSource {
    pub url: String,
    pub limit: usize,
}

impl FeedSource {
    fn or_defaults(mut self, fallback: FeedSource) -> Self {
        if self.url.trim().is_empty() {
            self.url = fallback.url;
        }
        if self.limit == 0 {
            self.limit = fallback.limit;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubSource {
    pub url: String,
    pub limit: usize,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedditSource {
    pub base_url: String,
    pub subreddits: Vec<String>,
    pub limit: usize,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            arxiv: FeedSource {
                url: "http://export.arxiv.org/rss/cs.AI".into(),
                limit: 10,
            },
            huggingface: FeedSource {
                url: "https://huggingface.co/api/models?limit=10&sort=downloads&direction=-1"
                    .into(),
                limit: 10,
            },
            github: GithubSource::default(),
            reddit: RedditSource::default(),
            papers_with_code: FeedSource {
                url: "https://paperswithcode.com/rss/latest".into(),
                limit: 8,
            },
        }
    }
}

impl Default for GithubSource {
    fn default() -> Self {
        Self {
            url: "https://github.com/trending/python?since=daily".into(),
            limit: 8,
            keywords: DEFAULT_AI_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for RedditSource {
    fn default() -> Self {
        Self {
            base_url: "https://www.reddit.com".into(),
            subreddits: vec![
                "MachineLearning".into(),
                "artificial".into(),
                "LocalLLaMA".into(),
            ],
            limit: 5,
        }
    }
}

impl SourcesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    fn cleaned(mut self) -> Self {
        let defaults = SourcesConfig::default();
        self.arxiv = self.arxiv.or_defaults(defaults.arxiv);
        self.huggingface = self.huggingface.or_defaults(defaults.huggingface);
        self.papers_with_code = self.papers_with_code.or_defaults(defaults.papers_with_code);
        self.github.keywords = clean_keywords(self.github.keywords);
        self.reddit.subreddits = self
            .reddit
            .subreddits
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if self.user_agent.trim().is_empty() {
            self.user_agent = DEFAULT_USER_AGENT.to_string();
        }
        self
    }
}

/// Load source settings from an explicit path. Supports TOML or JSON.
pub fn load_sources_from(path: &Path) -> Result<SourcesConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sources config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_sources(&content, ext.as_str())
}

/// Load source settings using env var + fallbacks:
/// 1) $DIGEST_SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
/// 4) built-in defaults
pub fn load_sources_default() -> Result<SourcesConfig> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        } else {
            return Err(anyhow!("{ENV_PATH} points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_sources_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_sources_from(&json_p);
    }
    Ok(SourcesConfig::default())
}

fn parse_sources(s: &str, hint_ext: &str) -> Result<SourcesConfig> {
    let cfg = if hint_ext == "json" {
        serde_json::from_str::<SourcesConfig>(s).context("parsing sources json")?
    } else {
        toml::from_str::<SourcesConfig>(s).context("parsing sources toml")?
    };
    Ok(cfg.cleaned())
}

/// Trim, lower-case, drop empties and duplicates (sorted).
pub fn clean_keywords(items: Vec<String>) -> Vec<String> {
    use std::collections::BTreeSet;
    let mut set = BTreeSet::new();
    for it in items {
        let t = it.trim().to_lowercase();
        if !t.is_empty() {
            set.insert(t);
        }
    }
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = parse_sources(
            r#"
timeout_secs = 5
[github]
keywords = [" LLM ", "", "llm", "Agent"]
"#,
            "toml",
        )
        .unwrap();
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.github.keywords, vec!["agent".to_string(), "llm".to_string()]);
        assert_eq!(cfg.github.limit, 8);
        assert_eq!(cfg.arxiv, SourcesConfig::default().arxiv);
    }

    #[test]
    fn partial_feed_tables_keep_their_url() {
        let cfg = parse_sources(
            r#"
[arxiv]
limit = 5

[papers_with_code]
url = "https://example.org/pwc.xml"
"#,
            "toml",
        )
        .unwrap();
        let defaults = SourcesConfig::default();
        assert_eq!(cfg.arxiv.limit, 5);
        assert_eq!(cfg.arxiv.url, defaults.arxiv.url);
        assert_eq!(cfg.papers_with_code.url, "https://example.org/pwc.xml");
        assert_eq!(cfg.papers_with_code.limit, defaults.papers_with_code.limit);
        assert_eq!(cfg.huggingface, defaults.huggingface);
    }

    #[test]
    fn json_is_supported() {
        let cfg = parse_sources(r#"{"reddit": {"subreddits": ["singularity", " "]}}"#, "json")
            .unwrap();
        assert_eq!(cfg.reddit.subreddits, vec!["singularity".to_string()]);
        assert_eq!(cfg.reddit.limit, 5);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_sources("timeout_secs = [", "toml").is_err());
    }
}
