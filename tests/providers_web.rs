// tests/providers_web.rs
use ai_daily_digest::ingest::config::DEFAULT_AI_KEYWORDS;
use ai_daily_digest::ingest::http::build_client;
use ai_daily_digest::ingest::providers::github_trending::GithubTrendingProvider;
use ai_daily_digest::ingest::providers::huggingface::HuggingFaceProvider;
use ai_daily_digest::ingest::providers::reddit::RedditProvider;
use ai_daily_digest::ingest::types::{Category, SourceProvider};
use mockito::Matcher;
use std::time::Duration;

const TRENDING_HTML: &str = include_str!("fixtures/github_trending.html");
const REDDIT_JSON: &str = include_str!("fixtures/reddit_hot.json");
const HF_JSON: &str = include_str!("fixtures/hf_models.json");

fn client() -> reqwest::Client {
    build_client(Duration::from_secs(5), "ai-daily-digest-tests").unwrap()
}

fn ai_keywords() -> Vec<String> {
    DEFAULT_AI_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

#[test]
fn trending_keeps_only_ai_repositories() {
    let items =
        GithubTrendingProvider::parse_items_from_str(TRENDING_HTML, 8, &ai_keywords()).unwrap();
    let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Trending: acme/fast-llm", "Trending: lab/neural-ode"]);

    assert_eq!(items[0].stars, Some(1234));
    assert_eq!(items[0].url, "https://github.com/acme/fast-llm");
    assert_eq!(items[0].category, Category::OpenSourceTool);
    assert_eq!(items[1].summary, "No description");
}

#[test]
fn trending_without_keywords_keeps_everything() {
    let items = GithubTrendingProvider::parse_items_from_str(TRENDING_HTML, 8, &[]).unwrap();
    assert_eq!(items.len(), 3);
}

#[test]
fn huggingface_skips_entries_without_id() {
    let items = HuggingFaceProvider::parse_items_from_str(HF_JSON, 10).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "meta-llama/Llama-3.1-8B-Instruct");
    assert_eq!(items[0].category, Category::ModelRelease);
    assert_eq!(items[0].downloads, Some(5_400_000));
    assert!(items[0].summary.contains("text-generation"));
    assert_eq!(items[1].url, "https://huggingface.co/openai/whisper-large-v3");
}

#[tokio::test]
async fn huggingface_fetch_over_http() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/models")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(HF_JSON)
        .create_async()
        .await;

    let url = format!("{}/api/models?limit=10&sort=downloads", server.url());
    let outcome = HuggingFaceProvider::new(client(), &url, 10).fetch().await;
    assert!(outcome.succeeded);
    assert_eq!(outcome.items.len(), 2);
}

#[tokio::test]
async fn reddit_partial_failure_still_succeeds() {
    let mut server = mockito::Server::new_async().await;
    let ok = server
        .mock("GET", "/r/MachineLearning/hot.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REDDIT_JSON)
        .create_async()
        .await;
    let _down = server
        .mock("GET", "/r/artificial/hot.json")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let provider = RedditProvider::new(
        client(),
        &server.url(),
        vec!["MachineLearning".into(), "artificial".into()],
        5,
    );
    let outcome = provider.fetch().await;

    assert!(outcome.succeeded);
    assert_eq!(outcome.items.len(), 2);
    let first = &outcome.items[0];
    assert_eq!(first.source, "Reddit r/MachineLearning");
    assert_eq!(first.category, Category::CommunityDiscussion);
    assert_eq!(first.upvotes, Some(321));
    assert_eq!(first.comments, Some(87));
    assert_eq!(
        first.url,
        "https://reddit.com/r/MachineLearning/comments/abc123/which_model/"
    );
    ok.assert_async().await;
}

#[tokio::test]
async fn reddit_fails_when_every_subreddit_fails() {
    let mut server = mockito::Server::new_async().await;
    let _down = server
        .mock("GET", Matcher::Regex(r"^/r/.+/hot\.json".into()))
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let provider = RedditProvider::new(client(), &server.url(), vec!["a".into(), "b".into()], 5);
    let outcome = provider.fetch().await;
    assert!(!outcome.succeeded);
    assert!(outcome.items.is_empty());
}

#[tokio::test]
async fn trending_malformed_json_style_body_yields_no_rows() {
    // Not an error: a page without rows simply has nothing trending.
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/trending/python")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html><body>nothing here</body></html>")
        .create_async()
        .await;

    let url = format!("{}/trending/python?since=daily", server.url());
    let outcome = GithubTrendingProvider::new(client(), &url, 8, ai_keywords())
        .fetch()
        .await;
    assert!(outcome.succeeded);
    assert!(outcome.items.is_empty());
}

#[tokio::test]
async fn huggingface_server_error_is_a_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/models")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let url = format!("{}/api/models?limit=10", server.url());
    let outcome = HuggingFaceProvider::new(client(), &url, 10).fetch().await;
    assert!(!outcome.succeeded);
    assert!(outcome.items.is_empty());
}

#[tokio::test]
async fn huggingface_object_instead_of_array_is_a_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/models")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "rate limited"}"#)
        .create_async()
        .await;

    let url = format!("{}/api/models?limit=10", server.url());
    let outcome = HuggingFaceProvider::new(client(), &url, 10).fetch().await;
    assert!(!outcome.succeeded);
    assert!(outcome.items.is_empty());
    assert!(HuggingFaceProvider::parse_items_from_str(r#"{"models": []}"#, 10).is_err());
}

#[tokio::test]
async fn trending_not_found_is_a_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/trending/python")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body("Not Found")
        .create_async()
        .await;

    let url = format!("{}/trending/python?since=daily", server.url());
    let outcome = GithubTrendingProvider::new(client(), &url, 8, ai_keywords())
        .fetch()
        .await;
    assert!(!outcome.succeeded);
    assert!(outcome.items.is_empty());
}

#[test]
fn long_descriptions_and_selftext_are_capped() {
    use ai_daily_digest::ingest::providers::{github_trending, reddit};
    use ai_daily_digest::ingest::TRUNCATION_MARKER;

    let long = "neural network inference kernels ".repeat(30);

    let html = format!(
        r#"<html><body><article class="Box-row">
<h2><a href="/acme/long-llm">acme / long-llm</a></h2>
<p class="col-9 color-fg-muted my-1 pr-4">{long}</p>
</article></body></html>"#
    );
    let items = GithubTrendingProvider::parse_items_from_str(&html, 8, &ai_keywords()).unwrap();
    assert_eq!(items.len(), 1);
    assert!(
        items[0].summary.chars().count() <= github_trending::SUMMARY_CAP + TRUNCATION_MARKER.len()
    );
    assert!(items[0].summary.ends_with(TRUNCATION_MARKER));

    let json = serde_json::json!({
        "data": {"children": [{"data": {
            "title": "[D] A very long post",
            "selftext": long,
            "ups": 1,
            "num_comments": 0,
            "permalink": "/r/MachineLearning/comments/x/long/"
        }}]}
    })
    .to_string();
    let items = RedditProvider::parse_items_from_str(&json, "MachineLearning").unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0].summary.chars().count() <= reddit::SUMMARY_CAP + TRUNCATION_MARKER.len());
    assert!(items[0].summary.ends_with(TRUNCATION_MARKER));
}
