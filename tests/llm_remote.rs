// tests/llm_remote.rs
use ai_daily_digest::ai_adapter::{
    build_client_from_config, AiClient, GeminiProvider, OpenAiProvider,
};
use ai_daily_digest::analyze::AiError;
use ai_daily_digest::config::AiConfig;
use mockito::Matcher;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn gemini_generate_content_with_mock() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/models/gemini-2.0-flash:generateContent")
        .match_header("x-goog-api-key", "fake-key")
        .match_body(Matcher::PartialJsonString(
            r#"{"contents": [{"parts": [{"text": "Say hi"}]}]}"#.into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Hi "}, {"text": "there"}]},
                    "finishReason": "STOP"
                }]
            }"#,
        )
        .create_async()
        .await;

    let provider = GeminiProvider::new(
        "fake-key".into(),
        "gemini-2.0-flash",
        Some(&server.url()),
        TIMEOUT,
    )
    .unwrap();

    let reply = provider.submit("Say hi").await.unwrap();
    assert_eq!(reply, "Hi there");
    assert_eq!(provider.model(), "gemini-2.0-flash");
    mock.assert_async().await;
}

#[tokio::test]
async fn gemini_status_error_is_typed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/models/gemini-2.0-flash:generateContent")
        .with_status(429)
        .with_body("quota exceeded")
        .create_async()
        .await;

    let provider = GeminiProvider::new(
        "fake-key".into(),
        "gemini-2.0-flash",
        Some(&server.url()),
        TIMEOUT,
    )
    .unwrap();

    match provider.submit("x").await {
        Err(AiError::Status { status, body }) => {
            assert_eq!(status, 429);
            assert!(body.contains("quota"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn gemini_without_candidates_is_empty_response() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/models/gemini-2.0-flash:generateContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates": []}"#)
        .create_async()
        .await;

    let provider = GeminiProvider::new(
        "fake-key".into(),
        "gemini-2.0-flash",
        Some(&server.url()),
        TIMEOUT,
    )
    .unwrap();
    assert!(matches!(
        provider.submit("x").await,
        Err(AiError::EmptyResponse)
    ));
}

#[tokio::test]
async fn missing_key_fails_before_any_request() {
    let provider = GeminiProvider::new(String::new(), "m", Some("http://127.0.0.1:9"), TIMEOUT)
        .unwrap();
    assert!(matches!(
        provider.submit("x").await,
        Err(AiError::MissingApiKey("gemini"))
    ));
}

#[tokio::test]
async fn openai_chat_completions_with_mock() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer fake-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "model": "gpt-4o-mini",
                "choices": [{
                    "message": {"role": "assistant", "content": "[{\"rank\": 1}]"},
                    "finish_reason": "stop"
                }]
            }"#,
        )
        .create_async()
        .await;

    let url = format!("{}/v1/chat/completions", server.url());
    let provider = OpenAiProvider::new("fake-key".into(), "gpt-4o-mini", Some(&url), TIMEOUT)
        .unwrap();

    let reply = provider.submit("rank things").await.unwrap();
    assert_eq!(reply, r#"[{"rank": 1}]"#);
    mock.assert_async().await;
}

#[serial_test::serial]
#[tokio::test]
async fn factory_honors_mock_mode_and_disabled_config() {
    std::env::set_var("AI_TEST_MODE", "mock");
    let client = build_client_from_config(&AiConfig::default()).unwrap();
    assert_eq!(client.provider_name(), "mock");
    assert!(!client.submit("anything").await.unwrap().is_empty());
    std::env::remove_var("AI_TEST_MODE");

    let client = build_client_from_config(&AiConfig::default()).unwrap();
    assert_eq!(client.provider_name(), "disabled");
    assert!(matches!(
        client.submit("x").await,
        Err(AiError::Disabled)
    ));

    let cfg = AiConfig {
        enabled: true,
        provider: "openai".into(),
        api_key: "k".into(),
        ..AiConfig::default()
    };
    let client = build_client_from_config(&cfg).unwrap();
    assert_eq!(client.provider_name(), "openai");
    assert_eq!(client.model(), "gpt-4o-mini");

    let bad = AiConfig {
        enabled: true,
        provider: "unknown".into(),
        ..AiConfig::default()
    };
    assert!(build_client_from_config(&bad).is_err());
}
