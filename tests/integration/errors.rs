//! Primary-call failures: HTTP, malformed bodies, network and timeouts

use crate::integration::mock_server::*;
use serde_json::json;
use slangshield::{Error, Formalizer, Settings};
use std::time::Duration;

const PROMPT: &str = "PROMPT";

#[tokio::test]
async fn test_primary_http_error_aborts_without_continuation() {
    let mut fixture = MockServerFixture::new().await;
    let cfg = fixture.compat_config("k", "gpt-4o-mini");
    let primary = fixture
        .mock_exchange(
            COMPAT_PATH,
            openai_request("gpt-4o-mini", json!([{"role": "user", "content": PROMPT}])),
            500,
            "internal failure",
            1,
        )
        .await;

    let err = fixture
        .formalizer()
        .formalize(&cfg, PROMPT)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "OpenAI-compatible HTTP 500 — internal failure");
    assert_eq!(err.http_status(), Some(500));
    assert!(!err.is_configuration());
    primary.assert_async().await;
}

#[tokio::test]
async fn test_anthropic_unauthorized_is_named() {
    let mut fixture = MockServerFixture::new().await;
    let primary = fixture
        .mock_exchange(
            ANTHROPIC_PATH,
            anthropic_request("claude-3-5-sonnet-latest", json!([{"role": "user", "content": PROMPT}])),
            401,
            r#"{"type":"error","error":{"type":"authentication_error"}}"#,
            1,
        )
        .await;

    let err = fixture
        .formalizer()
        .formalize(&config("anthropic", "bad", "claude-3-5-sonnet-latest"), PROMPT)
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("Anthropic HTTP 401"));
    assert!(matches!(err, Error::Provider { .. }));
    primary.assert_async().await;
}

#[tokio::test]
async fn test_error_excerpt_is_bounded() {
    let mut fixture = MockServerFixture::new().await;
    let body = "x".repeat(2000);
    let primary = fixture
        .mock_exchange(
            GEMINI_PATH,
            gemini_request(json!([{"role": "user", "parts": [{"text": PROMPT}]}])),
            503,
            &body,
            1,
        )
        .await;

    let err = fixture
        .formalizer()
        .formalize(&config("gemini", "k", "gemini-1.5-flash"), PROMPT)
        .await
        .unwrap_err();

    let expected = format!("Gemini HTTP 503 — {}", "x".repeat(500));
    assert_eq!(err.to_string(), expected);
    primary.assert_async().await;
}

#[tokio::test]
async fn test_primary_malformed_body_is_an_error() {
    let mut fixture = MockServerFixture::new().await;
    let primary = fixture
        .mock_exchange(
            OPENAI_PATH,
            openai_request("gpt-4o-mini", json!([{"role": "user", "content": PROMPT}])),
            200,
            "not json at all",
            1,
        )
        .await;

    let err = fixture
        .formalizer()
        .formalize(&config("openai", "k", "gpt-4o-mini"), PROMPT)
        .await
        .unwrap_err();

    assert_eq!(err.http_status(), Some(200));
    assert!(err.to_string().contains("malformed JSON"));
    primary.assert_async().await;
}

#[tokio::test]
async fn test_network_failure_is_reported() {
    let base = closed_port().await;
    let cfg = Settings::new("openai_compat", "k", "m")
        .with_base_url(base)
        .validate()
        .unwrap();

    let err = Formalizer::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
        .formalize(&cfg, PROMPT)
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("OpenAI-compatible network error"));
    assert!(!err.is_timeout());
    assert_eq!(err.http_status(), None);
}

#[tokio::test]
async fn test_per_call_timeout_aborts_request() {
    let base = silent_server().await;
    let cfg = Settings::new("openai_compat", "k", "m")
        .with_base_url(base)
        .validate()
        .unwrap();

    let formalizer = Formalizer::builder()
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();

    let started = std::time::Instant::now();
    let err = formalizer.formalize(&cfg, PROMPT).await.unwrap_err();

    assert!(err.is_timeout());
    assert!(started.elapsed() < Duration::from_secs(5));
}
