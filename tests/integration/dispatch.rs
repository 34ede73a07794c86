//! Request shapes per provider and the first-pass short-circuit

use crate::integration::mock_server::*;
use mockito::Matcher;
use serde_json::json;
use slangshield::Completion;

const PROMPT: &str = "Rewrite this.\n\nTEXT:\nhey send me the report";

#[tokio::test]
async fn test_gemini_request_shape_and_single_call() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", GEMINI_PATH)
        .match_header("x-goog-api-key", "gemini-key")
        .match_header("content-type", Matcher::Regex("application/json".into()))
        .match_body(Matcher::Json(gemini_request(json!([
            {"role": "user", "parts": [{"text": PROMPT}]}
        ]))))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gemini_response("Dear Colleague,\nplease send the report.", "STOP"))
        .expect(1)
        .create_async()
        .await;

    let formalizer = fixture.formalizer();
    let cfg = config("gemini", "gemini-key", "gemini-1.5-flash");
    let out = formalizer.formalize(&cfg, PROMPT).await.unwrap();

    assert_eq!(out.text, "Dear Colleague,\nplease send the report.");
    assert_eq!(out.completion, Completion::Complete);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_openai_request_shape_and_single_call() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", OPENAI_PATH)
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::Json(openai_request(
            "gpt-4o-mini",
            json!([{"role": "user", "content": PROMPT}]),
        )))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(openai_response("  Dear Sir or Madam,  ", "stop"))
        .expect(1)
        .create_async()
        .await;

    let formalizer = fixture.formalizer();
    let out = formalizer
        .formalize(&config("openai", "sk-test", "gpt-4o-mini"), PROMPT)
        .await
        .unwrap();

    assert_eq!(out.text, "Dear Sir or Madam,");
    assert_eq!(out.completion, Completion::Complete);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_openai_compat_uses_configured_base_url() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", COMPAT_PATH)
        .match_header("authorization", "Bearer local-key")
        .match_body(Matcher::Json(openai_request(
            "llama3",
            json!([{"role": "user", "content": PROMPT}]),
        )))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(openai_response("Good morning,", "stop"))
        .expect(1)
        .create_async()
        .await;

    // The override would send openai traffic to "/chat/completions"; compat ignores it.
    let formalizer = fixture.formalizer();
    let cfg = fixture.compat_config("local-key", "llama3");
    let out = formalizer.formalize(&cfg, PROMPT).await.unwrap();

    assert_eq!(out.text, "Good morning,");
    assert_eq!(out.completion, Completion::Complete);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_anthropic_request_shape_and_single_call() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", ANTHROPIC_PATH)
        .match_header("x-api-key", "ant-key")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::Json(anthropic_request(
            "claude-3-5-sonnet-latest",
            json!([{"role": "user", "content": PROMPT}]),
        )))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(anthropic_response("Dear Team,", "end_turn"))
        .expect(1)
        .create_async()
        .await;

    let formalizer = fixture.formalizer();
    let out = formalizer
        .formalize(
            &config("anthropic", "ant-key", "claude-3-5-sonnet-latest"),
            PROMPT,
        )
        .await
        .unwrap();

    assert_eq!(out.text, "Dear Team,");
    assert_eq!(out.completion, Completion::Complete);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_text_is_ok_and_empty() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_exchange(
            OPENAI_PATH,
            openai_request("gpt-4o-mini", json!([{"role": "user", "content": PROMPT}])),
            200,
            r#"{"choices":[{"message":{"role":"assistant","content":null},"finish_reason":"stop"}]}"#,
            1,
        )
        .await;

    let out = fixture
        .formalizer()
        .formalize(&config("openai", "k", "gpt-4o-mini"), PROMPT)
        .await
        .unwrap();

    assert_eq!(out.text, "");
    assert_eq!(out.completion, Completion::Complete);
    mock.assert_async().await;
}
