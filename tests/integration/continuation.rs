//! Truncation detection and the single continuation call

use crate::integration::mock_server::*;
use serde_json::{json, Value};
use slangshield::prompt::CONTINUE_PROMPT;
use slangshield::{Completion, Formalizer, Settings};
use std::sync::atomic::Ordering;
use std::time::Duration;

const PROMPT: &str = "PROMPT";

fn openai_primary() -> Value {
    openai_request("gpt-4o-mini", json!([{"role": "user", "content": PROMPT}]))
}

fn openai_continuation(first: &str) -> Value {
    openai_request(
        "gpt-4o-mini",
        json!([
            {"role": "user", "content": PROMPT},
            {"role": "assistant", "content": first},
            {"role": "user", "content": CONTINUE_PROMPT}
        ]),
    )
}

#[tokio::test]
async fn test_openai_truncated_then_continued() {
    let mut fixture = MockServerFixture::new().await;
    let primary = fixture
        .mock_exchange(
            OPENAI_PATH,
            openai_primary(),
            200,
            &openai_response(" Dear Sir,\nI am writing ", "length"),
            1,
        )
        .await;
    // The assistant turn carries the trimmed first pass.
    let continuation = fixture
        .mock_exchange(
            OPENAI_PATH,
            openai_continuation("Dear Sir,\nI am writing"),
            200,
            &openai_response("  to request the report.  ", "stop"),
            1,
        )
        .await;

    let out = fixture
        .formalizer()
        .formalize(&config("openai", "k", "gpt-4o-mini"), PROMPT)
        .await
        .unwrap();

    assert_eq!(out.text, "Dear Sir,\nI am writing\nto request the report.");
    assert_eq!(out.completion, Completion::Continued);
    primary.assert_async().await;
    continuation.assert_async().await;
}

#[tokio::test]
async fn test_gemini_truncated_then_continued() {
    let mut fixture = MockServerFixture::new().await;
    let primary = fixture
        .mock_exchange(
            GEMINI_PATH,
            gemini_request(json!([{"role": "user", "parts": [{"text": PROMPT}]}])),
            200,
            &gemini_response("Gentile Dottore,", "MAX_TOKENS"),
            1,
        )
        .await;
    let continuation = fixture
        .mock_exchange(
            GEMINI_PATH,
            gemini_request(json!([
                {"role": "user", "parts": [{"text": PROMPT}]},
                {"role": "model", "parts": [{"text": "Gentile Dottore,"}]},
                {"role": "user", "parts": [{"text": CONTINUE_PROMPT}]}
            ])),
            200,
            &gemini_response("le scrivo in merito alla fattura.", "STOP"),
            1,
        )
        .await;

    let out = fixture
        .formalizer()
        .formalize(&config("gemini", "gk", "gemini-1.5-flash"), PROMPT)
        .await
        .unwrap();

    assert_eq!(out.text, "Gentile Dottore,\nle scrivo in merito alla fattura.");
    assert_eq!(out.completion, Completion::Continued);
    primary.assert_async().await;
    continuation.assert_async().await;
}

#[tokio::test]
async fn test_anthropic_truncated_then_continued() {
    let mut fixture = MockServerFixture::new().await;
    let model = "claude-3-5-sonnet-latest";
    let primary = fixture
        .mock_exchange(
            ANTHROPIC_PATH,
            anthropic_request(model, json!([{"role": "user", "content": PROMPT}])),
            200,
            &anthropic_response("Dear Team,", "max_tokens"),
            1,
        )
        .await;
    let continuation = fixture
        .mock_exchange(
            ANTHROPIC_PATH,
            anthropic_request(
                model,
                json!([
                    {"role": "user", "content": PROMPT},
                    {"role": "assistant", "content": "Dear Team,"},
                    {"role": "user", "content": CONTINUE_PROMPT}
                ]),
            ),
            200,
            &anthropic_response("Kind regards.", "end_turn"),
            1,
        )
        .await;

    let out = fixture
        .formalizer()
        .formalize(&config("anthropic", "ak", model), PROMPT)
        .await
        .unwrap();

    assert_eq!(out.text, "Dear Team,\nKind regards.");
    primary.assert_async().await;
    continuation.assert_async().await;
}

#[tokio::test]
async fn test_continuation_http_error_keeps_first_pass() {
    let mut fixture = MockServerFixture::new().await;
    let cfg = fixture.compat_config("k", "gpt-4o-mini");
    let primary = fixture
        .mock_exchange(
            COMPAT_PATH,
            openai_primary(),
            200,
            &openai_response("Dear Sir,", "length"),
            1,
        )
        .await;
    let continuation = fixture
        .mock_exchange(
            COMPAT_PATH,
            openai_continuation("Dear Sir,"),
            500,
            r#"{"error":{"message":"upstream exploded"}}"#,
            1,
        )
        .await;

    let out = fixture.formalizer().formalize(&cfg, PROMPT).await.unwrap();

    assert_eq!(out.text, "Dear Sir,");
    assert_eq!(out.completion, Completion::ContinuationFailed);
    primary.assert_async().await;
    continuation.assert_async().await;
}

#[tokio::test]
async fn test_continuation_malformed_body_keeps_first_pass() {
    let mut fixture = MockServerFixture::new().await;
    let primary = fixture
        .mock_exchange(
            OPENAI_PATH,
            openai_primary(),
            200,
            &openai_response("Dear Sir,", "length"),
            1,
        )
        .await;
    let continuation = fixture
        .mock_exchange(
            OPENAI_PATH,
            openai_continuation("Dear Sir,"),
            200,
            "<html>gateway</html>",
            1,
        )
        .await;

    let out = fixture
        .formalizer()
        .formalize(&config("openai", "k", "gpt-4o-mini"), PROMPT)
        .await
        .unwrap();

    assert_eq!(out.text, "Dear Sir,");
    assert_eq!(out.completion, Completion::ContinuationFailed);
    primary.assert_async().await;
    continuation.assert_async().await;
}

#[tokio::test]
async fn test_truncated_continuation_is_not_continued_again() {
    let mut fixture = MockServerFixture::new().await;
    let primary = fixture
        .mock_exchange(
            OPENAI_PATH,
            openai_primary(),
            200,
            &openai_response("part one", "length"),
            1,
        )
        .await;
    let continuation = fixture
        .mock_exchange(
            OPENAI_PATH,
            openai_continuation("part one"),
            200,
            &openai_response("part two", "length"),
            1,
        )
        .await;

    let out = fixture
        .formalizer()
        .formalize(&config("openai", "k", "gpt-4o-mini"), PROMPT)
        .await
        .unwrap();

    assert_eq!(out.text, "part one\npart two");
    assert_eq!(out.completion, Completion::Continued);
    primary.assert_async().await;
    continuation.assert_async().await;
}

async fn formalize_against(replies: Vec<Reply>) -> (slangshield::Formalized, usize) {
    let (base, calls) = scripted_server(replies).await;
    let cfg = Settings::new("openai_compat", "k", "gpt-4o-mini")
        .with_base_url(base)
        .validate()
        .unwrap();
    let formalizer = Formalizer::builder()
        .timeout(Duration::from_millis(400))
        .build()
        .unwrap();

    let out = formalizer.formalize(&cfg, PROMPT).await.unwrap();
    (out, calls.load(Ordering::SeqCst))
}

#[tokio::test]
async fn test_continuation_timeout_keeps_first_pass() {
    let (out, calls) = formalize_against(vec![
        Reply::Json(openai_response("Dear Sir,", "length")),
        Reply::Hang,
    ])
    .await;

    assert_eq!(out.text, "Dear Sir,");
    assert_eq!(out.completion, Completion::ContinuationFailed);
    assert_eq!(calls, 2);
}

#[tokio::test]
async fn test_continuation_connection_drop_keeps_first_pass() {
    let (out, calls) = formalize_against(vec![
        Reply::Json(openai_response("Dear Sir,", "length")),
        Reply::Hangup,
    ])
    .await;

    assert_eq!(out.text, "Dear Sir,");
    assert_eq!(out.completion, Completion::ContinuationFailed);
    assert_eq!(calls, 2);
}
