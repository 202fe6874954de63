use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use serde_json::{Value, json};

use crate::{MAX_QUERY_CHARS, MyMemoryTranslator, TranslateError, Translator};

#[derive(Debug, Clone)]
struct SeenRequest {
    query: HashMap<String, String>,
    user_agent: Option<String>,
}

/// Serves one canned answer and records every request
async fn provider(status: StatusCode, body: Value) -> (String, Arc<Mutex<Vec<SeenRequest>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();

    let app = Router::new().route(
        "/get",
        get(
            move |Query(query): Query<HashMap<String, String>>, headers: HeaderMap| {
                let recorder = recorder.clone();
                let body = body.clone();
                async move {
                    recorder.lock().unwrap().push(SeenRequest {
                        query,
                        user_agent: headers
                            .get("user-agent")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                    });
                    (status, Json(body))
                }
            },
        ),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/get"), seen)
}

fn translated(text: &str) -> Value {
    json!({
        "responseData": { "translatedText": text, "match": 1 },
        "responseStatus": 200
    })
}

fn translator(endpoint: String) -> MyMemoryTranslator {
    MyMemoryTranslator::new(endpoint, "de|en", "Mozilla/5.0")
}

#[tokio::test]
async fn test_translates_with_language_pair_and_user_agent() {
    let (endpoint, seen) = provider(StatusCode::OK, translated("Hello world")).await;

    let result = translator(endpoint).translate("  Hallo Welt  ").await.unwrap();
    assert_eq!(result.translated_text, "Hello world");
    assert!(!result.was_truncated);

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].query.get("q").map(String::as_str), Some("Hallo Welt"));
    assert_eq!(seen[0].query.get("langpair").map(String::as_str), Some("de|en"));
    assert_eq!(seen[0].user_agent.as_deref(), Some("Mozilla/5.0"));
}

#[tokio::test]
async fn test_long_text_is_clipped_before_sending() {
    let (endpoint, seen) = provider(StatusCode::OK, translated("Something")).await;
    let text = "x".repeat(600);

    let result = translator(endpoint).translate(&text).await.unwrap();
    assert!(result.was_truncated);

    let sent = seen.lock().unwrap()[0].query["q"].clone();
    assert!(sent.chars().count() <= MAX_QUERY_CHARS);
    assert_eq!(sent.chars().count(), MAX_QUERY_CHARS);
}

#[tokio::test]
async fn test_http_429_and_403_are_rate_limits() {
    for status in [StatusCode::TOO_MANY_REQUESTS, StatusCode::FORBIDDEN] {
        let (endpoint, _) = provider(status, json!({})).await;
        let err = translator(endpoint).translate("Hallo").await.unwrap_err();
        assert!(matches!(err, TranslateError::RateLimited(_)), "{status}: {err:?}");
    }
}

#[tokio::test]
async fn test_other_status_is_unavailable() {
    let (endpoint, _) = provider(StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;
    let err = translator(endpoint).translate("Hallo").await.unwrap_err();
    assert!(matches!(err, TranslateError::Unavailable(_)), "{err:?}");
}

#[tokio::test]
async fn test_quota_marker_reports_reset_time() {
    let (endpoint, _) = provider(
        StatusCode::OK,
        translated(
            "MYMEMORY WARNING: YOU USED ALL AVAILABLE FREE TRANSLATIONS FOR TODAY. \
             NEXT AVAILABLE IN  2 HOURS 15 MINUTES 12 SECONDS",
        ),
    )
    .await;

    match translator(endpoint).translate("Hallo").await.unwrap_err() {
        TranslateError::RateLimited(message) => {
            assert!(message.contains("2 hours"), "{message}");
            assert!(message.contains("15 minutes"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_quota_marker_singular_minute() {
    let (endpoint, _) = provider(
        StatusCode::OK,
        translated("YOU USED ALL AVAILABLE FREE TRANSLATIONS FOR TODAY. NEXT AVAILABLE IN 0 HOURS 1 MINUTE"),
    )
    .await;

    match translator(endpoint).translate("Hallo").await.unwrap_err() {
        TranslateError::RateLimited(message) => {
            assert!(message.contains("1 minute"), "{message}");
            assert!(!message.contains("minutes"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_length_marker_is_too_long() {
    let (endpoint, _) = provider(
        StatusCode::OK,
        translated("QUERY LENGTH LIMIT EXCEEDED. MAX ALLOWED QUERY : 500 CHARS"),
    )
    .await;

    let err = translator(endpoint).translate("Hallo").await.unwrap_err();
    assert_eq!(err, TranslateError::TooLong);
}

#[tokio::test]
async fn test_missing_translation_is_unavailable() {
    let (endpoint, _) = provider(StatusCode::OK, json!({ "responseStatus": 200 })).await;

    match translator(endpoint).translate("Hallo").await.unwrap_err() {
        TranslateError::Unavailable(message) => assert!(message.contains("Unable to translate")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = translator(format!("http://{addr}/get"))
        .translate("Hallo")
        .await
        .unwrap_err();
    assert!(matches!(err, TranslateError::Network(_)), "{err:?}");
    assert!(err.to_string().starts_with("Cannot connect to translation service"));
}

#[test]
fn test_metadata_reports_pair_and_limit() {
    let meta = translator("http://localhost/get".to_string()).metadata();
    assert_eq!(meta.name, "mymemory");
    assert_eq!(meta.language_pair, "de|en");
    assert_eq!(meta.max_query_chars, MAX_QUERY_CHARS);
}
