use async_trait::async_trait;
use lesen_config::translator::TranslatorConfig;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::quota::quota_message;
use crate::{ProviderMetadata, TranslateError, TranslationResult, Translator};

/// Longest query the provider accepts, in characters
pub const MAX_QUERY_CHARS: usize = 500;

const QUOTA_MARKERS: [&str; 2] = ["USED ALL AVAILABLE FREE TRANSLATIONS", "MYMEMORY WARNING"];
const LENGTH_MARKER: &str = "QUERY LENGTH LIMIT";

/// Trim and clip to [`MAX_QUERY_CHARS`]; the flag is set when clipping happened
pub fn prepare_query(text: &str) -> (String, bool) {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(MAX_QUERY_CHARS) {
        Some((cut, _)) => (trimmed[..cut].to_string(), true),
        None => (trimmed.to_string(), false),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: Option<ResponseData>,
    response_status: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: Option<String>,
}

/// MyMemory free translation API
///
/// Provider errors often arrive as HTTP 200 with the error text in place of
/// the translation, so the body is checked for known markers before use.
#[derive(Clone)]
pub struct MyMemoryTranslator {
    client: reqwest::Client,
    endpoint: String,
    language_pair: String,
    user_agent: String,
}

impl MyMemoryTranslator {
    pub fn new(
        endpoint: impl Into<String>,
        language_pair: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            language_pair: language_pair.into(),
            user_agent: user_agent.into(),
        }
    }

    pub fn from_config(config: &TranslatorConfig) -> Self {
        Self::new(
            config.endpoint.clone(),
            config.language_pair(),
            config.user_agent.clone(),
        )
    }
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    async fn translate(&self, text: &str) -> Result<TranslationResult, TranslateError> {
        let (query, was_truncated) = prepare_query(text);
        if was_truncated {
            tracing::info!(
                "Query clipped from {} to {} chars",
                text.trim().chars().count(),
                MAX_QUERY_CHARS
            );
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query.as_str()), ("langpair", self.language_pair.as_str())])
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Translation request failed: {}", e);
                TranslateError::Network(e.to_string())
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("Translation provider answered HTTP {}", status);
            return Err(classify_status(status.as_u16()));
        }

        let body: MyMemoryResponse = response.json().await.map_err(|e| {
            tracing::warn!("Unreadable translation response: {}", e);
            unable_to_translate()
        })?;

        let body_status = body.response_status.as_ref().and_then(status_code);
        let Some(translated) = body
            .response_data
            .and_then(|data| data.translated_text)
            .filter(|text| !text.is_empty())
        else {
            tracing::warn!("No translated text in response (status {:?})", body_status);
            return Err(match body_status {
                Some(code @ (429 | 403)) => classify_status(code as u16),
                _ => unable_to_translate(),
            });
        };

        classify_text(&translated)?;

        Ok(TranslationResult {
            translated_text: translated,
            was_truncated,
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "mymemory".to_string(),
            language_pair: self.language_pair.clone(),
            max_query_chars: MAX_QUERY_CHARS,
        }
    }
}

fn classify_status(status: u16) -> TranslateError {
    match status {
        429 | 403 => TranslateError::RateLimited(
            "The translation service rate limit was hit. Please try again later.".to_string(),
        ),
        other => {
            TranslateError::Unavailable(format!("Translation service unavailable (HTTP {other})."))
        }
    }
}

/// Error strings the provider returns in place of a translation
fn classify_text(translated: &str) -> Result<(), TranslateError> {
    if QUOTA_MARKERS.iter().any(|marker| translated.contains(marker)) {
        return Err(TranslateError::RateLimited(quota_message(translated)));
    }
    if translated.contains(LENGTH_MARKER) {
        return Err(TranslateError::TooLong);
    }
    Ok(())
}

fn unable_to_translate() -> TranslateError {
    TranslateError::Unavailable(
        "Unable to translate the selected text. Please try again.".to_string(),
    )
}

/// `responseStatus` is a number on success and sometimes a string on errors
fn status_code(value: &serde_json::Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}
