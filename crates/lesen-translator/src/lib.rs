mod mymemory;
mod quota;

#[cfg(test)]
mod tests;

pub use lesen_types::TranslationResult;
pub use mymemory::{MAX_QUERY_CHARS, MyMemoryTranslator, prepare_query};
pub use quota::{ResetEstimate, quota_message};

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text with the provider's fixed language pair
    ///
    /// One attempt per call; callers decide whether to try again.
    async fn translate(&self, text: &str) -> Result<TranslationResult, TranslateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub language_pair: String,
    pub max_query_chars: usize,
}

/// User-facing translation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    /// HTTP 429/403 or an exhausted daily quota
    #[error("{0}")]
    RateLimited(String),

    #[error("The selected text is too long. Please select a shorter text area.")]
    TooLong,

    #[error("{0}")]
    Unavailable(String),

    /// The request never got a response
    #[error("Cannot connect to translation service. Please check your internet connection. ({0})")]
    Network(String),
}
