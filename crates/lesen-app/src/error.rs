use lesen_ocr::{CaptureError, OcrError};
use lesen_translator::TranslateError;
use lesen_types::PipelineStage;

/// Every way a run can stop short of a translation
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Screen capture failed: {0}")]
    CaptureUnavailable(String),

    /// User pressed Escape or dragged a region that was too small
    #[error("Selection cancelled")]
    SelectionCancelled,

    #[error("Text recognition failed: {0}")]
    OcrFailure(String),

    #[error("{0}")]
    TranslationRateLimited(String),

    #[error("{0}")]
    TranslationTooLong(String),

    #[error("{0}")]
    TranslationUnavailable(String),

    #[error("{0}")]
    TranslationNetworkError(String),
}

impl PipelineError {
    /// Stage tag reported to the UI
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::CaptureUnavailable(_) | PipelineError::SelectionCancelled => {
                PipelineStage::Capture
            }
            PipelineError::OcrFailure(_) => PipelineStage::Ocr,
            PipelineError::TranslationRateLimited(_)
            | PipelineError::TranslationTooLong(_)
            | PipelineError::TranslationUnavailable(_)
            | PipelineError::TranslationNetworkError(_) => PipelineStage::Translation,
        }
    }
}

impl From<CaptureError> for PipelineError {
    fn from(e: CaptureError) -> Self {
        PipelineError::CaptureUnavailable(e.to_string())
    }
}

impl From<OcrError> for PipelineError {
    fn from(e: OcrError) -> Self {
        PipelineError::OcrFailure(e.to_string())
    }
}

impl From<TranslateError> for PipelineError {
    fn from(e: TranslateError) -> Self {
        let message = e.to_string();
        match e {
            TranslateError::RateLimited(_) => PipelineError::TranslationRateLimited(message),
            TranslateError::TooLong => PipelineError::TranslationTooLong(message),
            TranslateError::Unavailable(_) => PipelineError::TranslationUnavailable(message),
            TranslateError::Network(_) => PipelineError::TranslationNetworkError(message),
        }
    }
}
