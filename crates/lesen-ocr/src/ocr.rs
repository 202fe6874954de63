use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use image::{ImageFormat, RgbaImage};
use lesen_types::OcrStage;

use crate::model::ModelLocator;
use crate::progress::ProgressReporter;

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine failed: {0}")]
    Engine(String),

    #[error("Failed to fetch language model: {0}")]
    ModelFetch(String),

    #[error("OCR I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode OCR input: {0}")]
    Encode(#[from] image::ImageError),
}

/// Text recognition backend
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize the image at `image_path`
    ///
    /// `model_dir` overrides the engine's own model location. Implementations
    /// report `recognizing` progress and return an empty string when no
    /// glyphs were found.
    async fn recognize(
        &self,
        image_path: &Path,
        language: &str,
        model_dir: Option<&Path>,
        progress: &mut ProgressReporter,
    ) -> Result<String, OcrError>;
}

/// Cropped image in, recognized text out
pub struct OcrPipeline {
    engine: Arc<dyn OcrEngine>,
    models: ModelLocator,
}

impl OcrPipeline {
    pub fn new(engine: Arc<dyn OcrEngine>, models: ModelLocator) -> Self {
        Self { engine, models }
    }

    pub async fn recognize(
        &self,
        image: &RgbaImage,
        progress: &mut ProgressReporter,
    ) -> Result<String, OcrError> {
        progress.report(OcrStage::Initializing, 0.0).await;

        // Removed when `input` drops, on every return path below
        let input = write_input(image)?;
        tracing::debug!(
            "OCR input {}x{} at {}",
            image.width(),
            image.height(),
            input.display()
        );
        progress.report(OcrStage::Initializing, 1.0).await;

        let source = self.models.resolve(progress).await?;

        let text = self
            .engine
            .recognize(&input, self.models.language(), source.tessdata_dir(), progress)
            .await?;

        progress.finish().await;
        tracing::debug!("OCR produced {} chars", text.chars().count());
        Ok(text)
    }
}

fn write_input(image: &RgbaImage) -> Result<tempfile::TempPath, OcrError> {
    let mut file = tempfile::Builder::new()
        .prefix("ocr-image-")
        .suffix(".png")
        .tempfile()?;

    {
        let mut writer = BufWriter::new(file.as_file_mut());
        image.write_to(&mut writer, ImageFormat::Png)?;
        writer.flush()?;
    }

    Ok(file.into_temp_path())
}
