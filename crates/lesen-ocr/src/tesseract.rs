use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lesen_types::OcrStage;
use tokio::process::Command;

use crate::ocr::{OcrEngine, OcrError};
use crate::progress::ProgressReporter;

/// Runs the `tesseract` command-line tool
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
}

impl TesseractEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(
        &self,
        image_path: &Path,
        language: &str,
        model_dir: Option<&Path>,
        progress: &mut ProgressReporter,
    ) -> Result<String, OcrError> {
        let mut command = Command::new(&self.binary);
        command
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .arg("--psm")
            .arg("3");
        if let Some(dir) = model_dir {
            command.arg("--tessdata-dir").arg(dir);
        }

        progress.report(OcrStage::Recognizing, 0.0).await;
        let output = command.output().await.map_err(|e| {
            OcrError::Engine(format!(
                "failed to run {} (is it installed?): {}",
                self.binary.display(),
                e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        progress.report(OcrStage::Recognizing, 1.0).await;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
