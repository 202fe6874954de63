use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_language() -> String {
    "deu".to_string()
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("tessdata")
}

fn default_tesseract_path() -> PathBuf {
    PathBuf::from("tesseract")
}

fn default_fetch_models() -> bool {
    true
}

fn default_model_url() -> String {
    "https://github.com/tesseract-ocr/tessdata_fast/raw/main".to_string()
}

fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("lesen-tessdata")
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract language code; the pipeline recognizes exactly this one
    #[serde(default = "default_language")]
    pub language: String,
    /// Directory checked on every run for a bundled `<language>.traineddata`
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: PathBuf,
    /// Download the model when no bundled copy exists
    #[serde(default = "default_fetch_models")]
    pub fetch_models: bool,
    /// Base URL the model file name is appended to
    #[serde(default = "default_model_url")]
    pub model_url: String,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            model_dir: default_model_dir(),
            tesseract_path: default_tesseract_path(),
            fetch_models: default_fetch_models(),
            model_url: default_model_url(),
            cache_dir: default_cache_dir(),
        }
    }
}
