use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use self::capture::CaptureConfig;
use self::hotkey::HotkeyConfig;
use self::ocr::OcrConfig;
use self::translator::TranslatorConfig;
use self::ui::UiConfig;

pub mod capture;
pub mod hotkey;
pub mod ocr;
pub mod translator;
pub mod ui;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub hotkey: HotkeyConfig,
    pub ocr: OcrConfig,
    pub translator: TranslatorConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Load a JSON profile; missing fields fall back to defaults, env still wins
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::info!("Loading config from {}", path.display());

        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Some(delay) = env::var("LESEN_SETTLE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.capture.settle_delay_ms = delay;
        }

        if let Ok(combination) = env::var("LESEN_HOTKEY") {
            self.hotkey.combination = combination;
        }

        if let Ok(path) = env::var("LESEN_TESSERACT") {
            self.ocr.tesseract_path = PathBuf::from(path);
        }

        if let Ok(dir) = env::var("LESEN_MODEL_DIR") {
            self.ocr.model_dir = PathBuf::from(dir);
        }

        if let Ok(url) = env::var("LESEN_TRANSLATE_URL") {
            self.translator.endpoint = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.capture.settle_delay_ms, 300);
        assert_eq!(config.ocr.language, "deu");
        assert_eq!(config.translator.language_pair(), "de|en");
        assert_eq!(config.hotkey.combination, "CmdOrCtrl+Shift+T");
    }

    #[test]
    fn test_partial_profile_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "capture": {{ "settle_delay_ms": 500 }}, "ocr": {{ "fetch_models": false }} }}"#)
            .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.capture.settle_delay_ms, 500);
        assert!(!config.ocr.fetch_models);
        assert_eq!(config.ocr.language, "deu");
        assert_eq!(config.translator.user_agent, "Mozilla/5.0");
    }

    #[test]
    fn test_invalid_profile_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_missing_profile_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
