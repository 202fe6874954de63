use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Events flowing into the backend (hotkey listener and UI → app)
#[derive(Debug, Clone)]
pub enum AppEvent {
    HotkeyPressed,
    RegionConfirmed {
        selection: SelectionRegion,
        overlay_size: OverlaySize,
    },
    SelectionCancelled,
    Shutdown,
}

/// Events flowing from the backend to the UI thread
#[derive(Debug, Clone)]
pub enum UiEvent {
    BackendReady,
    ScreenshotReady {
        image_path: PathBuf,
        display: DisplayInfo,
    },
    FocusOverlay,
    CloseOverlay,
    MinimizeMain,
    RestoreMain,
    RunStarted,
    OcrProgress(OcrProgress),
    TranslationStarted,
    RunCancelled,
    Outcome(RunOutcome),
}

/// Primary display geometry as reported at capture time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayInfo {
    pub width_logical: u32,
    pub height_logical: u32,
    pub scale_factor: f64,
}

impl DisplayInfo {
    /// Pixel size a capture of this display must have
    pub fn physical_size(&self) -> PixelSize {
        PixelSize {
            width: (self.width_logical as f64 * self.scale_factor).round() as u32,
            height: (self.height_logical as f64 * self.scale_factor).round() as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

/// Size of the overlay canvas in its own (logical) units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlaySize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayPoint {
    pub x: f64,
    pub y: f64,
}

impl OverlayPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A dragged rectangle in overlay coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRegion {
    /// Normalize a drag from `anchor` to `current`, whichever direction it went
    pub fn from_drag(anchor: OverlayPoint, current: OverlayPoint) -> Self {
        Self {
            x: anchor.x.min(current.x),
            y: anchor.y.min(current.y),
            width: (current.x - anchor.x).abs(),
            height: (current.y - anchor.y).abs(),
        }
    }
}

/// A rectangle in captured-image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OcrStage {
    Initializing,
    LoadingLanguage,
    Recognizing,
    Done,
}

impl OcrStage {
    pub fn label(&self) -> &'static str {
        match self {
            OcrStage::Initializing => "Initializing",
            OcrStage::LoadingLanguage => "Loading language",
            OcrStage::Recognizing => "Recognizing text",
            OcrStage::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OcrProgress {
    pub stage: OcrStage,
    pub fraction: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translated_text: String,
    pub was_truncated: bool,
}

/// Stage tag attached to reported errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Capture,
    Ocr,
    Translation,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Capture => "capture",
            PipelineStage::Ocr => "ocr",
            PipelineStage::Translation => "translation",
        };
        f.write_str(name)
    }
}

/// Terminal result of one run, as delivered to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum RunOutcome {
    #[serde(rename_all = "camelCase")]
    Ok {
        text: String,
        translated_text: String,
        was_truncated: bool,
    },
    NoText,
    Error {
        stage: PipelineStage,
        message: String,
    },
}
