mod capture;
mod hotkey;
mod model;
mod ocr;
mod progress;
mod tesseract;

pub use capture::{CaptureError, CapturedImage, ScreenCapture, XcapCapture};
pub use hotkey::{HotkeyListener, HotkeyManager};
pub use model::{ModelLocator, ModelSource};
pub use ocr::{OcrEngine, OcrError, OcrPipeline};
pub use progress::ProgressReporter;
pub use tesseract::TesseractEngine;
