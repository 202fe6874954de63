//! In-process stand-ins for the screen, OCR engine, translator and windows

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use kanal::{AsyncReceiver, AsyncSender};
use lesen_core::host::{HostWindow, OverlayHost};
use lesen_ocr::{
    CaptureError, CapturedImage, ModelLocator, OcrEngine, OcrError, OcrPipeline,
    ProgressReporter, ScreenCapture,
};
use lesen_translator::{ProviderMetadata, TranslateError, TranslationResult, Translator};
use lesen_types::{DisplayInfo, OcrStage, UiEvent};
use tokio::sync::Notify;

use crate::pipeline::Pipeline;


pub struct FakeCapture {
    display: DisplayInfo,
    fail: bool,
    pub written: Mutex<Vec<PathBuf>>,
}

impl FakeCapture {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Arc<Self> {
        Arc::new(Self {
            display: DisplayInfo {
                width_logical: width,
                height_logical: height,
                scale_factor,
            },
            fail: false,
            written: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            display: DisplayInfo {
                width_logical: 100,
                height_logical: 100,
                scale_factor: 1.0,
            },
            fail: true,
            written: Mutex::new(Vec::new()),
        })
    }

    pub fn last_path(&self) -> PathBuf {
        self.written.lock().unwrap().last().cloned().unwrap()
    }
}

impl ScreenCapture for FakeCapture {
    fn display_info(&self) -> Result<DisplayInfo, CaptureError> {
        Ok(self.display)
    }

    fn capture(&self, display: &DisplayInfo) -> Result<CapturedImage, CaptureError> {
        if self.fail {
            return Err(CaptureError::Unavailable("No monitor found".to_string()));
        }
        let size = display.physical_size();
        let captured =
            CapturedImage::persist(RgbaImage::from_pixel(size.width, size.height, Rgba([255; 4])))?;
        self.written
            .lock()
            .unwrap()
            .push(captured.path().to_path_buf());
        Ok(captured)
    }
}

/// Returns canned text and records the input file it was given
pub struct FakeEngine {
    result: Result<String, String>,
    pub inputs: Mutex<Vec<(PathBuf, (u32, u32))>>,
}

impl FakeEngine {
    pub fn returning(result: Result<&str, &str>) -> Arc<Self> {
        Arc::new(Self {
            result: result.map(str::to_string).map_err(str::to_string),
            inputs: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.inputs.lock().unwrap().len()
    }
}

#[async_trait]
impl OcrEngine for FakeEngine {
    async fn recognize(
        &self,
        image_path: &Path,
        _language: &str,
        _model_dir: Option<&Path>,
        progress: &mut ProgressReporter,
    ) -> Result<String, OcrError> {
        let dimensions = image::image_dimensions(image_path).unwrap();
        self.inputs
            .lock()
            .unwrap()
            .push((image_path.to_path_buf(), dimensions));
        progress.report(OcrStage::Recognizing, 0.5).await;
        self.result.clone().map_err(OcrError::Engine)
    }
}

pub struct FakeTranslator {
    result: Result<TranslationResult, TranslateError>,
    pub seen: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl FakeTranslator {
    pub fn returning(result: Result<&str, TranslateError>) -> Arc<Self> {
        Arc::new(Self {
            result: result.map(|text| TranslationResult {
                translated_text: text.to_string(),
                was_truncated: false,
            }),
            seen: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    /// Holds every call until `gate` is notified
    pub fn gated(text: &str, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(TranslationResult {
                translated_text: text.to_string(),
                was_truncated: false,
            }),
            seen: Mutex::new(Vec::new()),
            gate: Some(gate),
        })
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str) -> Result<TranslationResult, TranslateError> {
        self.seen.lock().unwrap().push(text.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.result.clone()
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "fake".to_string(),
            language_pair: "de|en".to_string(),
            max_query_chars: 500,
        }
    }
}

#[derive(Default)]
pub struct FakeWindows {
    pub minimized: AtomicUsize,
    pub restored: AtomicUsize,
    pub opened: AtomicUsize,
    pub focused: AtomicUsize,
    pub closed: AtomicUsize,
    pub fail_minimize: AtomicBool,
    pub fail_open: AtomicBool,
}

impl FakeWindows {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostWindow for FakeWindows {
    async fn minimize(&self) -> anyhow::Result<()> {
        if self.fail_minimize.load(Ordering::SeqCst) {
            anyhow::bail!("window manager refused");
        }
        self.minimized.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn restore_and_focus(&self) -> anyhow::Result<()> {
        self.restored.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_alive(&self) -> bool {
        true
    }
}

#[async_trait]
impl OverlayHost for FakeWindows {
    async fn open(&self, image_path: &Path, _display: DisplayInfo) -> anyhow::Result<()> {
        assert!(image_path.exists(), "overlay opened before the screenshot was written");
        if self.fail_open.load(Ordering::SeqCst) {
            anyhow::bail!("no surface");
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn focus(&self) -> anyhow::Result<()> {
        self.focused.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> anyhow::Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct Harness {
    pub pipeline: Arc<Pipeline>,
    pub capture: Arc<FakeCapture>,
    pub engine: Arc<FakeEngine>,
    pub translator: Arc<FakeTranslator>,
    pub windows: Arc<FakeWindows>,
    pub ui_rx: AsyncReceiver<UiEvent>,
    _models: tempfile::TempDir,
}

impl Harness {
    pub fn new(
        capture: Arc<FakeCapture>,
        engine: Arc<FakeEngine>,
        translator: Arc<FakeTranslator>,
    ) -> Self {
        let (ui_tx, ui_rx) = kanal::unbounded_async();
        Self::with_ui(capture, engine, translator, ui_tx, ui_rx)
    }

    pub fn with_ui(
        capture: Arc<FakeCapture>,
        engine: Arc<FakeEngine>,
        translator: Arc<FakeTranslator>,
        ui_tx: AsyncSender<UiEvent>,
        ui_rx: AsyncReceiver<UiEvent>,
    ) -> Self {
        let models = tempfile::tempdir().unwrap();
        let windows = Arc::new(FakeWindows::default());
        let ocr = OcrPipeline::new(engine.clone(), ModelLocator::new("deu", models.path()));
        let pipeline = Pipeline::new(
            capture.clone(),
            ocr,
            translator.clone(),
            windows.clone(),
            windows.clone(),
            ui_tx,
        )
        .with_settle_delay(Duration::ZERO);

        Self {
            pipeline: Arc::new(pipeline),
            capture,
            engine,
            translator,
            windows,
            ui_rx,
            _models: models,
        }
    }

    /// Everything sent to the UI so far
    pub fn ui_events(&self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.ui_rx.try_recv() {
            events.push(event);
        }
        events
    }
}
