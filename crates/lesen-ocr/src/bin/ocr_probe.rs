//! Capture the primary screen and run it through the OCR pipeline:
//! cargo run -p lesen-ocr --bin ocr_probe [config.json]

use std::sync::Arc;

use anyhow::{Context, Result};
use lesen_config::Config;
use lesen_ocr::{
    ModelLocator, OcrPipeline, ProgressReporter, ScreenCapture, TesseractEngine, XcapCapture,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path).with_context(|| format!("loading {path}"))?,
        None => Config::new(),
    };

    let capture = XcapCapture;
    let display = capture.display_info()?;
    let (width_logical, height_logical, scale_factor) = (
        display.width_logical,
        display.height_logical,
        display.scale_factor,
    );
    tracing::info!(
        "Primary display {}x{} @ {}x",
        width_logical,
        height_logical,
        scale_factor
    );

    let start = std::time::Instant::now();
    let captured = tokio::task::spawn_blocking(move || capture.capture(&display)).await??;
    tracing::info!(
        "Captured {:?} in {:?} -> {}",
        captured.pixel_size(),
        start.elapsed(),
        captured.path().display()
    );

    let size = captured.pixel_size();
    let full = captured.crop(&lesen_types::SourceRegion {
        x: 0,
        y: 0,
        width: size.width,
        height: size.height,
    });
    captured.discard()?;

    let pipeline = OcrPipeline::new(
        Arc::new(TesseractEngine::new(config.ocr.tesseract_path.clone())),
        ModelLocator::from_config(&config.ocr),
    );

    let (tx, rx) = kanal::unbounded_async::<lesen_types::OcrProgress>();
    let printer = tokio::spawn(async move {
        while let Ok(update) = rx.recv().await {
            tracing::info!("{:>16} {:>5.1}%", update.stage.label(), update.fraction * 100.0);
        }
    });

    let start = std::time::Instant::now();
    let mut reporter = ProgressReporter::new(tx);
    let result = pipeline.recognize(&full, &mut reporter).await;
    drop(reporter);
    printer.await?;

    let text = result?;
    tracing::info!("OCR took {:?}, {} chars", start.elapsed(), text.chars().count());
    for line in text.lines().filter(|l| !l.trim().is_empty()).take(10) {
        tracing::info!("> {}", line);
    }

    Ok(())
}
