use std::io::{BufWriter, Write};
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use lesen_types::{DisplayInfo, PixelSize, SourceRegion};
use tempfile::TempPath;
use xcap::Monitor;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("No capturable screen source: {0}")]
    Unavailable(String),

    #[error("Failed to store screenshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode screenshot: {0}")]
    Encode(#[from] image::ImageError),
}

/// Still-image source for the primary display
///
/// Both calls block; run them off the async executor.
pub trait ScreenCapture: Send + Sync {
    fn display_info(&self) -> Result<DisplayInfo, CaptureError>;

    /// Capture at exactly `display.physical_size()` pixels
    fn capture(&self, display: &DisplayInfo) -> Result<CapturedImage, CaptureError>;
}

/// A screenshot owned by one pipeline run
///
/// The PNG copy on disk is what the overlay loads. It is deleted when the
/// value is dropped, whichever way the run ends.
pub struct CapturedImage {
    image: RgbaImage,
    path: TempPath,
}

impl CapturedImage {
    pub fn persist(image: RgbaImage) -> Result<Self, CaptureError> {
        let mut file = tempfile::Builder::new()
            .prefix("screenshot-")
            .suffix(".png")
            .tempfile()?;

        {
            let mut writer = BufWriter::new(file.as_file_mut());
            image.write_to(&mut writer, ImageFormat::Png)?;
            writer.flush()?;
        }

        Ok(Self {
            image,
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pixel_size(&self) -> PixelSize {
        PixelSize {
            width: self.image.width(),
            height: self.image.height(),
        }
    }

    pub fn crop(&self, region: &SourceRegion) -> RgbaImage {
        imageops::crop_imm(&self.image, region.x, region.y, region.width, region.height).to_image()
    }

    /// Delete the temp file now, reporting failures instead of ignoring them
    pub fn discard(self) -> std::io::Result<()> {
        self.path.close()
    }
}

impl std::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedImage")
            .field("path", &self.path())
            .field("size", &self.pixel_size())
            .finish()
    }
}

/// Primary monitor capture through `xcap`
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapCapture;

impl XcapCapture {
    fn primary_monitor() -> Result<Monitor, CaptureError> {
        let mut monitors = Monitor::all().map_err(|e| CaptureError::Unavailable(e.to_string()))?;
        if monitors.is_empty() {
            return Err(CaptureError::Unavailable("No monitor found".to_string()));
        }

        let index = monitors.iter().position(|m| m.is_primary()).unwrap_or(0);
        Ok(monitors.swap_remove(index))
    }
}

impl ScreenCapture for XcapCapture {
    fn display_info(&self) -> Result<DisplayInfo, CaptureError> {
        let monitor = Self::primary_monitor()?;
        let scale_factor = match monitor.scale_factor() as f64 {
            s if s > 0.0 => s,
            _ => 1.0,
        };

        Ok(DisplayInfo {
            width_logical: monitor.width(),
            height_logical: monitor.height(),
            scale_factor,
        })
    }

    fn capture(&self, display: &DisplayInfo) -> Result<CapturedImage, CaptureError> {
        let monitor = Self::primary_monitor()?;
        let shot = monitor
            .capture_image()
            .map_err(|e| CaptureError::Unavailable(format!("Failed to capture screen: {e}")))?;

        let (width, height) = (shot.width(), shot.height());
        let image = RgbaImage::from_raw(width, height, shot.into_raw())
            .ok_or_else(|| CaptureError::Unavailable("Capture returned a truncated frame".to_string()))?;

        let target = display.physical_size();
        let image = if (width, height) == (target.width, target.height) {
            image
        } else {
            tracing::debug!(
                "Resampling capture {}x{} to {}x{}",
                width,
                height,
                target.width,
                target.height
            );
            imageops::resize(&image, target.width, target.height, FilterType::Triangle)
        };

        CapturedImage::persist(image)
    }
}
