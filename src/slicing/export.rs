use std::io::Cursor;

use futures::future::try_join_all;
use image::{DynamicImage, ImageFormat, RgbaImage};
use log::{error, info};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::archive::{ArchiveBuilder, Download};
use super::regions::{compute_regions, default_min_size, SliceRegion};
use crate::error::ExportError;
use crate::geometry::{ImageDimensions, SliceLines};
use crate::source::SourceImage;

/// Encoding used for every slice of one export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliceFormat {
    Png,
    #[default]
    Jpeg,
}

impl SliceFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SliceFormat::Png => "png",
            SliceFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            SliceFormat::Png => "image/png",
            SliceFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            SliceFormat::Png => ImageFormat::Png,
            SliceFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Outcome of the most recent export, for display and retry
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ExportStatus {
    #[default]
    Idle,
    InProgress,
    Finished { slices: usize },
    Failed(String),
}

impl ExportStatus {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

/// Canvas region to pixel rect `(x, y, width, height)` on a surface of `bounds`.
///
/// Edges are rounded independently so neighbouring regions share edges exactly.
pub fn pixel_rect(region: &SliceRegion, scale: (f32, f32), bounds: (u32, u32)) -> (u32, u32, u32, u32) {
    let to_px = |v: f32, s: f32, max: u32| ((v * s).round().max(0.0) as u32).min(max);
    let x0 = to_px(region.x, scale.0, bounds.0);
    let x1 = to_px(region.x + region.width, scale.0, bounds.0);
    let y0 = to_px(region.y, scale.1, bounds.1);
    let y1 = to_px(region.y + region.height, scale.1, bounds.1);
    (x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
}

/// Crop `region` out of `pixels` into its own buffer and encode it
pub fn encode_region(
    pixels: &RgbaImage,
    region: &SliceRegion,
    index: usize,
    scale: (f32, f32),
    format: SliceFormat,
) -> Result<Vec<u8>, ExportError> {
    let (x, y, width, height) = pixel_rect(region, scale, pixels.dimensions());
    if width == 0 || height == 0 {
        return Err(ExportError::SurfaceAcquisition {
            index,
            x,
            y,
            width,
            height,
        });
    }

    let slice = image::imageops::crop_imm(pixels, x, y, width, height).to_image();
    let image = match format {
        SliceFormat::Png => DynamicImage::ImageRgba8(slice),
        // JPEG has no alpha channel
        SliceFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(slice).to_rgb8()),
    };

    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, format.image_format())?;
    Ok(cursor.into_inner())
}

/// Marks the exporter busy for the lifetime of one export
struct InFlight<'a> {
    status: &'a Mutex<ExportStatus>,
    done: bool,
}

impl<'a> InFlight<'a> {
    fn acquire(status: &'a Mutex<ExportStatus>) -> Result<Self, ExportError> {
        let mut current = status.lock();
        if current.is_in_progress() {
            return Err(ExportError::ExportInProgress);
        }
        *current = ExportStatus::InProgress;
        Ok(Self { status, done: false })
    }

    fn finish(mut self, result: &Result<usize, ExportError>) {
        *self.status.lock() = match result {
            Ok(slices) => ExportStatus::Finished { slices: *slices },
            Err(err) => ExportStatus::Failed(err.to_string()),
        };
        self.done = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.done {
            *self.status.lock() = ExportStatus::Failed(ExportError::Aborted.to_string());
        }
    }
}

/// Crops, encodes and archives every slice, then hands the archive to `download`.
///
/// Either every slice makes it into the archive or nothing is delivered.
/// Only one export runs at a time; a second call while one is running fails
/// with `ExportError::ExportInProgress`.
pub struct SliceExporter<A, D> {
    archive: A,
    download: D,
    status: Mutex<ExportStatus>,
}

impl<A: ArchiveBuilder, D: Download> SliceExporter<A, D> {
    pub fn new(archive: A, download: D) -> Self {
        Self {
            archive,
            download,
            status: Mutex::new(ExportStatus::Idle),
        }
    }

    pub fn status(&self) -> ExportStatus {
        self.status.lock().clone()
    }

    pub fn archive(&self) -> &A {
        &self.archive
    }

    pub fn download(&self) -> &D {
        &self.download
    }

    /// Export the slices of `lines`. Returns the number of slices written.
    pub async fn export(
        &self,
        source: &SourceImage,
        lines: &SliceLines,
        dims: ImageDimensions,
        format: SliceFormat,
        archive_name: &str,
    ) -> Result<usize, ExportError> {
        let guard = InFlight::acquire(&self.status)?;
        let result = self.run(source, lines, dims, format, archive_name).await;
        if let Err(err) = &result {
            error!("Export of {} failed: {}", source.id(), err);
        }
        guard.finish(&result);
        result
    }

    async fn run(
        &self,
        source: &SourceImage,
        lines: &SliceLines,
        dims: ImageDimensions,
        format: SliceFormat,
        archive_name: &str,
    ) -> Result<usize, ExportError> {
        // Regions are fixed before any encoding starts.
        let regions = compute_regions(lines, dims, default_min_size(dims));
        let pixels = source.clean_pixels()?;
        let scale = if dims.width > 0.0 && dims.height > 0.0 {
            (
                pixels.width() as f32 / dims.width,
                pixels.height() as f32 / dims.height,
            )
        } else {
            (1.0, 1.0)
        };
        info!(
            "Exporting {} slices of {} as {}",
            regions.len(),
            source.id(),
            format.mime_type()
        );

        let pixels = &pixels;
        let encodes = regions.iter().enumerate().map(|(i, region)| async move {
            let index = i + 1;
            let bytes = encode_region(pixels, region, index, scale, format)?;
            Ok::<_, ExportError>((format!("{}.{}", index, format.extension()), bytes))
        });
        let entries = try_join_all(encodes).await?;

        let archive = self.archive.build(&entries)?;
        self.download.deliver(archive, archive_name)?;
        info!("Export finished: {} slices in {}", entries.len(), archive_name);
        Ok(entries.len())
    }
}
