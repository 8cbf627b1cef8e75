use std::fmt;
use std::sync::Arc;

use image::{ImageError, RgbaImage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::ImageDimensions;

/// Stable identifier for a source image, derived from its content.
///
/// Geometry is stored under this key, so reopening the same file restores its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn from_content(bytes: &[u8]) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, bytes))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// The bitmap being sliced.
///
/// Keeps the original encoded bytes when they are known so exports can
/// decode a fresh copy instead of reusing whatever was shown on screen.
#[derive(Clone)]
pub struct SourceImage {
    id: DocumentId,
    pixels: Arc<RgbaImage>,
    original: Option<Arc<[u8]>>,
}

impl SourceImage {
    /// Decode an encoded image file
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ImageError> {
        let pixels = image::load_from_memory(&bytes)?.to_rgba8();
        log::debug!("Decoded source image: {}x{}", pixels.width(), pixels.height());
        Ok(Self {
            id: DocumentId::from_content(&bytes),
            pixels: Arc::new(pixels),
            original: Some(bytes.into()),
        })
    }

    /// Wrap pixels that have no encoded original
    pub fn from_pixels(pixels: RgbaImage) -> Self {
        Self {
            id: DocumentId::from_content(pixels.as_raw()),
            pixels: Arc::new(pixels),
            original: None,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn has_original(&self) -> bool {
        self.original.is_some()
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.pixels.width() as f32, self.pixels.height() as f32)
    }

    /// Pixels for export: re-decoded from the original bytes when available
    pub fn clean_pixels(&self) -> Result<RgbaImage, ImageError> {
        match &self.original {
            Some(bytes) => Ok(image::load_from_memory(bytes)?.to_rgba8()),
            None => Ok(self.pixels.as_ref().clone()),
        }
    }
}

impl fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceImage")
            .field("id", &self.id)
            .field("size", &self.pixels.dimensions())
            .field("has_original", &self.original.is_some())
            .finish()
    }
}
