use thiserror::Error;

/// Errors raised while validating geometry that came from outside the editor
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Malformed geometry: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Non-finite coordinate in {field}")]
    NonFinite { field: &'static str },

    #[error("Vertical line at x={x} has inverted bounds ({upper} > {lower})")]
    InvertedBounds { x: f32, upper: f32, lower: f32 },
}

/// Errors that can occur while persisting geometry
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to serialize geometry: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to access geometry store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored geometry is invalid: {0}")]
    InvalidGeometry(#[from] GeometryError),
}

/// Result type for persistence operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that abort a slice export as a whole
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("An export is already running")]
    ExportInProgress,

    #[error("Cannot acquire surface for slice {index} ({width}x{height} at {x},{y})")]
    SurfaceAcquisition {
        index: usize,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Failed to deliver archive: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export was dropped before it finished")]
    Aborted,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
