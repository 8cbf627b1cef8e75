#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod config;
pub mod editor;
pub mod error;
pub mod file_handler;
pub mod geometry;
pub mod input;
pub mod renderer;
pub mod slicing;
pub mod source;
pub mod state;
pub mod storage;

pub use app::SlicerApp;
pub use command::{Command, History};
pub use config::SlicerConfig;
pub use editor::{InteractionSettings, SliceEditor};
pub use error::{ConfigError, ExportError, GeometryError, StorageError};
pub use geometry::{ImageDimensions, LineKind, LineRef, SliceLines, VerticalLine};
pub use input::{CanvasTransform, InputEvent, InputHandler};
pub use renderer::Renderer;
pub use slicing::{compute_regions, ExportStatus, SliceExporter, SliceFormat, SliceRegion};
pub use source::{DocumentId, SourceImage};
pub use storage::GeometryStore;
