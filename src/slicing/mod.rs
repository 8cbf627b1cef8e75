mod archive;
mod export;
mod regions;

pub use archive::{ArchiveBuilder, Download, FileDownload, ZipArchiveBuilder};
pub use export::{encode_region, pixel_rect, ExportStatus, SliceExporter, SliceFormat};
pub use regions::{compute_regions, default_min_size, SliceRegion};
