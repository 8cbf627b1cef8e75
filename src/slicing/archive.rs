use std::fs;
use std::io::{Cursor, Write};
use std::path::PathBuf;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::ExportError;

/// Packs named buffers into a single archive buffer, preserving order
pub trait ArchiveBuilder {
    fn build(&self, entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>, ExportError>;
}

/// Hands a finished archive to the user
pub trait Download {
    fn deliver(&self, archive: Vec<u8>, filename: &str) -> Result<(), ExportError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiveBuilder;

impl ArchiveBuilder for ZipArchiveBuilder {
    fn build(&self, entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>, ExportError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        // Slices are already compressed images.
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

        for (name, bytes) in entries {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(bytes)?;
        }

        Ok(writer.finish()?.into_inner())
    }
}

/// Writes archives into a directory on disk
#[derive(Debug, Clone)]
pub struct FileDownload {
    dir: PathBuf,
}

impl FileDownload {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Download for FileDownload {
    fn deliver(&self, archive: Vec<u8>, filename: &str) -> Result<(), ExportError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, archive)?;
        log::info!("Wrote slice archive to {}", path.display());
        Ok(())
    }
}
