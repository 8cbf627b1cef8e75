use std::fs;
use std::path::PathBuf;

use log::{debug, warn};

use crate::error::{StorageError, StorageResult};
use crate::geometry::SliceLines;
use crate::source::DocumentId;

/// Per-document geometry kept as `<id>.json` files in one directory.
///
/// The document id is always supplied by the caller; the store has no notion
/// of a "current" image.
#[derive(Debug, Clone)]
pub struct GeometryStore {
    dir: PathBuf,
}

impl GeometryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: DocumentId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    pub fn save(&self, id: DocumentId, lines: &SliceLines) -> StorageResult<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(lines)?;
        fs::write(self.path_for(id), json)?;
        debug!(
            "Saved {} horizontal / {} vertical lines for {}",
            lines.horizontal.len(),
            lines.vertical.len(),
            id
        );
        Ok(())
    }

    /// Stored geometry for `id`, or `None` if nothing was saved.
    ///
    /// The structure is taken as stored; vertical bounds are not re-derived.
    pub fn load(&self, id: DocumentId) -> StorageResult<Option<SliceLines>> {
        let path = self.path_for(id);
        if !path.exists() {
            debug!("No stored lines for {}", id);
            return Ok(None);
        }
        let json = fs::read_to_string(path)?;
        Ok(Some(SliceLines::from_json(&json)?))
    }

    /// Like `load`, but any failure falls back to empty geometry
    pub fn load_or_empty(&self, id: DocumentId) -> SliceLines {
        match self.load(id) {
            Ok(lines) => lines.unwrap_or_default(),
            Err(err) => {
                warn!("Discarding stored lines for {}: {}", id, err);
                SliceLines::new()
            }
        }
    }

    pub fn remove(&self, id: DocumentId) -> StorageResult<()> {
        let path = self.path_for(id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Delete every stored geometry file
    pub fn clear(&self) -> StorageResult<()> {
        if !self.dir.exists() {
            return Ok(());
        }
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

/// Write-behind state for one open document.
///
/// Unchanged geometry is never written twice, and after a failed write the
/// same geometry is not retried until it changes again.
#[derive(Debug, Clone)]
pub struct AutoSave {
    saved: SliceLines,
    failed: Option<SliceLines>,
}

impl AutoSave {
    /// Start tracking from geometry that is already in the store
    pub fn new(saved: SliceLines) -> Self {
        Self { saved, failed: None }
    }

    /// Save `lines` if needed. Returns `None` when no write was attempted.
    pub fn sync(&mut self, store: &GeometryStore, id: DocumentId, lines: &SliceLines) -> Option<StorageResult<()>> {
        if lines == &self.saved || self.failed.as_ref() == Some(lines) {
            return None;
        }
        let result = store.save(id, lines);
        match &result {
            Ok(()) => {
                self.saved = lines.clone();
                self.failed = None;
            }
            Err(err) => {
                warn!("Failed to save lines for {}: {}", id, err);
                self.failed = Some(lines.clone());
            }
        }
        Some(result)
    }
}
