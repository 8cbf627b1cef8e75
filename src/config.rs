use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::LineRules;
use crate::slicing::SliceFormat;

pub const DEFAULT_ARCHIVE_NAME: &str = "image-slices.zip";

/// Settings for the slicer. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlicerConfig {
    /// Hit-test reach around a line, in screen points
    pub hit_threshold_px: f32,
    /// Pointer travel (canvas pixels) below which a press-release is a click
    pub click_move_threshold: f32,
    pub line_rules: LineRules,
    /// Cap on undo depth; `None` keeps everything
    pub max_history: Option<usize>,
    pub export_format: SliceFormat,
    pub archive_name: String,
    /// Directory holding per-document geometry and exported archives
    pub storage_dir: PathBuf,
}

impl Default for SlicerConfig {
    fn default() -> Self {
        Self {
            hit_threshold_px: 10.0,
            click_move_threshold: 5.0,
            line_rules: LineRules::default(),
            max_history: None,
            export_format: SliceFormat::Jpeg,
            archive_name: DEFAULT_ARCHIVE_NAME.to_owned(),
            storage_dir: PathBuf::from("slicer-state"),
        }
    }
}

impl SlicerConfig {
    /// Read a JSON config, or the defaults when `path` does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SlicerConfig =
            serde_json::from_str(r#"{"export_format":"png","max_history":50}"#).unwrap();
        assert_eq!(config.export_format, SliceFormat::Png);
        assert_eq!(config.max_history, Some(50));
        assert_eq!(config.hit_threshold_px, 10.0);
        assert_eq!(config.archive_name, DEFAULT_ARCHIVE_NAME);
    }

    #[test]
    fn test_line_rules_are_nested() {
        let config: SlicerConfig = serde_json::from_str(r#"{"line_rules":{"min_line_gap":5.0}}"#).unwrap();
        assert_eq!(config.line_rules.min_line_gap, 5.0);
        assert_eq!(config.line_rules.boundary_padding, 10.0);

        // Flat keys are not recognised.
        let flat: SlicerConfig = serde_json::from_str(r#"{"min_line_gap":5.0}"#).unwrap();
        assert_eq!(flat.line_rules, LineRules::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SlicerConfig::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, SlicerConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slicer.json");
        let config = SlicerConfig {
            click_move_threshold: 3.0,
            ..SlicerConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(SlicerConfig::load(&path).unwrap(), config);
    }
}
