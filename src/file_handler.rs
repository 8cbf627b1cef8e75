use std::path::Path;

use eframe::egui;

/// An image file the user dropped or named on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Picks up image files dropped onto the window
#[derive(Debug, Default)]
pub struct FileHandler {
    /// Last file handed out, so a drop lingering for several frames is taken once
    last_taken: Option<String>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the first newly dropped image file, if any
    pub fn take_dropped_image(&mut self, ctx: &egui::Context) -> Option<LoadedFile> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            self.last_taken = None;
            return None;
        }

        for file in &dropped {
            let name = display_name(file);
            if self.last_taken.as_deref() == Some(name.as_str()) {
                continue;
            }
            if !is_image_file(file) {
                log::warn!("Dropped file is not a supported type: {}", name);
                continue;
            }
            if let Some(bytes) = read_dropped_file(file, &name) {
                self.last_taken = Some(name.clone());
                return Some(LoadedFile { name, bytes });
            }
        }
        None
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Drop an image to slice:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

/// Read an image from disk, e.g. a path given on the command line
pub fn load_path(path: &Path) -> std::io::Result<LoadedFile> {
    let bytes = std::fs::read(path)?;
    log::info!("Loaded {} ({} bytes)", path.display(), bytes.len());
    Ok(LoadedFile {
        name: path.display().to_string(),
        bytes,
    })
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let name = match &file.path {
        Some(path) => path.as_path(),
        None => Path::new(&file.name),
    };
    name.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp"))
}

fn read_dropped_file(file: &egui::DroppedFile, name: &str) -> Option<Vec<u8>> {
    if let Some(bytes) = &file.bytes {
        log::info!("Loading image from memory: {} ({} bytes)", name, bytes.len());
        return Some(bytes.to_vec());
    }
    let path = file.path.as_ref()?;
    match std::fs::read(path) {
        Ok(bytes) => {
            log::info!("Loading image from path: {}", path.display());
            Some(bytes)
        }
        Err(err) => {
            log::error!("Failed to read image file: {}: {}", path.display(), err);
            None
        }
    }
}
