#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

use image_slicer::{SlicerApp, SlicerConfig};

const CONFIG_FILE: &str = "image-slicer.json";

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = match SlicerConfig::load(CONFIG_FILE) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("Ignoring {}: {}", CONFIG_FILE, err);
            SlicerConfig::default()
        }
    };
    let path = std::env::args_os().nth(1).map(PathBuf::from);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([400.0, 300.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "Image Slicer",
        native_options,
        Box::new(|cc| Ok(Box::new(SlicerApp::new(cc, config, path)))),
    )
}
