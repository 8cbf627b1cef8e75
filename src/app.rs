use std::path::PathBuf;

use log::{debug, error, info};

use crate::command::History;
use crate::config::SlicerConfig;
use crate::editor::{InteractionSettings, SliceEditor};
use crate::file_handler::{self, FileHandler, LoadedFile};
use crate::geometry::LineKind;
use crate::input::{CanvasTransform, InputHandler};
use crate::renderer::Renderer;
use crate::slicing::{ExportStatus, FileDownload, SliceExporter, ZipArchiveBuilder};
use crate::source::SourceImage;
use crate::storage::{AutoSave, GeometryStore};

const LAST_IMAGE_KEY: &str = "last_image";

/// The image being sliced together with its editing session
struct OpenDocument {
    source: SourceImage,
    editor: SliceEditor,
    autosave: AutoSave,
}

pub struct SlicerApp {
    config: SlicerConfig,
    document: Option<OpenDocument>,
    last_image: Option<PathBuf>,
    renderer: Renderer,
    input: InputHandler,
    files: FileHandler,
    store: GeometryStore,
    exporter: SliceExporter<ZipArchiveBuilder, FileDownload>,
    message: Option<String>,
}

impl SlicerApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: SlicerConfig, path: Option<PathBuf>) -> Self {
        let store = GeometryStore::new(config.storage_dir.join("geometry"));
        let exporter = SliceExporter::new(ZipArchiveBuilder, FileDownload::new(config.storage_dir.join("exports")));

        let remembered: Option<PathBuf> = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, LAST_IMAGE_KEY));

        let mut app = Self {
            config,
            document: None,
            last_image: None,
            renderer: Renderer::new(),
            input: InputHandler::new(),
            files: FileHandler::new(),
            store,
            exporter,
            message: None,
        };

        if let Some(path) = path.or(remembered) {
            match file_handler::load_path(&path) {
                Ok(file) => {
                    app.open(&cc.egui_ctx, file);
                    app.last_image = Some(path);
                }
                Err(err) => app.report(format!("Cannot open {}: {}", path.display(), err)),
            }
        }
        app
    }

    fn report(&mut self, message: String) {
        error!("{}", message);
        self.message = Some(message);
    }

    fn open(&mut self, ctx: &egui::Context, file: LoadedFile) {
        let source = match SourceImage::from_bytes(file.bytes) {
            Ok(source) => source,
            Err(err) => {
                self.report(format!("Cannot decode {}: {}", file.name, err));
                return;
            }
        };

        let lines = self.store.load_or_empty(source.id());
        info!(
            "Opened {} as {} with {} stored lines",
            file.name,
            source.id(),
            lines.horizontal.len() + lines.vertical.len()
        );
        let editor = SliceEditor::with_history(
            source.dimensions(),
            InteractionSettings::from(&self.config),
            History::with_limit(lines.clone(), self.config.max_history),
        );
        self.renderer.set_image(ctx, &source);
        self.document = Some(OpenDocument {
            source,
            editor,
            autosave: AutoSave::new(lines),
        });
        self.message = None;
    }

    /// Write the geometry to the store once it settles on something new
    fn persist(&mut self) {
        let Some(doc) = &mut self.document else {
            return;
        };
        if doc.editor.is_dragging() {
            return;
        }
        doc.autosave.sync(&self.store, doc.source.id(), doc.editor.lines());
    }

    /// Failures are reported through the exporter's status
    fn export(&mut self) {
        let Some(doc) = &self.document else {
            return;
        };
        let _ = futures::executor::block_on(self.exporter.export(
            &doc.source,
            doc.editor.lines(),
            doc.editor.dims(),
            self.config.export_format,
            &self.config.archive_name,
        ));
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let has_doc = self.document.is_some();
            let (can_undo, can_redo, dragging) = self
                .document
                .as_ref()
                .map(|doc| (doc.editor.can_undo(), doc.editor.can_redo(), doc.editor.is_dragging()))
                .unwrap_or((false, false, false));

            if ui.add_enabled(can_undo && !dragging, egui::Button::new("Undo")).clicked() {
                if let Some(doc) = &mut self.document {
                    doc.editor.undo();
                }
            }
            if ui.add_enabled(can_redo && !dragging, egui::Button::new("Redo")).clicked() {
                if let Some(doc) = &mut self.document {
                    doc.editor.redo();
                }
            }
            if ui.add_enabled(has_doc && !dragging, egui::Button::new("Clear")).clicked() {
                if let Some(doc) = &mut self.document {
                    doc.editor.clear();
                }
            }

            ui.separator();

            let exporting = self.exporter.status().is_in_progress();
            if ui.add_enabled(has_doc && !exporting, egui::Button::new("Export slices")).clicked() {
                self.export();
            }
            match self.exporter.status() {
                ExportStatus::Idle => {}
                ExportStatus::InProgress => {
                    ui.spinner();
                }
                ExportStatus::Finished { slices } => {
                    ui.label(format!("Exported {} slices to {}", slices, self.config.archive_name));
                }
                ExportStatus::Failed(reason) => {
                    ui.colored_label(egui::Color32::LIGHT_RED, format!("Export failed: {}", reason));
                }
            }

            let mut numbers = self.renderer.show_slice_numbers();
            if ui.checkbox(&mut numbers, "Slice numbers").changed() {
                self.renderer.set_show_slice_numbers(numbers);
            }
        });
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(message) = &self.message {
                ui.colored_label(egui::Color32::LIGHT_RED, message);
                return;
            }
            match &self.document {
                Some(doc) => {
                    let lines = doc.editor.lines();
                    let dims = doc.editor.dims();
                    ui.label(format!(
                        "{}x{}  |  {} horizontal, {} vertical  |  click: add line, shift+click: vertical, drag: move, double-click: delete",
                        dims.width,
                        dims.height,
                        lines.horizontal.len(),
                        lines.vertical.len()
                    ));
                }
                None => {
                    ui.label("No image loaded");
                }
            }
        });
    }
}

impl eframe::App for SlicerApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Some(path) = &self.last_image {
            eframe::set_value(storage, LAST_IMAGE_KEY, path);
        }
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(file) = self.files.take_dropped_image(ctx) {
            self.last_image = Some(PathBuf::from(&file.name)).filter(|path| path.exists());
            self.open(ctx, file);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.status_bar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(doc) = &mut self.document else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Drop an image here to start slicing");
                });
                return;
            };

            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let transform = CanvasTransform::fit(response.rect, doc.editor.dims());
            doc.editor.set_render_scale(transform.scale());

            for event in self.input.process_input(ctx, &response, &transform) {
                if let Some(command) = doc.editor.handle_event(&event) {
                    debug!("Committed {}", command.name());
                }
            }

            if let Some(line) = doc.editor.hovered_line() {
                ctx.set_cursor_icon(match line.kind {
                    LineKind::Horizontal => egui::CursorIcon::ResizeVertical,
                    LineKind::Vertical => egui::CursorIcon::ResizeHorizontal,
                });
            }

            self.renderer.render(&painter, &transform, &doc.editor);
        });

        self.persist();
        self.files.preview_files_being_dropped(ctx);
    }
}
