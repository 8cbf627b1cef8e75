// src/renderer.rs
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, TextureHandle};

use crate::editor::SliceEditor;
use crate::geometry::{boundaries_containing, LineRef};
use crate::input::CanvasTransform;
use crate::slicing::{compute_regions, default_min_size};
use crate::source::SourceImage;

const LINE_COLOR: Color32 = Color32::from_rgb(40, 120, 255);
const HOVER_COLOR: Color32 = Color32::from_rgb(230, 40, 40);
const GUIDE_COLOR: Color32 = Color32::from_rgba_premultiplied(40, 120, 255, 160);

/// Draws the source image, the cut lines and the hover feedback
pub struct Renderer {
    texture: Option<TextureHandle>,
    line_width: f32,
    show_slice_numbers: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            texture: None,
            line_width: 2.0,
            show_slice_numbers: true,
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload `source` as the canvas texture, replacing any previous one
    pub fn set_image(&mut self, ctx: &egui::Context, source: &SourceImage) {
        let pixels = source.pixels();
        let size = [pixels.width() as usize, pixels.height() as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_raw());
        self.texture = Some(ctx.load_texture(
            format!("source-{}", source.id()),
            image,
            egui::TextureOptions::LINEAR,
        ));
    }

    pub fn has_image(&self) -> bool {
        self.texture.is_some()
    }

    pub fn show_slice_numbers(&self) -> bool {
        self.show_slice_numbers
    }

    pub fn set_show_slice_numbers(&mut self, show: bool) {
        self.show_slice_numbers = show;
    }

    /// Renders the current frame of the editor into `transform.screen_rect`
    pub fn render(&self, painter: &Painter, transform: &CanvasTransform, editor: &SliceEditor) {
        let rect = transform.screen_rect;
        match &self.texture {
            Some(texture) => {
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                painter.image(texture.id(), rect, uv, Color32::WHITE);
            }
            None => {
                painter.rect_filled(rect, 0.0, Color32::from_gray(40));
            }
        }

        let lines = editor.lines();
        let hovered = editor.hovered_line();
        let dims = editor.dims();

        for (index, y) in lines.horizontal.iter().enumerate() {
            let stroke = self.stroke_for(hovered == Some(LineRef::horizontal(index)));
            painter.line_segment(
                [
                    transform.to_screen(Pos2::new(0.0, *y)),
                    transform.to_screen(Pos2::new(dims.width, *y)),
                ],
                stroke,
            );
        }

        for (index, line) in lines.vertical.iter().enumerate() {
            let stroke = self.stroke_for(hovered == Some(LineRef::vertical(index)));
            painter.line_segment(
                [
                    transform.to_screen(Pos2::new(line.x, line.upper_bound)),
                    transform.to_screen(Pos2::new(line.x, line.lower_bound)),
                ],
                stroke,
            );
        }

        if hovered.is_none() && !editor.is_dragging() {
            if let Some(point) = editor.hover_point() {
                self.render_guide(painter, transform, editor, point);
            }
        }

        if self.show_slice_numbers {
            self.render_slice_numbers(painter, transform, editor);
        }
    }

    fn stroke_for(&self, hovered: bool) -> Stroke {
        if hovered {
            Stroke::new(self.line_width + 1.0, HOVER_COLOR)
        } else {
            Stroke::new(self.line_width, LINE_COLOR)
        }
    }

    /// Dashed preview of the line a click would add at `point`
    fn render_guide(&self, painter: &Painter, transform: &CanvasTransform, editor: &SliceEditor, point: Pos2) {
        let dims = editor.dims();
        let (start, end) = if editor.vertical_mode() {
            let (upper, lower) = boundaries_containing(point.y, dims.height, &editor.lines().horizontal);
            (Pos2::new(point.x, upper), Pos2::new(point.x, lower))
        } else {
            (Pos2::new(0.0, point.y), Pos2::new(dims.width, point.y))
        };
        let points = [transform.to_screen(start), transform.to_screen(end)];
        painter.extend(Shape::dashed_line(
            &points,
            Stroke::new(1.0, GUIDE_COLOR),
            6.0,
            4.0,
        ));
    }

    fn render_slice_numbers(&self, painter: &Painter, transform: &CanvasTransform, editor: &SliceEditor) {
        let dims = editor.dims();
        let regions = compute_regions(editor.lines(), dims, default_min_size(dims));
        if regions.len() < 2 {
            return;
        }
        for (i, region) in regions.iter().enumerate() {
            let (cx, cy) = region.center();
            let center = transform.to_screen(Pos2::new(cx, cy));
            painter.circle_filled(center, 10.0, Color32::from_black_alpha(150));
            painter.text(
                center,
                Align2::CENTER_CENTER,
                (i + 1).to_string(),
                FontId::proportional(12.0),
                Color32::WHITE,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::InteractionSettings;
    use crate::geometry::ImageDimensions;
    use crate::input::InputEvent;

    fn editor_with_lines() -> SliceEditor {
        let mut editor = SliceEditor::new(ImageDimensions::new(400.0, 300.0), InteractionSettings::default());
        editor.handle_event(&InputEvent::PointerDown {
            position: Pos2::new(50.0, 100.0),
            modifiers: egui::Modifiers::default(),
        });
        editor.handle_event(&InputEvent::PointerUp {
            position: Pos2::new(50.0, 100.0),
        });
        editor
    }

    #[test]
    fn test_renderer_creation() {
        let renderer = Renderer::new();
        assert!(!renderer.has_image());
        assert!(renderer.show_slice_numbers());
    }

    #[test]
    fn test_set_image_uploads_texture() {
        let ctx = egui::Context::default();
        let mut renderer = Renderer::new();
        renderer.set_image(&ctx, &SourceImage::from_pixels(image::RgbaImage::new(4, 3)));
        assert!(renderer.has_image());
    }

    #[test]
    fn test_render_basics() {
        let ctx = egui::Context::default();
        let renderer = Renderer::new();
        let mut editor = editor_with_lines();
        editor.handle_event(&InputEvent::PointerMove {
            position: Pos2::new(200.0, 250.0),
        });
        let transform = CanvasTransform {
            screen_rect: Rect::from_min_size(Pos2::ZERO, egui::vec2(400.0, 300.0)),
            dims: editor.dims(),
        };

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            renderer.render(&painter, &transform, &editor);
        });
    }
}
