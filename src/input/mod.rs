use egui::{Key, Modifiers, Pos2, Rect};

use crate::geometry::ImageDimensions;

mod handler;
pub use handler::InputHandler;

/// Pointer and keyboard input, already converted into canvas pixel space
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button was pressed
    PointerDown { position: Pos2, modifiers: Modifiers },
    /// Pointer moved, with or without the button held
    PointerMove { position: Pos2 },
    /// Primary button was released
    PointerUp { position: Pos2 },
    /// Second click of a double click
    DoubleClick { position: Pos2 },
    /// Pointer left the canvas
    PointerLeave,
    /// Modifier keys changed without a pointer event
    ModifiersChanged(Modifiers),
    /// Key was pressed
    KeyDown { key: Key, modifiers: Modifiers },
}

/// Maps between screen points and canvas pixels for a canvas drawn into `screen_rect`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    pub screen_rect: Rect,
    pub dims: ImageDimensions,
}

impl CanvasTransform {
    /// Largest aspect-preserving rect for `dims` centered inside `available`
    pub fn fit(available: Rect, dims: ImageDimensions) -> Self {
        let scale = if dims.width > 0.0 && dims.height > 0.0 {
            (available.width() / dims.width).min(available.height() / dims.height)
        } else {
            1.0
        };
        let size = egui::vec2(dims.width * scale, dims.height * scale);
        Self {
            screen_rect: Rect::from_center_size(available.center(), size),
            dims,
        }
    }

    /// Canvas pixels per screen point
    pub fn scale(&self) -> f32 {
        if self.screen_rect.width() > 0.0 {
            self.dims.width / self.screen_rect.width()
        } else {
            1.0
        }
    }

    pub fn to_canvas(&self, screen: Pos2) -> Pos2 {
        let offset = (screen - self.screen_rect.min) * self.scale();
        Pos2::new(offset.x, offset.y)
    }

    pub fn to_screen(&self, canvas: Pos2) -> Pos2 {
        self.screen_rect.min + canvas.to_vec2() / self.scale()
    }

    pub fn contains(&self, screen: Pos2) -> bool {
        self.screen_rect.contains(screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_preserves_aspect() {
        let available = Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 800.0));
        let transform = CanvasTransform::fit(available, ImageDimensions::new(400.0, 200.0));
        assert_eq!(transform.screen_rect.width(), 800.0);
        assert_eq!(transform.screen_rect.height(), 400.0);
        assert_eq!(transform.screen_rect.min, Pos2::new(0.0, 200.0));
        assert_eq!(transform.scale(), 0.5);
    }

    #[test]
    fn test_screen_canvas_mapping() {
        let transform = CanvasTransform {
            screen_rect: Rect::from_min_size(Pos2::new(10.0, 20.0), egui::vec2(200.0, 100.0)),
            dims: ImageDimensions::new(400.0, 200.0),
        };
        assert_eq!(transform.to_canvas(Pos2::new(60.0, 70.0)), Pos2::new(100.0, 100.0));
        assert_eq!(transform.to_screen(Pos2::new(100.0, 100.0)), Pos2::new(60.0, 70.0));
    }
}
