pub mod hit_testing;
pub mod lines;
pub mod validation;

use serde::{Deserialize, Serialize};

pub use hit_testing::{nearest_line, LineHit, LineKind, LineRef};
pub use lines::{
    boundaries_containing, drag_horizontal, drag_vertical, move_horizontal, move_vertical,
    recompute_vertical_bounds, remove_lines_near, SliceLines, VerticalLine,
};
pub use validation::{add_line, is_valid_line_position, LineRules};

/// Size of the canvas coordinate space every line lives in.
///
/// Origin is top-left; all geometry is expressed in these pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: f32,
    pub height: f32,
}

impl ImageDimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn clamp_x(&self, x: f32) -> f32 {
        x.max(0.0).min(self.width)
    }

    pub fn clamp_y(&self, y: f32) -> f32 {
        y.max(0.0).min(self.height)
    }
}
