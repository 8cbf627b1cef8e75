use egui::Pos2;
use log::debug;
use serde::{Deserialize, Serialize};

use super::hit_testing::LineKind;
use super::lines::{boundaries_containing, SliceLines, VerticalLine};
use super::ImageDimensions;

pub const BOUNDARY_PADDING: f32 = 10.0;
pub const MIN_LINE_GAP: f32 = 10.0;

/// Placement rules for newly added lines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineRules {
    /// Minimum distance from either canvas edge
    pub boundary_padding: f32,
    /// Minimum distance from an existing parallel line
    pub min_line_gap: f32,
}

impl Default for LineRules {
    fn default() -> Self {
        Self {
            boundary_padding: BOUNDARY_PADDING,
            min_line_gap: MIN_LINE_GAP,
        }
    }
}

pub fn is_valid_line_position(
    position: f32,
    extent: f32,
    existing: impl IntoIterator<Item = f32>,
    rules: LineRules,
) -> bool {
    if !position.is_finite()
        || position < rules.boundary_padding
        || position > extent - rules.boundary_padding
    {
        return false;
    }
    existing
        .into_iter()
        .all(|line| (line - position).abs() >= rules.min_line_gap)
}

/// Add a line at `point`, or `None` when the position breaks `rules`.
///
/// A vertical line is scoped to the row containing `point.y` and only has to
/// keep its distance from vertical lines in that same row.
pub fn add_line(
    lines: &SliceLines,
    point: Pos2,
    kind: LineKind,
    dims: ImageDimensions,
    rules: LineRules,
) -> Option<SliceLines> {
    match kind {
        LineKind::Horizontal => {
            if !is_valid_line_position(point.y, dims.height, lines.horizontal.iter().copied(), rules) {
                debug!("Rejected horizontal line at y={}", point.y);
                return None;
            }
            let mut horizontal = lines.horizontal.clone();
            horizontal.push(point.y);
            horizontal.sort_by(f32::total_cmp);
            Some(SliceLines {
                horizontal,
                vertical: split_at(&lines.vertical, point.y),
            })
        }
        LineKind::Vertical => {
            let (upper, lower) = boundaries_containing(point.y, dims.height, &lines.horizontal);
            let same_row = lines.verticals_in_row(upper, lower).map(|v| v.x);
            if !is_valid_line_position(point.x, dims.width, same_row, rules) {
                debug!("Rejected vertical line at x={} in row {}..{}", point.x, upper, lower);
                return None;
            }
            let mut vertical = lines.vertical.clone();
            vertical.push(VerticalLine::new(point.x, (upper, lower)));
            vertical.sort_by(|a, b| a.x.total_cmp(&b.x));
            Some(SliceLines {
                horizontal: lines.horizontal.clone(),
                vertical,
            })
        }
    }
}

/// Split every vertical line whose row is cut by a new horizontal line at `y`
/// into one line per resulting row, so the visible cut survives.
fn split_at(vertical: &[VerticalLine], y: f32) -> Vec<VerticalLine> {
    let mut result = Vec::with_capacity(vertical.len());
    for line in vertical {
        if line.upper_bound < y && y < line.lower_bound {
            result.push(VerticalLine::new(line.x, (line.upper_bound, y)));
            result.push(VerticalLine::new(line.x, (y, line.lower_bound)));
        } else {
            result.push(*line);
        }
    }
    result
}
