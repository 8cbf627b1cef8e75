//! Cut-line data model and the functions that keep vertical bounds in step
//! with the horizontal partition.
//!
//! Rows are never stored: they are the gaps between consecutive entries of
//! `{0} ∪ horizontal ∪ {height}`. A vertical line caches the row it was placed
//! in as `[upper_bound, lower_bound]`, and every function here that changes the
//! horizontal set rewrites those caches before returning.

use egui::Pos2;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::ImageDimensions;
use crate::error::GeometryError;

/// A vertical cut that only spans one row of the horizontal partition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerticalLine {
    pub x: f32,
    pub upper_bound: f32,
    pub lower_bound: f32,
}

impl VerticalLine {
    pub fn new(x: f32, (upper_bound, lower_bound): (f32, f32)) -> Self {
        Self {
            x,
            upper_bound,
            lower_bound,
        }
    }

    /// A y-coordinate inside the row this line belongs to.
    ///
    /// Used to re-derive the row after the horizontal set changes. The row is
    /// identified by its cached bounds, never by `x`.
    pub fn row_anchor(&self, height: f32) -> f32 {
        let mid = (self.upper_bound + self.lower_bound) / 2.0;
        mid.max(0.0).min(height)
    }

    /// True when `y` lies within the line's span, widened by `tolerance` on both ends
    pub fn spans(&self, y: f32, tolerance: f32) -> bool {
        y >= self.upper_bound - tolerance && y <= self.lower_bound + tolerance
    }
}

/// The complete geometry snapshot: sorted horizontal cuts and row-scoped vertical cuts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SliceLines {
    pub horizontal: Vec<f32>,
    pub vertical: Vec<VerticalLine>,
}

impl SliceLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.horizontal.is_empty() && self.vertical.is_empty()
    }

    /// Parse the persisted `{horizontal, vertical}` structure.
    ///
    /// Only the shape is checked; bounds are accepted as stored.
    pub fn from_json(json: &str) -> Result<Self, GeometryError> {
        let lines: Self = serde_json::from_str(json)?;
        lines.validate()?;
        Ok(lines)
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.horizontal.iter().any(|y| !y.is_finite()) {
            return Err(GeometryError::NonFinite { field: "horizontal" });
        }
        for line in &self.vertical {
            if !line.x.is_finite() {
                return Err(GeometryError::NonFinite { field: "vertical.x" });
            }
            if !line.upper_bound.is_finite() || !line.lower_bound.is_finite() {
                return Err(GeometryError::NonFinite {
                    field: "vertical.bounds",
                });
            }
            if line.upper_bound > line.lower_bound {
                return Err(GeometryError::InvertedBounds {
                    x: line.x,
                    upper: line.upper_bound,
                    lower: line.lower_bound,
                });
            }
        }
        Ok(())
    }

    /// Vertical lines whose cached row is exactly `(upper, lower)`
    pub fn verticals_in_row(&self, upper: f32, lower: f32) -> impl Iterator<Item = &VerticalLine> {
        self.vertical
            .iter()
            .filter(move |v| v.upper_bound == upper && v.lower_bound == lower)
    }
}

/// The row containing `y`: the largest line strictly above it (or 0) and the
/// smallest line at or below it (or `height`).
///
/// A point exactly on a line therefore resolves to the row that line closes.
pub fn boundaries_containing(y: f32, height: f32, horizontal: &[f32]) -> (f32, f32) {
    let y = y.max(0.0).min(height);
    let mut sorted = horizontal.to_vec();
    sorted.sort_by(f32::total_cmp);

    let mut upper = 0.0;
    let mut lower = height;
    for line in sorted {
        if line < y {
            upper = line;
        } else {
            lower = line;
            break;
        }
    }
    (upper, lower)
}

/// Rewrite every vertical line's bounds against `horizontal`.
///
/// Each line keeps the row its current bounds point at; only the bounds are
/// refreshed. Applying this twice gives the same result as applying it once.
pub fn recompute_vertical_bounds(
    vertical: &[VerticalLine],
    horizontal: &[f32],
    height: f32,
) -> Vec<VerticalLine> {
    vertical
        .iter()
        .map(|line| {
            let bounds = boundaries_containing(line.row_anchor(height), height, horizontal);
            VerticalLine::new(line.x, bounds)
        })
        .collect()
}

/// Stable sort that reports where the element at `moved` ended up
fn sort_tracking<T>(items: Vec<T>, moved: usize, key: impl Fn(&T) -> f32) -> (Vec<T>, usize) {
    let mut indexed: Vec<(usize, T)> = items.into_iter().enumerate().collect();
    indexed.sort_by(|a, b| key(&a.1).total_cmp(&key(&b.1)));
    let new_index = indexed
        .iter()
        .position(|(i, _)| *i == moved)
        .unwrap_or(moved);
    (indexed.into_iter().map(|(_, item)| item).collect(), new_index)
}

/// Move horizontal line `index` to `new_y` and return the new geometry along
/// with the line's index in the re-sorted set.
pub fn move_horizontal(
    lines: &SliceLines,
    index: usize,
    new_y: f32,
    dims: ImageDimensions,
) -> (SliceLines, usize) {
    let Some(&old_y) = lines.horizontal.get(index) else {
        warn!("Horizontal drag on missing line {}", index);
        return (lines.clone(), index);
    };
    let new_y = dims.clamp_y(new_y);

    // Rows bounded by the dragged line follow it before their anchors are re-read.
    let shifted: Vec<VerticalLine> = lines
        .vertical
        .iter()
        .map(|v| VerticalLine {
            x: v.x,
            upper_bound: if v.upper_bound == old_y { new_y } else { v.upper_bound },
            lower_bound: if v.lower_bound == old_y { new_y } else { v.lower_bound },
        })
        .collect();

    let mut horizontal = lines.horizontal.clone();
    horizontal[index] = new_y;
    let (horizontal, new_index) = sort_tracking(horizontal, index, |y| *y);
    let vertical = recompute_vertical_bounds(&shifted, &horizontal, dims.height);

    (
        SliceLines {
            horizontal,
            vertical,
        },
        new_index,
    )
}

pub fn drag_horizontal(lines: &SliceLines, index: usize, new_y: f32, dims: ImageDimensions) -> SliceLines {
    move_horizontal(lines, index, new_y, dims).0
}

/// Move vertical line `index` to `new_x`, assigning it to the row containing
/// `anchor_y` (the pointer's y at drag time).
pub fn move_vertical(
    lines: &SliceLines,
    index: usize,
    new_x: f32,
    anchor_y: f32,
    dims: ImageDimensions,
) -> (SliceLines, usize) {
    if index >= lines.vertical.len() {
        warn!("Vertical drag on missing line {}", index);
        return (lines.clone(), index);
    }

    let bounds = boundaries_containing(anchor_y, dims.height, &lines.horizontal);
    let mut vertical = lines.vertical.clone();
    vertical[index] = VerticalLine::new(dims.clamp_x(new_x), bounds);
    let (vertical, new_index) = sort_tracking(vertical, index, |v| v.x);

    (
        SliceLines {
            horizontal: lines.horizontal.clone(),
            vertical,
        },
        new_index,
    )
}

pub fn drag_vertical(
    lines: &SliceLines,
    index: usize,
    new_x: f32,
    anchor_y: f32,
    dims: ImageDimensions,
) -> SliceLines {
    move_vertical(lines, index, new_x, anchor_y, dims).0
}

/// Drop every line within reach of `point`.
///
/// A vertical line is only reachable when `point.y` falls inside its row
/// (widened by `threshold_y`). Removing a horizontal line merges two rows, so
/// the surviving vertical lines are re-bounded against the reduced set.
pub fn remove_lines_near(
    lines: &SliceLines,
    point: Pos2,
    threshold_x: f32,
    threshold_y: f32,
    dims: ImageDimensions,
) -> SliceLines {
    let horizontal: Vec<f32> = lines
        .horizontal
        .iter()
        .copied()
        .filter(|y| (y - point.y).abs() > threshold_y)
        .collect();

    let vertical: Vec<VerticalLine> = lines
        .vertical
        .iter()
        .copied()
        .filter(|v| !((v.x - point.x).abs() <= threshold_x && v.spans(point.y, threshold_y)))
        .collect();

    let removed_horizontal = lines.horizontal.len() - horizontal.len();
    let removed_vertical = lines.vertical.len() - vertical.len();
    debug!(
        "Removed {} horizontal and {} vertical lines near ({}, {})",
        removed_horizontal, removed_vertical, point.x, point.y
    );

    let vertical = if removed_horizontal > 0 {
        // Pieces of one cut that were split by the removed line merge back.
        let mut merged = recompute_vertical_bounds(&vertical, &horizontal, dims.height);
        merged.dedup();
        merged
    } else {
        vertical
    };

    SliceLines {
        horizontal,
        vertical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> ImageDimensions {
        ImageDimensions::new(100.0, 100.0)
    }

    #[test]
    fn test_boundaries_without_lines() {
        assert_eq!(boundaries_containing(50.0, 100.0, &[]), (0.0, 100.0));
    }

    #[test]
    fn test_boundaries_between_lines() {
        assert_eq!(boundaries_containing(50.0, 100.0, &[75.0, 25.0]), (25.0, 75.0));
    }

    #[test]
    fn test_point_on_line_belongs_to_row_it_closes() {
        assert_eq!(boundaries_containing(25.0, 100.0, &[25.0, 75.0]), (0.0, 25.0));
    }

    #[test]
    fn test_boundaries_bracket_every_point() {
        let height = 300.0;
        let sets: [&[f32]; 4] = [&[], &[100.0], &[50.0, 50.0, 200.0], &[0.0, 150.0, 300.0]];
        for horizontal in sets {
            for step in 0..=60 {
                let y = step as f32 * 5.0;
                let (upper, lower) = boundaries_containing(y, height, horizontal);
                assert!(upper <= y && y <= lower, "y={y} got ({upper}, {lower})");
                assert!(upper == 0.0 || horizontal.contains(&upper));
                assert!(lower == height || horizontal.contains(&lower));
                assert!(!horizontal.iter().any(|h| *h > upper && *h < lower));
            }
        }
    }

    #[test]
    fn test_recompute_assigns_rows() {
        let vertical = vec![
            VerticalLine::new(30.0, (0.0, 100.0)),
            VerticalLine::new(60.0, (25.0, 75.0)),
        ];
        let result = recompute_vertical_bounds(&vertical, &[25.0, 75.0], 100.0);
        assert_eq!(result[0], VerticalLine::new(30.0, (25.0, 75.0)));
        assert_eq!(result[1], VerticalLine::new(60.0, (25.0, 75.0)));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let horizontal = [20.0, 20.0, 60.0];
        let vertical = vec![
            VerticalLine::new(10.0, (0.0, 20.0)),
            VerticalLine::new(40.0, (20.0, 20.0)),
            VerticalLine::new(70.0, (20.0, 60.0)),
            VerticalLine::new(90.0, (-40.0, 500.0)),
        ];
        let once = recompute_vertical_bounds(&vertical, &horizontal, 100.0);
        let twice = recompute_vertical_bounds(&once, &horizontal, 100.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_drag_horizontal_carries_bounds() {
        let lines = SliceLines {
            horizontal: vec![25.0],
            vertical: vec![VerticalLine::new(40.0, (0.0, 25.0))],
        };
        let result = drag_horizontal(&lines, 0, 50.0, dims());
        assert_eq!(result.horizontal, vec![50.0]);
        assert_eq!(result.vertical[0].upper_bound, 0.0);
        assert_eq!(result.vertical[0].lower_bound, 50.0);
    }

    #[test]
    fn test_drag_horizontal_keeps_order() {
        let lines = SliceLines {
            horizontal: vec![25.0, 75.0],
            vertical: vec![
                VerticalLine::new(30.0, (0.0, 25.0)),
                VerticalLine::new(60.0, (25.0, 75.0)),
            ],
        };
        let (result, index) = move_horizontal(&lines, 0, 80.0, dims());
        assert_eq!(result.horizontal, vec![75.0, 80.0]);
        assert_eq!(index, 1);
        for v in &result.vertical {
            let expected = boundaries_containing(v.row_anchor(100.0), 100.0, &result.horizontal);
            assert_eq!((v.upper_bound, v.lower_bound), expected);
        }
    }

    #[test]
    fn test_drag_horizontal_clamps() {
        let lines = SliceLines {
            horizontal: vec![25.0],
            vertical: vec![],
        };
        assert_eq!(drag_horizontal(&lines, 0, -30.0, dims()).horizontal, vec![0.0]);
        assert_eq!(drag_horizontal(&lines, 0, 130.0, dims()).horizontal, vec![100.0]);
    }

    #[test]
    fn test_drag_vertical_follows_pointer_row() {
        let lines = SliceLines {
            horizontal: vec![25.0, 75.0],
            vertical: vec![
                VerticalLine::new(30.0, (0.0, 25.0)),
                VerticalLine::new(60.0, (25.0, 75.0)),
            ],
        };
        let result = drag_vertical(&lines, 0, 45.0, 10.0, dims());
        assert_eq!(result.vertical[0], VerticalLine::new(45.0, (0.0, 25.0)));

        let result = drag_vertical(&lines, 0, 45.0, 90.0, dims());
        assert_eq!(result.vertical[0], VerticalLine::new(45.0, (75.0, 100.0)));
    }

    #[test]
    fn test_drag_vertical_keeps_order() {
        let lines = SliceLines {
            horizontal: vec![25.0, 75.0],
            vertical: vec![
                VerticalLine::new(30.0, (0.0, 25.0)),
                VerticalLine::new(60.0, (25.0, 75.0)),
            ],
        };
        let (result, index) = move_vertical(&lines, 1, 20.0, 50.0, dims());
        assert_eq!(result.vertical[0].x, 20.0);
        assert_eq!(result.vertical[1].x, 30.0);
        assert_eq!(index, 0);
    }

    #[test]
    fn test_remove_horizontal_widens_verticals() {
        let lines = SliceLines {
            horizontal: vec![25.0, 75.0],
            vertical: vec![
                VerticalLine::new(30.0, (0.0, 25.0)),
                VerticalLine::new(60.0, (25.0, 75.0)),
                VerticalLine::new(80.0, (75.0, 100.0)),
            ],
        };
        let result = remove_lines_near(&lines, Pos2::new(5.0, 26.0), 3.0, 3.0, dims());
        assert_eq!(result.horizontal, vec![75.0]);
        assert_eq!(result.vertical[0], VerticalLine::new(30.0, (0.0, 75.0)));
        assert_eq!(result.vertical[1], VerticalLine::new(60.0, (0.0, 75.0)));
        assert_eq!(result.vertical[2], VerticalLine::new(80.0, (75.0, 100.0)));
    }

    #[test]
    fn test_remove_vertical_only_within_its_row() {
        let lines = SliceLines {
            horizontal: vec![50.0],
            vertical: vec![
                VerticalLine::new(30.0, (0.0, 50.0)),
                VerticalLine::new(30.0, (50.0, 100.0)),
            ],
        };
        let result = remove_lines_near(&lines, Pos2::new(31.0, 80.0), 3.0, 3.0, dims());
        assert_eq!(result.horizontal, vec![50.0]);
        assert_eq!(result.vertical, vec![VerticalLine::new(30.0, (0.0, 50.0))]);
    }

    #[test]
    fn test_remove_horizontal_merges_split_cut() {
        let lines = SliceLines {
            horizontal: vec![50.0],
            vertical: vec![
                VerticalLine::new(30.0, (0.0, 50.0)),
                VerticalLine::new(30.0, (50.0, 100.0)),
            ],
        };
        let result = remove_lines_near(&lines, Pos2::new(80.0, 50.0), 3.0, 3.0, dims());
        assert!(result.horizontal.is_empty());
        assert_eq!(result.vertical, vec![VerticalLine::new(30.0, (0.0, 100.0))]);
    }

    #[test]
    fn test_json_shape() {
        let lines = SliceLines {
            horizontal: vec![10.0],
            vertical: vec![VerticalLine::new(5.0, (0.0, 10.0))],
        };
        let json = serde_json::to_string(&lines).unwrap();
        assert_eq!(
            json,
            r#"{"horizontal":[10.0],"vertical":[{"x":5.0,"upperBound":0.0,"lowerBound":10.0}]}"#
        );
        assert_eq!(SliceLines::from_json(&json).unwrap(), lines);
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(SliceLines::from_json(r#"{"horizontal":[1.0]}"#).is_err());
        assert!(SliceLines::from_json(r#"{"horizontal":[],"vertical":[{"x":"a"}]}"#).is_err());
        assert!(
            SliceLines::from_json(
                r#"{"horizontal":[],"vertical":[{"x":1.0,"upperBound":50.0,"lowerBound":10.0}]}"#
            )
            .is_err()
        );
    }
}
