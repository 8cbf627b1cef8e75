use serde::{Deserialize, Serialize};

use crate::geometry::{ImageDimensions, SliceLines};

/// A rectangle of the canvas that becomes one exported image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliceRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SliceRegion {
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Smallest row height or column width that is still exported
pub fn default_min_size(dims: ImageDimensions) -> f32 {
    (0.01 * dims.width.min(dims.height)).max(10.0)
}

/// Sorted, clamped cut positions bracketed by `0` and `extent`
fn boundaries(cuts: impl Iterator<Item = f32>, extent: f32) -> Vec<f32> {
    let mut edges: Vec<f32> = cuts
        .filter(|c| c.is_finite())
        .map(|c| c.max(0.0).min(extent))
        .chain([0.0, extent])
        .collect();
    edges.sort_by(f32::total_cmp);
    edges
}

/// Turn geometry into disjoint regions in row-major order.
///
/// Rows or columns thinner than `min_size` are dropped. A vertical line counts
/// for every row its cached bounds overlap, so bounds that are coarser than
/// the current rows still cut each row they cover.
pub fn compute_regions(lines: &SliceLines, dims: ImageDimensions, min_size: f32) -> Vec<SliceRegion> {
    let rows = boundaries(lines.horizontal.iter().copied(), dims.height);
    let mut regions = Vec::new();

    for row in rows.windows(2) {
        let (top, bottom) = (row[0], row[1]);
        let height = bottom - top;
        if height <= 0.0 || height < min_size {
            continue;
        }

        let cuts = lines
            .vertical
            .iter()
            .filter(|v| v.upper_bound < bottom && v.lower_bound > top)
            .map(|v| v.x);
        let columns = boundaries(cuts, dims.width);

        for column in columns.windows(2) {
            let (left, right) = (column[0], column[1]);
            let width = right - left;
            if width <= 0.0 || width < min_size {
                continue;
            }
            regions.push(SliceRegion {
                x: left,
                y: top,
                width,
                height,
            });
        }
    }

    regions
}
