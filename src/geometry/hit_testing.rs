use egui::Pos2;
use serde::{Deserialize, Serialize};

use super::lines::SliceLines;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    Horizontal,
    Vertical,
}

/// Identifies one line of a `SliceLines` snapshot by kind and index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRef {
    pub kind: LineKind,
    pub index: usize,
}

impl LineRef {
    pub fn horizontal(index: usize) -> Self {
        Self {
            kind: LineKind::Horizontal,
            index,
        }
    }

    pub fn vertical(index: usize) -> Self {
        Self {
            kind: LineKind::Vertical,
            index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineHit {
    pub line: LineRef,
    pub distance: f32,
}

/// Find the line closest to `point` within `threshold` canvas pixels.
///
/// Horizontal lines are measured along y. Vertical lines are measured along x
/// and only count when `point.y` lies in their row, widened by `threshold`.
/// Equal distances keep the first candidate scanned (horizontal before
/// vertical, ascending index); callers should not rely on that order.
pub fn nearest_line(point: Pos2, lines: &SliceLines, threshold: f32) -> Option<LineHit> {
    let mut nearest: Option<LineHit> = None;

    let mut consider = |line: LineRef, distance: f32| {
        if distance <= threshold && nearest.is_none_or(|hit| distance < hit.distance) {
            nearest = Some(LineHit { line, distance });
        }
    };

    for (index, y) in lines.horizontal.iter().enumerate() {
        consider(LineRef::horizontal(index), (y - point.y).abs());
    }

    for (index, v) in lines.vertical.iter().enumerate() {
        if v.spans(point.y, threshold) {
            consider(LineRef::vertical(index), (v.x - point.x).abs());
        }
    }

    nearest
}
