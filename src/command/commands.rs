use egui::Pos2;

use crate::geometry::{self, ImageDimensions, LineKind, LineRef, LineRules, SliceLines};

/// Edits that are committed to history as a single undoable step
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Place a new line at a click position
    AddLine {
        kind: LineKind,
        point: Pos2,
        rules: LineRules,
    },
    /// Delete every line within reach of a point
    RemoveNear {
        point: Pos2,
        threshold: f32,
    },
    /// Drop all lines
    Clear,
    /// Terminal state of a drag; intermediate positions are never committed
    MoveLine {
        line: LineRef,
        result: SliceLines,
    },
}

impl Command {
    /// The geometry after this command, or `None` when it would change nothing.
    pub fn apply(&self, lines: &SliceLines, dims: ImageDimensions) -> Option<SliceLines> {
        let next = match self {
            Command::AddLine { kind, point, rules } => {
                geometry::add_line(lines, *point, *kind, dims, *rules)?
            }
            Command::RemoveNear { point, threshold } => {
                geometry::remove_lines_near(lines, *point, *threshold, *threshold, dims)
            }
            Command::Clear => SliceLines::new(),
            Command::MoveLine { result, .. } => result.clone(),
        };
        (next != *lines).then_some(next)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::AddLine { .. } => "AddLine",
            Command::RemoveNear { .. } => "RemoveNear",
            Command::Clear => "Clear",
            Command::MoveLine { .. } => "MoveLine",
        }
    }
}
