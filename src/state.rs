use egui::Pos2;

use crate::geometry::{LineRef, SliceLines};

/// A drag in progress. Never persisted and never part of history.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// The line being dragged; its index follows the line through re-sorts
    pub line: LineRef,
    /// Geometry when the drag began, restored before the terminal commit
    pub origin: SliceLines,
}

/// Pointer session state of the interaction controller.
///
/// ```text
/// Idle ──press near line──► Dragging ──release──► Idle (commit once)
/// Idle ──press elsewhere──► Pressed  ──release within threshold──► Idle (add line)
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PointerState {
    #[default]
    Idle,
    /// Click candidate: pressed away from any line. The line kind is decided
    /// by the modifiers held at release.
    Pressed { origin: Pos2 },
    Dragging(DragState),
}

impl PointerState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }
}
