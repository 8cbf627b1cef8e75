//! Interaction controller: turns pointer and keyboard input into geometry
//! edits, using hit-testing to decide between adding and dragging lines and
//! the history to make each gesture a single undoable step.

use egui::{Key, Modifiers, Pos2};
use log::{debug, info};

use crate::command::{Command, History};
use crate::config::SlicerConfig;
use crate::geometry::{
    self, nearest_line, ImageDimensions, LineKind, LineRef, LineRules, SliceLines,
};
use crate::input::InputEvent;
use crate::state::{DragState, PointerState};

/// Thresholds used to interpret gestures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSettings {
    /// Hit-test reach in screen points; scaled into canvas pixels on use
    pub hit_threshold_px: f32,
    /// Max pointer travel, in canvas pixels, for a press-release to count as a click
    pub click_move_threshold: f32,
    pub line_rules: LineRules,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self::from(&SlicerConfig::default())
    }
}

impl From<&SlicerConfig> for InteractionSettings {
    fn from(config: &SlicerConfig) -> Self {
        Self {
            hit_threshold_px: config.hit_threshold_px,
            click_move_threshold: config.click_move_threshold,
            line_rules: config.line_rules,
        }
    }
}

/// Editing session for one image: geometry history plus pointer state
#[derive(Debug, Clone)]
pub struct SliceEditor {
    dims: ImageDimensions,
    history: History,
    pointer: PointerState,
    settings: InteractionSettings,
    /// Canvas pixels per screen point of the current view
    render_scale: f32,
    modifiers: Modifiers,
    hovered_line: Option<LineRef>,
    hover_point: Option<Pos2>,
}

impl SliceEditor {
    pub fn new(dims: ImageDimensions, settings: InteractionSettings) -> Self {
        Self::with_history(dims, settings, History::new(SliceLines::new()))
    }

    pub fn with_history(dims: ImageDimensions, settings: InteractionSettings, history: History) -> Self {
        Self {
            dims,
            history,
            pointer: PointerState::Idle,
            settings,
            render_scale: 1.0,
            modifiers: Modifiers::default(),
            hovered_line: None,
            hover_point: None,
        }
    }

    pub fn dims(&self) -> ImageDimensions {
        self.dims
    }

    pub fn lines(&self) -> &SliceLines {
        self.history.present()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_dragging(&self) -> bool {
        self.pointer.is_dragging()
    }

    pub fn hovered_line(&self) -> Option<LineRef> {
        self.hovered_line
    }

    pub fn hover_point(&self) -> Option<Pos2> {
        self.hover_point
    }

    /// True when a click would add a vertical line
    pub fn vertical_mode(&self) -> bool {
        self.modifiers.shift
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn set_render_scale(&mut self, scale: f32) {
        if scale.is_finite() && scale > 0.0 {
            self.render_scale = scale;
        }
    }

    /// Hit-test reach in canvas pixels
    pub fn hit_threshold(&self) -> f32 {
        self.settings.hit_threshold_px * self.render_scale
    }

    /// Feed one input event. Returns the command committed to history, if any.
    pub fn handle_event(&mut self, event: &InputEvent) -> Option<Command> {
        match event {
            InputEvent::PointerDown {
                position,
                modifiers,
            } => {
                self.modifiers = *modifiers;
                self.on_pointer_down(*position);
                None
            }
            InputEvent::PointerMove { position } => {
                self.on_pointer_move(*position);
                None
            }
            InputEvent::PointerUp { position } => self.on_pointer_up(*position),
            InputEvent::DoubleClick { position } => self.on_double_click(*position),
            InputEvent::PointerLeave => self.on_pointer_leave(),
            InputEvent::ModifiersChanged(modifiers) => {
                self.modifiers = *modifiers;
                None
            }
            InputEvent::KeyDown { key, modifiers } => {
                self.modifiers = *modifiers;
                self.on_key_down(*key, *modifiers);
                None
            }
        }
    }

    fn on_pointer_down(&mut self, position: Pos2) {
        if self.pointer.is_dragging() {
            return;
        }

        match nearest_line(position, self.lines(), self.hit_threshold()) {
            Some(hit) => {
                debug!("Drag start on {:?}", hit.line);
                self.hovered_line = Some(hit.line);
                self.hover_point = None;
                self.pointer = PointerState::Dragging(DragState {
                    line: hit.line,
                    origin: self.lines().clone(),
                });
            }
            None => {
                self.pointer = PointerState::Pressed { origin: position };
            }
        }
    }

    fn on_pointer_move(&mut self, position: Pos2) {
        if let PointerState::Dragging(drag) = &mut self.pointer {
            let present = self.history.present();
            let (lines, index) = match drag.line.kind {
                LineKind::Horizontal => {
                    geometry::move_horizontal(present, drag.line.index, position.y, self.dims)
                }
                LineKind::Vertical => geometry::move_vertical(
                    present,
                    drag.line.index,
                    position.x,
                    position.y,
                    self.dims,
                ),
            };
            drag.line.index = index;
            self.hovered_line = Some(drag.line);
            self.history.set_present(lines);
            return;
        }

        match nearest_line(position, self.lines(), self.hit_threshold()) {
            Some(hit) => {
                self.hovered_line = Some(hit.line);
                self.hover_point = None;
            }
            None => {
                self.hovered_line = None;
                self.hover_point = Some(position);
            }
        }
    }

    fn on_pointer_up(&mut self, position: Pos2) -> Option<Command> {
        match std::mem::take(&mut self.pointer) {
            // The release belongs to the drag; it never doubles as an add.
            PointerState::Dragging(drag) => self.finish_drag(drag),
            PointerState::Pressed { origin } => {
                let dx = (position.x - origin.x).abs();
                let dy = (position.y - origin.y).abs();
                let threshold = self.settings.click_move_threshold;
                if dx >= threshold || dy >= threshold {
                    debug!("Press moved {}x{}; not a click", dx, dy);
                    return None;
                }
                let kind = if self.vertical_mode() {
                    LineKind::Vertical
                } else {
                    LineKind::Horizontal
                };
                self.execute(Command::AddLine {
                    kind,
                    point: position,
                    rules: self.settings.line_rules,
                })
            }
            PointerState::Idle => None,
        }
    }

    fn on_double_click(&mut self, position: Pos2) -> Option<Command> {
        if let PointerState::Dragging(drag) = std::mem::take(&mut self.pointer) {
            self.finish_drag(drag);
        }
        self.hovered_line = None;
        self.execute(Command::RemoveNear {
            point: position,
            threshold: self.hit_threshold(),
        })
    }

    fn on_pointer_leave(&mut self) -> Option<Command> {
        self.hovered_line = None;
        self.hover_point = None;
        match std::mem::take(&mut self.pointer) {
            PointerState::Dragging(drag) => self.finish_drag(drag),
            _ => None,
        }
    }

    fn on_key_down(&mut self, key: Key, modifiers: Modifiers) {
        if !modifiers.command {
            return;
        }
        match key {
            Key::Z if modifiers.shift => {
                self.redo();
            }
            Key::Z => {
                self.undo();
            }
            Key::Y => {
                self.redo();
            }
            _ => {}
        }
    }

    /// Commit the drag's terminal geometry as one step on top of its origin
    fn finish_drag(&mut self, drag: DragState) -> Option<Command> {
        let result = self.history.present().clone();
        self.history.set_present(drag.origin);
        self.execute(Command::MoveLine {
            line: drag.line,
            result,
        })
    }

    fn execute(&mut self, command: Command) -> Option<Command> {
        self.history.execute(&command, self.dims).then_some(command)
    }

    pub fn undo(&mut self) -> bool {
        if self.pointer.is_dragging() {
            debug!("Undo ignored during drag");
            return false;
        }
        self.hovered_line = None;
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        if self.pointer.is_dragging() {
            debug!("Redo ignored during drag");
            return false;
        }
        self.hovered_line = None;
        self.history.redo()
    }

    /// Remove every line as one undoable step
    pub fn clear(&mut self) -> Option<Command> {
        if self.pointer.is_dragging() {
            return None;
        }
        info!("Clearing all slice lines");
        self.hovered_line = None;
        self.execute(Command::Clear)
    }
}
