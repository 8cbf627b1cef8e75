use egui::{Context, Modifiers, Pos2, Response};

use super::{CanvasTransform, InputEvent};

/// Converts raw egui input on the canvas into `InputEvent`s in canvas space
#[derive(Debug, Default)]
pub struct InputHandler {
    /// Last pointer position inside the canvas, in canvas pixels
    last_pointer_pos: Option<Pos2>,
    last_modifiers: Modifiers,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process this frame's input for the canvas widget behind `response`
    pub fn process_input(
        &mut self,
        ctx: &Context,
        response: &Response,
        transform: &CanvasTransform,
    ) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            if input.modifiers != self.last_modifiers {
                events.push(InputEvent::ModifiersChanged(input.modifiers));
                self.last_modifiers = input.modifiers;
            }

            let hover = input
                .pointer
                .hover_pos()
                .filter(|pos| transform.contains(*pos))
                .map(|pos| transform.to_canvas(pos));

            match hover {
                Some(pos) => {
                    if Some(pos) != self.last_pointer_pos {
                        events.push(InputEvent::PointerMove { position: pos });
                    }
                    if input.pointer.primary_pressed() {
                        events.push(InputEvent::PointerDown {
                            position: pos,
                            modifiers: input.modifiers,
                        });
                    }
                    if input.pointer.primary_released() {
                        events.push(InputEvent::PointerUp { position: pos });
                    }
                    if response.double_clicked() {
                        events.push(InputEvent::DoubleClick { position: pos });
                    }
                }
                None => {
                    if self.last_pointer_pos.is_some() {
                        events.push(InputEvent::PointerLeave);
                    }
                }
            }
            self.last_pointer_pos = hover;

            for event in &input.events {
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } = event
                {
                    events.push(InputEvent::KeyDown {
                        key: *key,
                        modifiers: *modifiers,
                    });
                }
            }
        });

        events
    }
}
