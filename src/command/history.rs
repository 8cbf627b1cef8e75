use log::debug;

use super::Command;
use crate::geometry::{ImageDimensions, SliceLines};

/// Linear undo/redo over immutable geometry snapshots
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Older snapshots, most recent last
    past: Vec<SliceLines>,
    present: SliceLines,
    /// Undone snapshots, the next one to redo last
    future: Vec<SliceLines>,
    /// Oldest entries of `past` are evicted past this length
    max_past: Option<usize>,
}

impl History {
    pub fn new(initial: SliceLines) -> Self {
        Self {
            past: Vec::new(),
            present: initial,
            future: Vec::new(),
            max_past: None,
        }
    }

    pub fn with_limit(initial: SliceLines, max_past: Option<usize>) -> Self {
        Self {
            max_past,
            ..Self::new(initial)
        }
    }

    pub fn present(&self) -> &SliceLines {
        &self.present
    }

    /// Replace `present` without recording a step. Used for in-progress drags.
    pub fn set_present(&mut self, lines: SliceLines) {
        self.present = lines;
    }

    /// Push the current `present` onto `past` and discard everything undone
    pub fn commit(&mut self, lines: SliceLines) {
        let previous = std::mem::replace(&mut self.present, lines);
        self.past.push(previous);
        self.future.clear();

        if let Some(max) = self.max_past {
            if self.past.len() > max {
                let excess = self.past.len() - max;
                self.past.drain(..excess);
            }
        }
    }

    /// Apply a command and commit the result if it changed anything
    pub fn execute(&mut self, command: &Command, dims: ImageDimensions) -> bool {
        match command.apply(&self.present, dims) {
            Some(next) => {
                debug!("Committing {}", command.name());
                self.commit(next);
                true
            }
            None => {
                debug!("{} left geometry unchanged; nothing committed", command.name());
                false
            }
        }
    }

    /// Step back one snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            debug!("Undo with empty history ignored");
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push(current);
        true
    }

    /// Step forward one snapshot. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            debug!("Redo with empty future ignored");
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }
}
