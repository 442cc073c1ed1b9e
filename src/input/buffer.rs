use std::collections::VecDeque;

use crate::game::{Command, Direction};

/// Input collected between two tick boundaries
///
/// Only the latest direction request survives; control commands are kept in
/// arrival order.
#[derive(Debug, Default)]
pub struct InputBuffer {
    direction: Option<Direction>,
    controls: VecDeque<Command>,
}

/// Everything to apply at one tick boundary
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PendingInput {
    pub controls: Vec<Command>,
    pub direction: Option<Direction>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        if command.is_control() {
            self.controls.push_back(command);
        } else if let Command::Move(direction) = command {
            self.direction = Some(direction);
        }
    }

    /// Take everything buffered since the last boundary
    pub fn drain(&mut self) -> PendingInput {
        PendingInput {
            controls: self.controls.drain(..).collect(),
            direction: self.direction.take(),
        }
    }
}
