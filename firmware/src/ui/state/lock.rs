use alloc::{format, string::String};
use core::mem;
use log::debug;
use shared::gesture::{Direction, Gesture};

use super::{AccessStateMachine, UiEffect};
use crate::ui::{input::Button, render::LockView};

/// Gesture capture buffer used by the lock screen and delete confirmation.
pub(super) struct GestureEntry {
    buffer: Gesture,
}

impl GestureEntry {
    pub(super) fn new() -> Self {
        Self {
            buffer: Gesture::new(),
        }
    }

    /// Append a symbol. Returns the complete attempt once `required` symbols are captured,
    /// leaving the buffer empty.
    pub(super) fn push(&mut self, direction: Direction, required: usize) -> Option<Gesture> {
        self.buffer.push(direction);
        if self.buffer.len() < required {
            return None;
        }
        Some(mem::take(&mut self.buffer))
    }

    pub(super) fn entered(&self) -> usize {
        self.buffer.len()
    }

    pub(super) fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl AccessStateMachine {
    pub(super) fn handle_lock(&mut self, button: Button) -> UiEffect {
        let Some(direction) = button.direction() else {
            if button == Button::Set {
                self.lock.clear();
            }
            return UiEffect::None;
        };

        let Some(attempt) = self.lock.push(direction, self.config.gesture_len()) else {
            return UiEffect::None;
        };
        if !attempt.matches(&self.config.expected_gesture) {
            debug!("unlock gesture rejected");
            return UiEffect::GestureRejected;
        }
        self.start_session(attempt)
    }

    pub(super) fn render_lock(&self) -> LockView {
        LockView {
            prompt: String::from("Enter unlock gesture"),
            entered: self.lock.entered(),
            required: self.config.gesture_len(),
            time: self
                .collaborators
                .clock
                .now()
                .map(|now| format!("{:02}:{:02}", now.hour, now.minute)),
        }
    }
}
