use alloc::string::{String, ToString};

use super::{AccessStateMachine, UiEffect};
use crate::ui::{input::Button, render::ClockView};

const UNSET_TIME: &str = "--:--:--";

impl AccessStateMachine {
    pub(super) fn handle_clock(&mut self, button: Button) -> UiEffect {
        match button {
            Button::Left | Button::Set | Button::Click => self.go_home(),
            _ => UiEffect::None,
        }
    }

    pub(super) fn render_clock(&self) -> ClockView {
        ClockView {
            time: self
                .collaborators
                .clock
                .now()
                .map(|time| time.to_string())
                .unwrap_or_else(|| String::from(UNSET_TIME)),
        }
    }
}
