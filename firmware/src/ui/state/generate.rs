use alloc::string::String;
use shared::vault::SecretString;

use super::{AccessStateMachine, UiEffect, widgets};
use crate::ui::{Complexity, input::Button, render::GenerateView};

const MEDIUM_LENGTH: usize = 12;
const HIGH_LENGTH: usize = 14;

pub(super) struct GenerateState {
    password: Option<SecretString>,
    complexity: Option<Complexity>,
}

impl GenerateState {
    pub(super) const fn new() -> Self {
        Self {
            password: None,
            complexity: None,
        }
    }

    pub(super) fn clear(&mut self) {
        self.password = None;
        self.complexity = None;
    }
}

impl AccessStateMachine {
    pub(super) fn handle_generate(&mut self, button: Button) -> UiEffect {
        match button {
            Button::Click | Button::Down | Button::Reset => {
                self.generate_password(MEDIUM_LENGTH, Complexity::Medium)
            }
            Button::Up => self.generate_password(HIGH_LENGTH, Complexity::High),
            Button::Right => match self.generate.password.as_ref() {
                Some(password) => widgets::type_out(
                    self.collaborators.auto_type.as_mut(),
                    &mut self.status,
                    password,
                ),
                None => UiEffect::None,
            },
            Button::Left | Button::Set => {
                self.generate.clear();
                self.go_home()
            }
        }
    }

    fn generate_password(&mut self, length: usize, complexity: Complexity) -> UiEffect {
        self.generate.password = Some(self.collaborators.generator.generate(length, complexity));
        self.generate.complexity = Some(complexity);
        UiEffect::Generated
    }

    pub(super) fn render_generate(&self) -> GenerateView {
        GenerateView {
            password: self
                .generate
                .password
                .as_ref()
                .map(|password| String::from(password.as_str())),
            complexity: self
                .generate
                .complexity
                .map(|complexity| String::from(complexity.label())),
        }
    }
}
