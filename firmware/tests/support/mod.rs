#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use firmware::generator::{CHARACTER_SETS, CharsetGenerator};
use firmware::ui::{
    AutoType, AutoTypeError, Button, Clock, Collaborators, DisplaySurface, Frame, WallTime,
};
use firmware::{AccessStateMachine, DeviceConfig, MemoryBackend, UiEffect};
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use shared::gesture::Gesture;

pub const GESTURE: &str = "up,down,up,down,up";

#[derive(Clone, Default)]
pub struct RecordingKeyboard {
    pub typed: Rc<RefCell<Vec<String>>>,
}

impl AutoType for RecordingKeyboard {
    fn type_text(&mut self, text: &str) -> Result<(), AutoTypeError> {
        self.typed.borrow_mut().push(text.to_owned());
        Ok(())
    }
}

pub struct NoClock;

impl Clock for NoClock {
    fn now(&self) -> Option<WallTime> {
        None
    }
}

#[derive(Clone, Default)]
pub struct RecordingDisplay {
    pub frames: Rc<RefCell<Vec<Frame>>>,
}

impl DisplaySurface for RecordingDisplay {
    fn show(&mut self, frame: &Frame) {
        self.frames.borrow_mut().push(frame.clone());
    }
}

pub fn collaborators(seed: u8, keyboard: RecordingKeyboard) -> Collaborators {
    Collaborators {
        auto_type: Box::new(keyboard),
        clock: Box::new(NoClock),
        generator: Box::new(CharsetGenerator::new(ChaCha20Rng::from_seed([seed ^ 0xFF; 32]))),
        rng: Box::new(ChaCha20Rng::from_seed([seed; 32])),
    }
}

/// Fresh state machine over `backend`, as after a device restart.
pub fn boot(backend: &MemoryBackend, seed: u8) -> AccessStateMachine {
    AccessStateMachine::open(
        Box::new(backend.clone()),
        DeviceConfig::default(),
        collaborators(seed, RecordingKeyboard::default()),
    )
    .expect("boot device")
}

pub fn button_for(symbol: &str) -> Button {
    symbol.parse().expect("known button")
}

pub fn enter_gesture(machine: &mut AccessStateMachine, gesture: &str) -> UiEffect {
    let gesture: Gesture = gesture.parse().expect("valid gesture");
    let mut effect = UiEffect::None;
    for direction in gesture.directions() {
        effect = machine.handle(button_for(direction.as_str()));
    }
    effect
}

pub fn press_all(machine: &mut AccessStateMachine, buttons: &[Button]) -> Vec<UiEffect> {
    buttons.iter().map(|button| machine.handle(*button)).collect()
}

/// Enter `text` on the add-record screen. `charset` tracks the active character set index,
/// which carries over between fields. The cursor is returned to the start of its set after every
/// character.
pub fn type_field(machine: &mut AccessStateMachine, charset: &mut usize, text: &str) {
    for target in text.chars() {
        let wanted = CHARACTER_SETS
            .iter()
            .position(|(_, set)| set.contains(target))
            .expect("character offered on the device");
        while *charset != wanted {
            machine.handle(Button::Right);
            *charset = (*charset + 1) % CHARACTER_SETS.len();
        }

        let steps = CHARACTER_SETS[wanted]
            .1
            .chars()
            .position(|c| c == target)
            .expect("character in set");
        for _ in 0..steps {
            machine.handle(Button::Up);
        }
        machine.handle(Button::Click);
        for _ in 0..steps {
            machine.handle(Button::Down);
        }
    }
}
