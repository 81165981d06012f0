#![cfg(test)]

use alloc::{boxed::Box, rc::Rc, string::String, vec::Vec};
use core::cell::{Cell, RefCell};

use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use shared::gesture::{Direction, Gesture};
use shared::vault::Record;

use super::{AccessStateMachine, Collaborators, UiEffect};
use crate::config::DeviceConfig;
use crate::generator::CharsetGenerator;
use crate::storage::{MemoryBackend, VaultStore};
use crate::ui::{AutoType, AutoTypeError, Clock, WallTime, input::Button};

/// Unlock gesture of [`DeviceConfig::default`].
pub(super) const GESTURE: &str = "up,down,up,down,up";
pub(super) const CLOCK_TEXT: &str = "2024-05-17 08:30:00";

#[derive(Clone, Default)]
pub(super) struct RecordingKeyboard {
    typed: Rc<RefCell<Vec<String>>>,
    disconnected: Rc<Cell<bool>>,
}

impl AutoType for RecordingKeyboard {
    fn type_text(&mut self, text: &str) -> Result<(), AutoTypeError> {
        if self.disconnected.get() {
            return Err(AutoTypeError::Unavailable);
        }
        self.typed.borrow_mut().push(String::from(text));
        Ok(())
    }
}

#[derive(Clone)]
pub(super) struct FixedClock {
    available: Rc<Cell<bool>>,
}

impl Clock for FixedClock {
    fn now(&self) -> Option<WallTime> {
        self.available.get().then_some(WallTime {
            year: 2024,
            month: 5,
            day: 17,
            hour: 8,
            minute: 30,
            second: 0,
        })
    }
}

pub(super) struct Harness {
    pub machine: AccessStateMachine,
    keyboard: RecordingKeyboard,
    clock: FixedClock,
}

impl Harness {
    pub(super) fn new(backend: MemoryBackend) -> Self {
        Self::with_config(backend, DeviceConfig::default())
    }

    pub(super) fn with_config(backend: MemoryBackend, config: DeviceConfig) -> Self {
        let keyboard = RecordingKeyboard::default();
        let clock = FixedClock {
            available: Rc::new(Cell::new(true)),
        };
        let collaborators = Collaborators {
            auto_type: Box::new(keyboard.clone()),
            clock: Box::new(clock.clone()),
            generator: Box::new(CharsetGenerator::new(ChaCha20Rng::from_seed([7u8; 32]))),
            rng: Box::new(ChaCha20Rng::from_seed([1u8; 32])),
        };
        let machine = AccessStateMachine::open(Box::new(backend), config, collaborators)
            .expect("open state machine");

        Self {
            machine,
            keyboard,
            clock,
        }
    }

    pub(super) fn unlock(&mut self) {
        let effect = enter_gesture(&mut self.machine, GESTURE);
        assert!(
            matches!(effect, UiEffect::Unlocked { .. }),
            "unlock failed: {effect:?}"
        );
    }

    pub(super) fn press(&mut self, buttons: &[Button]) {
        for button in buttons {
            self.machine.handle(*button);
        }
    }

    pub(super) fn typed(&self) -> Vec<String> {
        self.keyboard.typed.borrow().clone()
    }

    pub(super) fn keyboard_connected(&self, connected: bool) {
        self.keyboard.disconnected.set(!connected);
    }

    pub(super) fn clock_available(&self, available: bool) {
        self.clock.available.set(available);
    }
}

pub(super) fn button_for(direction: Direction) -> Button {
    match direction {
        Direction::Up => Button::Up,
        Direction::Down => Button::Down,
        Direction::Left => Button::Left,
        Direction::Right => Button::Right,
        Direction::Click => Button::Click,
    }
}

/// Press the buttons of a textual gesture and return the effect of the last press.
pub(super) fn enter_gesture(machine: &mut AccessStateMachine, gesture: &str) -> UiEffect {
    let gesture: Gesture = gesture.parse().expect("valid gesture");
    let mut effect = UiEffect::None;
    for direction in gesture.directions() {
        effect = machine.handle(button_for(direction));
    }
    effect
}

/// Backend whose vault already holds `records`, encrypted under [`GESTURE`].
pub(super) fn seeded_backend(records: &[Record]) -> MemoryBackend {
    let backend = MemoryBackend::new();
    let mut rng = ChaCha20Rng::from_seed([2u8; 32]);
    let mut store = VaultStore::open(
        Box::new(backend.clone()),
        &DeviceConfig::default(),
        &mut rng,
    )
    .expect("open store");
    let gesture: Gesture = GESTURE.parse().expect("valid gesture");
    store.save(records, &gesture, &mut rng).expect("seed vault");
    backend
}
