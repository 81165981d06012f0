//! Cooperative control loop tying buttons, the state machine and the display together.
use alloc::{boxed::Box, vec::Vec};
use log::debug;

use crate::ui::{
    AccessStateMachine, ButtonLevels, ButtonPoller, DisplaySurface, Frame, PinPolarity, UiEffect,
};

/// Single-threaded device driver.
///
/// Each [`poll_once`](Device::poll_once) samples the pins, feeds every new press through the state
/// machine in order and pushes a frame to the display only when it differs from the last one.
pub struct Device {
    machine: AccessStateMachine,
    poller: ButtonPoller,
    display: Box<dyn DisplaySurface>,
    last_frame: Option<Frame>,
}

impl Device {
    pub fn new(
        machine: AccessStateMachine,
        polarity: PinPolarity,
        display: Box<dyn DisplaySurface>,
    ) -> Self {
        Self {
            machine,
            poller: ButtonPoller::new(polarity),
            display,
            last_frame: None,
        }
    }

    /// Show the initial frame.
    pub fn start(&mut self) {
        self.refresh();
    }

    pub fn poll_once(&mut self, levels: &ButtonLevels) -> Vec<UiEffect> {
        let presses = self.poller.poll(levels);
        let mut effects = Vec::with_capacity(presses.len());
        for button in presses {
            let effect = self.machine.handle(button);
            debug!("{button} -> {effect:?}");
            effects.push(effect);
        }
        self.refresh();
        effects
    }

    /// Lock immediately, e.g. on an idle timeout or before power-off.
    pub fn lock(&mut self) -> UiEffect {
        let effect = self.machine.lock();
        self.refresh();
        effect
    }

    pub fn machine(&self) -> &AccessStateMachine {
        &self.machine
    }

    pub fn polarity(&self) -> PinPolarity {
        self.poller.polarity()
    }

    fn refresh(&mut self) {
        let frame = self.machine.render();
        if self.last_frame.as_ref() == Some(&frame) {
            return;
        }
        self.display.show(&frame);
        self.last_frame = Some(frame);
    }
}
