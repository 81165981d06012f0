use alloc::{string::ToString, vec::Vec};
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use shared::gesture::{Direction, ParseGestureError};

pub const BUTTON_COUNT: usize = 7;

/// Logical buttons on the device front panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Click,
    /// Back / cancel.
    Set,
    /// Secondary action: type-out, finish field, triple-press lock.
    Reset,
}

impl Button {
    pub const ALL: [Button; BUTTON_COUNT] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Click,
        Button::Set,
        Button::Reset,
    ];

    /// Gesture symbol produced by this button, if any.
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Button::Up => Some(Direction::Up),
            Button::Down => Some(Direction::Down),
            Button::Left => Some(Direction::Left),
            Button::Right => Some(Direction::Right),
            Button::Click => Some(Direction::Click),
            Button::Set | Button::Reset => None,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
            Button::Click => "click",
            Button::Set => "set",
            Button::Reset => "reset",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Button {
    type Err = ParseGestureError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let symbol = value.trim();
        if symbol.eq_ignore_ascii_case("set") || symbol.eq_ignore_ascii_case("back") {
            return Ok(Button::Set);
        }
        if symbol.eq_ignore_ascii_case("reset") {
            return Ok(Button::Reset);
        }
        match symbol.parse::<Direction>() {
            Ok(Direction::Up) => Ok(Button::Up),
            Ok(Direction::Down) => Ok(Button::Down),
            Ok(Direction::Left) => Ok(Button::Left),
            Ok(Direction::Right) => Ok(Button::Right),
            Ok(Direction::Click) => Ok(Button::Click),
            Err(_) => Err(ParseGestureError(symbol.to_string())),
        }
    }
}

/// Electrical level that means "pressed".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PinPolarity {
    /// Pull-up inputs: a pressed button reads low.
    #[default]
    ActiveLow,
    ActiveHigh,
}

impl PinPolarity {
    pub const fn is_pressed(self, level: bool) -> bool {
        match self {
            PinPolarity::ActiveLow => !level,
            PinPolarity::ActiveHigh => level,
        }
    }

    pub const fn level_for(self, pressed: bool) -> bool {
        match self {
            PinPolarity::ActiveLow => !pressed,
            PinPolarity::ActiveHigh => pressed,
        }
    }
}

/// Raw pin levels sampled in one poll, indexed in [`Button::ALL`] order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonLevels {
    levels: [bool; BUTTON_COUNT],
}

impl ButtonLevels {
    pub const fn from_raw(levels: [bool; BUTTON_COUNT]) -> Self {
        Self { levels }
    }

    /// Levels with every button released.
    pub const fn idle(polarity: PinPolarity) -> Self {
        Self {
            levels: [polarity.level_for(false); BUTTON_COUNT],
        }
    }

    /// Levels with exactly `button` held down.
    pub fn pressed(polarity: PinPolarity, button: Button) -> Self {
        let mut levels = Self::idle(polarity);
        levels.set(button, polarity.level_for(true));
        levels
    }

    pub fn set(&mut self, button: Button, level: bool) {
        self.levels[button.index()] = level;
    }

    pub const fn level(&self, button: Button) -> bool {
        self.levels[button.index()]
    }
}

/// Converts sampled levels into one logical press per physical press.
///
/// A press is emitted on the released → pressed transition only, so holding a button or
/// sampling it repeatedly while held never repeats it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonPoller {
    polarity: PinPolarity,
    held: [bool; BUTTON_COUNT],
}

impl ButtonPoller {
    pub const fn new(polarity: PinPolarity) -> Self {
        Self {
            polarity,
            held: [false; BUTTON_COUNT],
        }
    }

    pub const fn polarity(&self) -> PinPolarity {
        self.polarity
    }

    /// Sample one set of levels and return newly pressed buttons in [`Button::ALL`] order.
    pub fn poll(&mut self, levels: &ButtonLevels) -> Vec<Button> {
        let mut presses = Vec::new();
        for button in Button::ALL {
            let pressed = self.polarity.is_pressed(levels.level(button));
            let was_held = core::mem::replace(&mut self.held[button.index()], pressed);
            if pressed && !was_held {
                presses.push(button);
            }
        }
        presses
    }
}
