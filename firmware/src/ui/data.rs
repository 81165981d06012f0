use core::fmt;

use serde::{Deserialize, Serialize};
use shared::vault::SecretString;
use thiserror::Error;

use super::render::Frame;

/// Output device for rendered frames. Pixel drawing lives behind this trait.
pub trait DisplaySurface {
    fn show(&mut self, frame: &Frame);
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AutoTypeError {
    #[error("no keyboard host connected")]
    Unavailable,
    #[error("keystroke injection failed")]
    Failed,
}

/// Keystroke injection towards the connected host.
pub trait AutoType {
    fn type_text(&mut self, text: &str) -> Result<(), AutoTypeError>;
}

/// Calendar time as reported by the real-time clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Read-only clock. `None` when the peripheral is missing or not set.
pub trait Clock {
    fn now(&self) -> Option<WallTime>;
}

/// Character classes drawn on by the password generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// Letters only.
    Low,
    /// Letters and digits.
    Medium,
    /// Letters, digits and symbols.
    High,
}

impl Complexity {
    pub const fn label(self) -> &'static str {
        match self {
            Complexity::Low => "Low",
            Complexity::Medium => "Medium",
            Complexity::High => "High",
        }
    }
}

pub trait PasswordGenerator {
    fn generate(&mut self, length: usize, complexity: Complexity) -> SecretString;
}
