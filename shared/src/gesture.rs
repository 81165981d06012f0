//! Unlock gestures: ordered sequences of directional button symbols.
use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Gesture length used by the reference device.
pub const DEFAULT_GESTURE_LEN: usize = 5;

/// Symbols a gesture is composed of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Click,
}

impl Direction {
    pub const ALL: [Direction; 5] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Click,
    ];

    /// Byte fed into key derivation for this symbol.
    pub const fn code(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
            Direction::Click => 4,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            4 => Some(Direction::Click),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Click => "click",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a textual gesture contains an unknown symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown gesture symbol '{0}'")]
pub struct ParseGestureError(pub String);

impl FromStr for Direction {
    type Err = ParseGestureError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let symbol = value.trim();
        let parsed = if symbol.eq_ignore_ascii_case("up") || symbol.eq_ignore_ascii_case("u") {
            Direction::Up
        } else if symbol.eq_ignore_ascii_case("down") || symbol.eq_ignore_ascii_case("d") {
            Direction::Down
        } else if symbol.eq_ignore_ascii_case("left") || symbol.eq_ignore_ascii_case("l") {
            Direction::Left
        } else if symbol.eq_ignore_ascii_case("right") || symbol.eq_ignore_ascii_case("r") {
            Direction::Right
        } else if symbol.eq_ignore_ascii_case("click") || symbol.eq_ignore_ascii_case("c") {
            Direction::Click
        } else {
            return Err(ParseGestureError(symbol.to_string()));
        };
        Ok(parsed)
    }
}

/// Ordered gesture buffer.
///
/// Symbols are kept as their derivation codes so the buffer can be wiped with [`Zeroize`].
/// Equality never exits early on the first differing symbol.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
#[serde(from = "Vec<Direction>", into = "Vec<Direction>")]
pub struct Gesture {
    codes: Vec<u8>,
}

impl Gesture {
    pub const fn new() -> Self {
        Self { codes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            codes: Vec::with_capacity(capacity),
        }
    }

    pub fn from_directions<I>(directions: I) -> Self
    where
        I: IntoIterator<Item = Direction>,
    {
        Self {
            codes: directions.into_iter().map(Direction::code).collect(),
        }
    }

    pub fn push(&mut self, direction: Direction) {
        self.codes.push(direction.code());
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Drop every captured symbol, wiping the buffer.
    pub fn clear(&mut self) {
        self.codes.zeroize();
    }

    /// Bytes fed to the key derivation function.
    pub fn as_bytes(&self) -> &[u8] {
        &self.codes
    }

    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.codes.iter().filter_map(|code| Direction::from_code(*code))
    }

    /// Compare against another gesture without short-circuiting on the first mismatch.
    pub fn matches(&self, other: &Gesture) -> bool {
        if self.codes.len() != other.codes.len() {
            return false;
        }
        let diff = self
            .codes
            .iter()
            .zip(other.codes.iter())
            .fold(0u8, |acc, (left, right)| acc | (left ^ right));
        diff == 0
    }
}

impl PartialEq for Gesture {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl Eq for Gesture {}

impl fmt::Debug for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gesture(len={})", self.codes.len())
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, direction) in self.directions().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            f.write_str(direction.as_str())?;
        }
        Ok(())
    }
}

impl From<Vec<Direction>> for Gesture {
    fn from(value: Vec<Direction>) -> Self {
        Self::from_directions(value)
    }
}

impl From<Gesture> for Vec<Direction> {
    fn from(value: Gesture) -> Self {
        value.directions().collect()
    }
}

impl FromStr for Gesture {
    type Err = ParseGestureError;

    /// Parse a comma or whitespace separated list such as `up,down,up,down,up`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut gesture = Gesture::new();
        for symbol in value
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|symbol| !symbol.is_empty())
        {
            gesture.push(symbol.parse()?);
        }
        Ok(gesture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Gesture {
        Gesture::from_directions([
            Direction::Up,
            Direction::Down,
            Direction::Up,
            Direction::Down,
            Direction::Up,
        ])
    }

    #[test]
    fn parses_names_and_shorthand() {
        let long: Gesture = "up,down,up,down,up".parse().unwrap();
        let short: Gesture = "U D u d U".parse().unwrap();

        assert_eq!(long, reference());
        assert_eq!(short, reference());
        assert_eq!(long.to_string(), "up,down,up,down,up");
    }

    #[test]
    fn rejects_unknown_symbol() {
        let err = "up,sideways".parse::<Gesture>().unwrap_err();
        assert_eq!(err, ParseGestureError(String::from("sideways")));
    }

    #[test]
    fn equality_requires_same_length_and_symbols() {
        let mut prefix = reference();
        prefix.codes.pop();

        assert!(!reference().matches(&prefix));
        assert!(!reference().matches(&Gesture::from_directions([Direction::Click; 5])));
        assert!(reference().matches(&reference()));
    }

    #[test]
    fn codes_follow_direction_order() {
        let all = Gesture::from_directions(Direction::ALL);
        assert_eq!(all.as_bytes(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn clear_empties_buffer() {
        let mut gesture = reference();
        gesture.clear();
        assert!(gesture.is_empty());
    }

    #[test]
    fn serde_uses_direction_names() {
        let json = serde_json::to_string(&reference()).unwrap();
        assert_eq!(json, r#"["up","down","up","down","up"]"#);

        let parsed: Gesture = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reference());
    }
}
