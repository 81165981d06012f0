//! Character sets and the reference password generator.
use alloc::string::String;

use rand_core::{CryptoRng, RngCore};
use shared::vault::SecretString;
use zeroize::Zeroizing;

use crate::ui::{Complexity, PasswordGenerator};

pub const LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
pub const DIGITS: &str = "0123456789";
/// Printable symbols offered for secrets. Never contains the vault field delimiter.
pub const SYMBOLS: &str = "!@#$%^&*()-=_+.:/?~";

/// Sets the add-record screen cycles through, in LEFT/RIGHT order.
pub const CHARACTER_SETS: [(&str, &str); 3] =
    [("ABC", LETTERS), ("123", DIGITS), ("#!?", SYMBOLS)];

/// Draws every character uniformly from the alphabet implied by the complexity.
pub struct CharsetGenerator<R> {
    rng: R,
}

impl<R: RngCore + CryptoRng> CharsetGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn pick(&mut self, alphabet: &[u8]) -> u8 {
        let len = alphabet.len() as u32;
        // Reject the tail of the u32 range so every index is equally likely.
        let zone = u32::MAX - (u32::MAX % len);
        loop {
            let value = self.rng.next_u32();
            if value < zone {
                return alphabet[(value % len) as usize];
            }
        }
    }
}

fn alphabet(complexity: Complexity) -> Zeroizing<String> {
    let mut alphabet = Zeroizing::new(String::from(LETTERS));
    if matches!(complexity, Complexity::Medium | Complexity::High) {
        alphabet.push_str(DIGITS);
    }
    if complexity == Complexity::High {
        alphabet.push_str(SYMBOLS);
    }
    alphabet
}

impl<R: RngCore + CryptoRng> PasswordGenerator for CharsetGenerator<R> {
    fn generate(&mut self, length: usize, complexity: Complexity) -> SecretString {
        let alphabet = alphabet(complexity);
        let mut password = Zeroizing::new(String::with_capacity(length));
        for _ in 0..length {
            password.push(char::from(self.pick(alphabet.as_bytes())));
        }
        SecretString(password)
    }
}
