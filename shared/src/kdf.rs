//! Gesture-based key derivation.
//!
//! PBKDF2 with HMAC-SHA-256 as the pseudorandom function. The gesture codes act as the
//! password and the stored salt is concatenated with the big-endian block counter. Only the
//! first block is ever needed because the key is shorter than one digest.
use core::fmt;
use hmac::{Hmac, Mac};
use rand_core::{CryptoRng, RngCore};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::config::ConfigError;
use crate::gesture::Gesture;

pub const KEY_LEN: usize = 16;
pub const SALT_LEN: usize = 16;
pub const DEFAULT_ITERATIONS: u32 = 32;

const DIGEST_LEN: usize = 32;

type HmacSha256 = Hmac<Sha256>;

/// Random value mixed into every derivation. Not secret.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    pub const fn new(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }

    /// Accept persisted salt bytes, rejecting anything that is not exactly [`SALT_LEN`] long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        let array: [u8; SALT_LEN] = bytes.try_into().map_err(|_| ConfigError::SaltLength {
            expected: SALT_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(array))
    }

    pub fn generate<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; SALT_LEN];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({})", hex::encode(self.0))
    }
}

/// Symmetric record key. Wiped when dropped and never persisted.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Validate derivation inputs without computing anything.
pub fn check_parameters(gesture: &Gesture, iterations: u32) -> Result<(), ConfigError> {
    if iterations < 1 {
        return Err(ConfigError::InvalidIterations(iterations));
    }
    if gesture.is_empty() {
        return Err(ConfigError::EmptyGesture);
    }
    Ok(())
}

/// Derive the record key for `gesture` under `salt`.
pub fn derive(gesture: &Gesture, salt: &Salt, iterations: u32) -> Result<DerivedKey, ConfigError> {
    check_parameters(gesture, iterations)?;
    log::trace!("deriving key with {iterations} iterations");

    let block = pbkdf2_first_block(gesture.as_bytes(), salt.as_bytes(), iterations);
    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&block[..KEY_LEN]);
    Ok(DerivedKey(key))
}

fn pbkdf2_first_block(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Zeroizing<[u8; DIGEST_LEN]> {
    let prf = HmacSha256::new_from_slice(password).expect("HMAC accepts keys of any length");

    let mut seed = prf.clone();
    seed.update(salt);
    seed.update(&1u32.to_be_bytes());

    let mut block = Zeroizing::new([0u8; DIGEST_LEN]);
    block.copy_from_slice(&seed.finalize().into_bytes());
    let mut accumulated = Zeroizing::new(*block);

    for _ in 1..iterations {
        let mut round = prf.clone();
        round.update(&block[..]);
        block.copy_from_slice(&round.finalize().into_bytes());
        accumulated
            .iter_mut()
            .zip(block.iter())
            .for_each(|(acc, byte)| *acc ^= byte);
    }

    accumulated
}
