//! Salt provisioning, key derivation parameters and the re-authentication guard.
use log::{info, warn};
use rand_core::{CryptoRng, RngCore};
use shared::config::ConfigError;
use shared::gesture::Gesture;
use shared::kdf::{self, DerivedKey, Salt};

use crate::storage::{BackendError, VaultBackend};

/// Where the active salt came from during [`provision_salt`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaltSource {
    Loaded,
    /// No salt was stored yet.
    Generated,
    /// The stored salt had the wrong length and was replaced.
    Replaced,
}

/// Load the persisted salt or create and persist a new one.
///
/// A salt that cannot be written is fatal: records encrypted under an unsaved salt would be
/// unreadable after the next restart.
pub fn provision_salt<R>(
    backend: &mut dyn VaultBackend,
    rng: &mut R,
) -> Result<(Salt, SaltSource), BackendError>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let source = match backend.read_salt()? {
        Some(bytes) => match Salt::from_slice(&bytes) {
            Ok(salt) => return Ok((salt, SaltSource::Loaded)),
            Err(err) => {
                warn!("stored salt rejected ({err}); generating a new one");
                SaltSource::Replaced
            }
        },
        None => SaltSource::Generated,
    };

    let salt = Salt::generate(rng);
    backend.write_salt(salt.as_bytes())?;
    info!("salt provisioned ({source:?})");
    Ok((salt, source))
}

/// Inputs to key derivation that stay fixed for the lifetime of a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyMaterial {
    salt: Salt,
    iterations: u32,
}

impl KeyMaterial {
    pub const fn new(salt: Salt, iterations: u32) -> Self {
        Self { salt, iterations }
    }

    pub const fn salt(&self) -> &Salt {
        &self.salt
    }

    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Derive a short-lived key for `gesture`. Callers drop it after one load or save cycle.
    pub fn derive(&self, gesture: &Gesture) -> Result<DerivedKey, ConfigError> {
        kdf::derive(gesture, &self.salt, self.iterations)
    }
}

/// Result of a failed re-authentication attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReauthOutcome {
    Retry { remaining: u8 },
    Lockout,
}

/// Counts consecutive failed gesture confirmations inside an unlocked session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReauthGuard {
    failures: u8,
    limit: u8,
}

impl ReauthGuard {
    pub const fn new(limit: u8) -> Self {
        Self { failures: 0, limit }
    }

    pub fn register_success(&mut self) {
        self.failures = 0;
    }

    pub fn register_failure(&mut self) -> ReauthOutcome {
        self.failures = self.failures.saturating_add(1);
        if self.failures >= self.limit {
            ReauthOutcome::Lockout
        } else {
            ReauthOutcome::Retry {
                remaining: self.limit - self.failures,
            }
        }
    }

    pub const fn remaining(&self) -> u8 {
        self.limit.saturating_sub(self.failures)
    }

    pub fn reset(&mut self) {
        self.failures = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;
    use shared::kdf::SALT_LEN;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::from_seed([0x5A; 32])
    }

    #[test]
    fn missing_salt_is_generated_and_persisted() {
        let mut backend = MemoryBackend::new();
        let (salt, source) = provision_salt(&mut backend, &mut rng()).unwrap();

        assert_eq!(source, SaltSource::Generated);
        assert_eq!(backend.salt_bytes().as_deref(), Some(&salt.as_bytes()[..]));
    }

    #[test]
    fn stored_salt_is_reused() {
        let mut backend = MemoryBackend::new().with_salt(&[9u8; SALT_LEN]);
        let (salt, source) = provision_salt(&mut backend, &mut rng()).unwrap();

        assert_eq!(source, SaltSource::Loaded);
        assert_eq!(salt.as_bytes(), &[9u8; SALT_LEN]);
    }

    #[test]
    fn malformed_salt_is_replaced() {
        let mut backend = MemoryBackend::new().with_salt(&[1u8; 7]);
        let (salt, source) = provision_salt(&mut backend, &mut rng()).unwrap();

        assert_eq!(source, SaltSource::Replaced);
        assert_eq!(backend.salt_bytes().map(|bytes| bytes.len()), Some(SALT_LEN));
        assert_eq!(backend.salt_bytes().as_deref(), Some(&salt.as_bytes()[..]));
    }

    #[test]
    fn salt_write_failure_is_fatal() {
        let mut backend = MemoryBackend::new();
        backend.fail_writes(true);

        assert!(provision_salt(&mut backend, &mut rng()).is_err());
    }

    #[test]
    fn guard_locks_out_at_limit() {
        let mut guard = ReauthGuard::new(3);

        assert_eq!(guard.register_failure(), ReauthOutcome::Retry { remaining: 2 });
        guard.register_success();
        assert_eq!(guard.remaining(), 3);
        assert_eq!(guard.register_failure(), ReauthOutcome::Retry { remaining: 2 });
        assert_eq!(guard.register_failure(), ReauthOutcome::Retry { remaining: 1 });
        assert_eq!(guard.register_failure(), ReauthOutcome::Lockout);
    }
}
