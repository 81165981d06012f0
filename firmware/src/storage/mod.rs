//! Vault persistence: backend abstraction, the in-memory backend and the record store.
use alloc::{boxed::Box, rc::Rc, string::String, vec::Vec};
use core::cell::RefCell;

use log::{debug, info, warn};
use rand_core::{CryptoRng, RngCore};
use shared::config::ConfigError;
use shared::gesture::Gesture;
use shared::vault::format::{self, EncryptedRecord, LineError, RawLine};
use shared::vault::{CipherError, Record, RecordCipher, SecretString};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::DeviceConfig;
use crate::crypto::{KeyMaterial, SaltSource, provision_salt};

/// Failure reported by a [`VaultBackend`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("read failed: {0}")]
    Read(String),
    #[error("write failed: {0}")]
    Write(String),
}

/// Byte-level access to the vault and salt files.
///
/// `Ok(None)` from a read means the file does not exist yet.
pub trait VaultBackend {
    fn read_vault(&self) -> Result<Option<Vec<u8>>, BackendError>;

    /// Replace the vault contents. Readers observe either the old or the new file, never a mix.
    fn write_vault(&mut self, contents: &[u8]) -> Result<(), BackendError>;

    fn read_salt(&self) -> Result<Option<Vec<u8>>, BackendError>;

    fn write_salt(&mut self, salt: &[u8]) -> Result<(), BackendError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    vault: Option<Vec<u8>>,
    salt: Option<Vec<u8>>,
    fail_reads: bool,
    fail_writes: bool,
    vault_writes: usize,
}

/// RAM-backed storage. Clones share the same files so a test can keep a handle after handing a
/// clone to the store.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vault(self, contents: &[u8]) -> Self {
        self.state.borrow_mut().vault = Some(contents.to_vec());
        self
    }

    pub fn with_salt(self, salt: &[u8]) -> Self {
        self.state.borrow_mut().salt = Some(salt.to_vec());
        self
    }

    pub fn vault_contents(&self) -> Option<Vec<u8>> {
        self.state.borrow().vault.clone()
    }

    pub fn salt_bytes(&self) -> Option<Vec<u8>> {
        self.state.borrow().salt.clone()
    }

    /// Number of successful vault writes so far.
    pub fn vault_writes(&self) -> usize {
        self.state.borrow().vault_writes
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.borrow_mut().fail_reads = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }
}

impl VaultBackend for MemoryBackend {
    fn read_vault(&self) -> Result<Option<Vec<u8>>, BackendError> {
        let state = self.state.borrow();
        if state.fail_reads {
            return Err(BackendError::Read(String::from("injected read failure")));
        }
        Ok(state.vault.clone())
    }

    fn write_vault(&mut self, contents: &[u8]) -> Result<(), BackendError> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(BackendError::Write(String::from("injected write failure")));
        }
        state.vault = Some(contents.to_vec());
        state.vault_writes += 1;
        Ok(())
    }

    fn read_salt(&self) -> Result<Option<Vec<u8>>, BackendError> {
        let state = self.state.borrow();
        if state.fail_reads {
            return Err(BackendError::Read(String::from("injected read failure")));
        }
        Ok(state.salt.clone())
    }

    fn write_salt(&mut self, salt: &[u8]) -> Result<(), BackendError> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(BackendError::Write(String::from("injected write failure")));
        }
        state.salt = Some(salt.to_vec());
        Ok(())
    }
}

/// Why a vault line was left out of the unlocked record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("malformed line: {0}")]
    Malformed(#[from] LineError),
    #[error("secret not decryptable: {0}")]
    Cipher(#[from] CipherError),
    #[error("secret is not valid UTF-8")]
    Utf8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedLine {
    pub number: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("salt storage failed: {0}")]
    Salt(BackendError),
    #[error("vault could not be saved: {0}")]
    Storage(BackendError),
    #[error("no record could be decrypted ({} lines skipped)", .skipped.len())]
    NothingDecryptable { skipped: Vec<SkippedLine> },
    #[error("record {index} cannot be stored: {error}")]
    Encode { index: usize, error: LineError },
    #[error("encryption failed: {0}")]
    Cipher(#[from] CipherError),
}

/// Records recovered by [`VaultStore::unlock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unlocked {
    pub records: Vec<Record>,
    pub skipped: Vec<SkippedLine>,
}

/// Encrypted record file plus the key material needed to open it.
pub struct VaultStore {
    backend: Box<dyn VaultBackend>,
    keys: KeyMaterial,
    salt_source: SaltSource,
    retained: Vec<RawLine>,
}

impl VaultStore {
    /// Validate `config`, then load or provision the salt.
    pub fn open<R>(
        mut backend: Box<dyn VaultBackend>,
        config: &DeviceConfig,
        rng: &mut R,
    ) -> Result<Self, VaultError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        config.validate()?;
        let (salt, salt_source) =
            provision_salt(backend.as_mut(), rng).map_err(VaultError::Salt)?;

        let store = Self {
            backend,
            keys: KeyMaterial::new(salt, config.iterations),
            salt_source,
            retained: Vec::new(),
        };
        if salt_source != SaltSource::Loaded && !store.load_encrypted().is_empty() {
            warn!("salt was regenerated while the vault has records; they will not decrypt");
        }
        Ok(store)
    }

    pub fn salt_source(&self) -> SaltSource {
        self.salt_source
    }

    pub fn key_material(&self) -> &KeyMaterial {
        &self.keys
    }

    /// Read the raw vault lines. A missing or unreadable file is an empty vault.
    pub fn load_encrypted(&self) -> Vec<RawLine> {
        match self.backend.read_vault() {
            Ok(Some(bytes)) => format::split_lines(&bytes),
            Ok(None) => {
                debug!("vault file absent; starting empty");
                Vec::new()
            }
            Err(err) => {
                warn!("vault unreadable ({err}); starting empty");
                Vec::new()
            }
        }
    }

    /// Decrypt every record with the key derived from `gesture`.
    ///
    /// Lines that fail to parse or decrypt are reported in [`Unlocked::skipped`] and kept aside
    /// so the next [`save`](Self::save) writes them back unchanged.
    pub fn unlock(&mut self, gesture: &Gesture) -> Result<Unlocked, VaultError> {
        let key = self.keys.derive(gesture)?;
        let cipher = RecordCipher::new(&key);
        let lines = self.load_encrypted();

        let mut records = Vec::with_capacity(lines.len());
        let mut skipped = Vec::new();
        self.retained.clear();

        for line in lines {
            match open_line(&cipher, &line) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    warn!("skipping vault line {}: {reason}", line.number);
                    skipped.push(SkippedLine {
                        number: line.number,
                        reason,
                    });
                    self.retained.push(line);
                }
            }
        }

        if records.is_empty() && !skipped.is_empty() {
            return Err(VaultError::NothingDecryptable { skipped });
        }

        info!(
            "vault unlocked: {} records, {} skipped",
            records.len(),
            skipped.len()
        );
        Ok(Unlocked { records, skipped })
    }

    /// Encrypt `records` under fresh IVs and replace the vault file.
    pub fn save<R>(
        &mut self,
        records: &[Record],
        gesture: &Gesture,
        rng: &mut R,
    ) -> Result<(), VaultError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let key = self.keys.derive(gesture)?;
        let cipher = RecordCipher::new(&key);

        let mut contents = Vec::new();
        for (index, record) in records.iter().enumerate() {
            let line = format::encode_line(&EncryptedRecord {
                site: record.site.clone(),
                username: record.username.clone(),
                secret_hex: cipher.encrypt(rng, record.secret.as_bytes())?,
            })
            .map_err(|error| VaultError::Encode { index, error })?;
            contents.extend_from_slice(line.as_bytes());
            contents.push(b'\n');
        }
        for line in &self.retained {
            contents.extend_from_slice(&line.bytes);
            contents.push(b'\n');
        }

        self.backend
            .write_vault(&contents)
            .map_err(VaultError::Storage)?;
        info!(
            "vault saved: {} records, {} retained lines",
            records.len(),
            self.retained.len()
        );
        Ok(())
    }

    /// Drop per-session bookkeeping when the device locks.
    pub fn forget_session(&mut self) {
        self.retained.clear();
    }

    /// Lines that could not be decoded at the last unlock.
    pub fn retained_lines(&self) -> &[RawLine] {
        &self.retained
    }
}

fn open_line(cipher: &RecordCipher<'_>, line: &RawLine) -> Result<Record, SkipReason> {
    let encrypted = format::parse_raw(line)?;
    let plaintext = cipher.decrypt(&encrypted.secret_hex)?;
    let secret = core::str::from_utf8(&plaintext).map_err(|_| SkipReason::Utf8)?;

    Ok(Record {
        site: encrypted.site,
        username: encrypted.username,
        secret: SecretString(Zeroizing::new(String::from(secret))),
    })
}
