use std::io::Write;

use firmware::storage::{Unlocked, VaultError};
use firmware::{DeviceConfig, VaultStore};
use rand_core::OsRng;
use shared::error::SharedError;
use shared::gesture::Gesture;

use crate::Command;
use crate::storage::FsBackend;

pub mod add;
pub mod init;
pub mod list;
pub mod simulate;

/// Everything a command needs: validated configuration, the device files and an output sink.
pub struct Context<'a> {
    pub config: DeviceConfig,
    pub backend: FsBackend,
    pub out: &'a mut dyn Write,
}

impl Context<'_> {
    pub(crate) fn open_store(&self) -> Result<VaultStore, SharedError> {
        VaultStore::open(Box::new(self.backend.clone()), &self.config, &mut OsRng)
            .map_err(vault_error)
    }

    /// Parse a textual gesture and check it against the configured unlock gesture.
    pub(crate) fn gesture(&self, text: &str) -> Result<Gesture, SharedError> {
        let gesture: Gesture = text.parse()?;
        self.config.check_gesture(&gesture)?;
        if !gesture.matches(&self.config.expected_gesture) {
            return Err(SharedError::Input(String::from(
                "gesture does not match the configured unlock gesture",
            )));
        }
        Ok(gesture)
    }
}

pub fn run(command: Command, context: &mut Context<'_>) -> Result<(), SharedError> {
    match command {
        Command::Init => init::run(context),
        Command::List(args) => list::run(context, &args),
        Command::Add(args) => add::run(context, &args),
        Command::Simulate(args) => simulate::run(context, &args),
    }
}

/// Unlock `store`, refusing a vault in which no line decrypts.
pub(crate) fn unlock(store: &mut VaultStore, gesture: &Gesture) -> Result<Unlocked, SharedError> {
    match store.unlock(gesture) {
        Err(VaultError::NothingDecryptable { skipped }) => Err(SharedError::Vault(format!(
            "none of the {} vault lines could be decrypted; was the salt replaced?",
            skipped.len()
        ))),
        other => other.map_err(vault_error),
    }
}

pub(crate) fn vault_error(err: VaultError) -> SharedError {
    match err {
        VaultError::Config(config) => SharedError::Config(config),
        VaultError::Salt(backend) | VaultError::Storage(backend) => {
            SharedError::Storage(backend.to_string())
        }
        other => SharedError::Vault(other.to_string()),
    }
}
