use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use firmware::storage::{BackendError, VaultBackend};
use log::debug;

/// File names used on the device's storage card.
pub const VAULT_FILE: &str = "encrypted_passwords.csv";
pub const SALT_FILE: &str = "salt.bin";

/// Vault and salt files in a directory on the host filesystem.
#[derive(Clone, Debug)]
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn vault_path(&self) -> PathBuf {
        self.root.join(VAULT_FILE)
    }

    pub fn salt_path(&self) -> PathBuf {
        self.root.join(SALT_FILE)
    }
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, BackendError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(BackendError::Read(format!("{}: {err}", path.display()))),
    }
}

/// Write `contents` to a sibling temporary file and rename it over `path`.
fn write_atomic(path: &Path, contents: &[u8], mode: Option<u32>) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension("tmp");

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)?;
    if let Some(mode) = mode {
        set_mode(&temp_path, mode)?;
    }
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path).inspect_err(|_| {
        let _ = fs::remove_file(&temp_path);
    })
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

fn write_error(path: &Path, err: io::Error) -> BackendError {
    BackendError::Write(format!("{}: {err}", path.display()))
}

impl VaultBackend for FsBackend {
    fn read_vault(&self) -> Result<Option<Vec<u8>>, BackendError> {
        read_optional(&self.vault_path())
    }

    fn write_vault(&mut self, contents: &[u8]) -> Result<(), BackendError> {
        let path = self.vault_path();
        write_atomic(&path, contents, None).map_err(|err| write_error(&path, err))?;
        debug!("wrote {} bytes to {}", contents.len(), path.display());
        Ok(())
    }

    fn read_salt(&self) -> Result<Option<Vec<u8>>, BackendError> {
        read_optional(&self.salt_path())
    }

    fn write_salt(&mut self, salt: &[u8]) -> Result<(), BackendError> {
        let path = self.salt_path();
        write_atomic(&path, salt, Some(0o600)).map_err(|err| write_error(&path, err))
    }
}
