use alloc::{borrow::ToOwned, string::String};
use core::fmt;
use core::ops::Deref;
use zeroize::Zeroizing;

/// Wrapper around sensitive strings that zeroize their memory on drop.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct SecretString(pub Zeroizing<String>);

impl SecretString {
    pub fn new(value: String) -> Self {
        Self(Zeroizing::new(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value.to_owned())
    }
}

impl Deref for SecretString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(***)")
    }
}

/// Decrypted credential held in memory while the vault is unlocked.
///
/// Duplicates are legal; records are addressed by their position in the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub site: String,
    pub username: String,
    pub secret: SecretString,
}

impl Record {
    pub fn new(
        site: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<SecretString>,
    ) -> Self {
        Self {
            site: site.into(),
            username: username.into(),
            secret: secret.into(),
        }
    }
}
