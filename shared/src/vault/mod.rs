//! Record model, secret cipher and on-disk line format.
//!
//! Only the secret column of a vault line is encrypted; site and username stay readable so the
//! host tooling can list entries without the unlock gesture. Decrypted secrets live in
//! [`SecretString`] and are wiped on drop.

pub mod cipher;
pub mod format;
pub mod model;

pub use cipher::{CipherError, RecordCipher};
pub use format::{EncryptedRecord, FIELD_DELIMITER, LineError, RawLine};
pub use model::{Record, SecretString};
