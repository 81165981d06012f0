use aes::Aes128;
use alloc::{string::String, vec::Vec};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::NoPadding};
use hmac::{Hmac, Mac};
use rand_core::{CryptoRng, RngCore};
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::kdf::DerivedKey;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;
/// Length of the random initialization vector prefixed to every envelope.
pub const IV_LEN: usize = 16;
/// Length of the truncated authentication tag appended to every envelope.
pub const TAG_LEN: usize = 16;

const MAC_KEY_LABEL: &[u8] = b"pattern-vault.secret.mac.v1";

type HmacSha256 = Hmac<Sha256>;
type Encryptor = cbc::Encryptor<Aes128>;
type Decryptor = cbc::Decryptor<Aes128>;

/// Failures raised while opening an encrypted secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CipherError {
    #[error("ciphertext is not valid hex")]
    Encoding,
    #[error("ciphertext envelope has invalid length {0}")]
    Length(usize),
    #[error("ciphertext failed authentication")]
    Authentication,
    #[error("invalid padding")]
    Padding,
    #[error("invalid key or IV length")]
    KeyLength,
}

/// Extend `data` to a whole number of blocks with PKCS#7 padding.
///
/// Always appends between 1 and [`BLOCK_LEN`] bytes, each holding the pad length.
pub fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_LEN - (data.len() % BLOCK_LEN);
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad_len, pad_len as u8);
    padded
}

/// Strip PKCS#7 padding, validating every padding byte.
pub fn unpad(data: &[u8]) -> Result<&[u8], CipherError> {
    if data.is_empty() || data.len() % BLOCK_LEN != 0 {
        return Err(CipherError::Padding);
    }
    let last = data[data.len() - 1];
    let pad_len = last as usize;
    if pad_len == 0 || pad_len > BLOCK_LEN {
        return Err(CipherError::Padding);
    }

    let (body, padding) = data.split_at(data.len() - pad_len);
    if padding.iter().any(|byte| *byte != last) {
        return Err(CipherError::Padding);
    }
    Ok(body)
}

/// AES-128-CBC engine for individual record secrets.
///
/// Envelopes are `IV || ciphertext || tag`, hex-encoded in lowercase. The IV is drawn fresh for
/// every encryption and the tag is an HMAC-SHA-256 over `IV || ciphertext`, truncated to
/// [`TAG_LEN`] bytes and keyed with a subkey of the record key. The engine only borrows the key.
pub struct RecordCipher<'k> {
    key: &'k DerivedKey,
    mac_key: Zeroizing<[u8; 32]>,
}

impl<'k> RecordCipher<'k> {
    pub fn new(key: &'k DerivedKey) -> Self {
        let mut mac =
            HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts 16-byte keys");
        mac.update(MAC_KEY_LABEL);
        let mut mac_key = Zeroizing::new([0u8; 32]);
        mac_key.copy_from_slice(&mac.finalize().into_bytes());
        Self { key, mac_key }
    }

    fn authenticator(&self, iv: &[u8], ciphertext: &[u8]) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(self.mac_key.as_slice()).expect("HMAC accepts 32-byte keys");
        mac.update(iv);
        mac.update(ciphertext);
        mac
    }

    /// Encrypt `plaintext` under a fresh IV and return the hex envelope.
    pub fn encrypt<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        plaintext: &[u8],
    ) -> Result<String, CipherError> {
        let mut iv = [0u8; IV_LEN];
        rng.fill_bytes(&mut iv);

        let mut buffer = Zeroizing::new(pad(plaintext));
        let msg_len = buffer.len();
        Encryptor::new_from_slices(self.key.as_bytes(), &iv)
            .map_err(|_| CipherError::KeyLength)?
            .encrypt_padded_mut::<NoPadding>(buffer.as_mut_slice(), msg_len)
            .map_err(|_| CipherError::Padding)?;

        let tag = self.authenticator(&iv, &buffer).finalize().into_bytes();

        let mut envelope = Vec::with_capacity(IV_LEN + msg_len + TAG_LEN);
        envelope.extend_from_slice(&iv);
        envelope.extend_from_slice(&buffer);
        envelope.extend_from_slice(&tag[..TAG_LEN]);
        Ok(hex::encode(envelope))
    }

    /// Open a hex envelope produced by [`RecordCipher::encrypt`].
    ///
    /// The tag is verified before decryption, so tampered or wrongly keyed input is rejected
    /// deterministically instead of yielding garbage.
    pub fn decrypt(&self, encoded: &str) -> Result<Zeroizing<Vec<u8>>, CipherError> {
        let envelope = hex::decode(encoded.trim()).map_err(|_| CipherError::Encoding)?;
        let len = envelope.len();
        if len < IV_LEN + BLOCK_LEN + TAG_LEN || (len - IV_LEN - TAG_LEN) % BLOCK_LEN != 0 {
            return Err(CipherError::Length(len));
        }

        let (iv, rest) = envelope.split_at(IV_LEN);
        let (ciphertext, tag) = rest.split_at(rest.len() - TAG_LEN);
        self.authenticator(iv, ciphertext)
            .verify_truncated_left(tag)
            .map_err(|_| CipherError::Authentication)?;

        let mut buffer = Zeroizing::new(ciphertext.to_vec());
        let decrypted = Decryptor::new_from_slices(self.key.as_bytes(), iv)
            .map_err(|_| CipherError::KeyLength)?
            .decrypt_padded_mut::<NoPadding>(buffer.as_mut_slice())
            .map_err(|_| CipherError::Padding)?;
        let plaintext = unpad(decrypted)?;
        Ok(Zeroizing::new(plaintext.to_vec()))
    }
}
