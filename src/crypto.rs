//! Field-level encryption for currency display names.
//!
//! The cipher runs with a fixed key and IV supplied from configuration, so
//! equal plaintexts always map to equal ciphertexts. That keeps stored values
//! comparable byte-for-byte, at the cost of leaking repeats; the reference
//! table is small and low-cardinality, and upgrading to a per-record random
//! IV only requires a new [`CipherProvider`] implementation.

use aes::Aes256;
use anyhow::Result;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use std::sync::Arc;
use thiserror::Error;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Raised when a stored value cannot be decrypted. Callers treat this as a
/// recoverable, per-item condition: rows written before encryption was
/// introduced fail here and are passed through as-is.
#[derive(Debug, Error)]
pub enum DecryptionError {
    #[error("ciphertext is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("ciphertext has an invalid block or padding structure")]
    Cipher,
    #[error("decrypted bytes are not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Byte-level encryption capability injected into [`CryptoBox`].
pub trait CipherProvider: Send + Sync {
    fn encrypt(&self, plaintext: &[u8]) -> Vec<u8>;
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, DecryptionError>;
}

/// AES-256-CBC with PKCS#7 padding over a configured key/IV pair.
pub struct AesCbcCipher {
    key: [u8; 32],
    iv: [u8; 16],
}

impl AesCbcCipher {
    /// Key and IV are taken verbatim as the UTF-8 bytes of the configured
    /// strings: 32 bytes for the key, 16 for the IV.
    pub fn new(key: &str, iv: &str) -> Result<Self> {
        let key: [u8; 32] = key
            .as_bytes()
            .try_into()
            .map_err(|_| anyhow::anyhow!("cipher key must be exactly 32 bytes, got {}", key.len()))?;
        let iv: [u8; 16] = iv
            .as_bytes()
            .try_into()
            .map_err(|_| anyhow::anyhow!("cipher IV must be exactly 16 bytes, got {}", iv.len()))?;
        Ok(Self { key, iv })
    }
}

impl CipherProvider for AesCbcCipher {
    fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        Aes256CbcEnc::new(&self.key.into(), &self.iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, DecryptionError> {
        Aes256CbcDec::new(&self.key.into(), &self.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| DecryptionError::Cipher)
    }
}

/// String-level wrapper around a [`CipherProvider`]: UTF-8 in, standard
/// base64 out, so ciphertext can live in a plain text column.
#[derive(Clone)]
pub struct CryptoBox {
    cipher: Arc<dyn CipherProvider>,
}

impl CryptoBox {
    pub fn new(cipher: Arc<dyn CipherProvider>) -> Self {
        Self { cipher }
    }

    /// Encryption never fails for well-formed UTF-8 input, and is
    /// deterministic: the same input yields the same output.
    pub fn encrypt(&self, plaintext: &str) -> String {
        BASE64.encode(self.cipher.encrypt(plaintext.as_bytes()))
    }

    pub fn decrypt(&self, ciphertext: &str) -> Result<String, DecryptionError> {
        let bytes = BASE64.decode(ciphertext)?;
        let plaintext = self.cipher.decrypt(&bytes)?;
        Ok(String::from_utf8(plaintext)?)
    }
}
