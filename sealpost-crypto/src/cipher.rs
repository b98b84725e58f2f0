//! AES-256-GCM payload encryption.
//!
//! Sealed layout: `iv (12 bytes) || ciphertext (n bytes) || tag (16 bytes)`.
//! The layout is shared with the counterpart implementation and must not
//! change. The IV is drawn from the OS RNG inside [`encrypt`]; there is no
//! API that accepts a caller-chosen IV.

use crate::error::{CryptoError, CryptoResult};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::RngCore;
use rand::rngs::OsRng;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;
/// Size of the GCM IV in bytes.
pub const IV_SIZE: usize = 12;
/// Size of the GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;
/// Bytes a sealed payload adds on top of the plaintext.
pub const SEALED_OVERHEAD: usize = IV_SIZE + TAG_SIZE;

/// A 256-bit per-envelope content key.
///
/// Zeroized on drop and redacted from `Debug` output.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_SIZE]);

impl SymmetricKey {
    /// Generates a fresh key from the OS RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Copies a key out of a slice, which must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let array: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| CryptoError::InvalidKeySize {
            expected: KEY_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// Encrypts `plaintext` under this key. See [`encrypt`].
    pub fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        encrypt(plaintext, &self.0)
    }

    /// Decrypts a sealed payload under this key. See [`decrypt`].
    pub fn decrypt(&self, sealed: &[u8]) -> CryptoResult<Vec<u8>> {
        decrypt(sealed, &self.0)
    }
}

impl From<[u8; KEY_SIZE]> for SymmetricKey {
    fn from(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey(<redacted>)")
    }
}

/// Encrypts `plaintext` with AES-256-GCM under `key`.
///
/// Returns `iv || ciphertext || tag`, always `plaintext.len() + 28` bytes.
///
/// # Errors
///
/// `InvalidKeySize` if `key` is not 32 bytes.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> CryptoResult<Vec<u8>> {
    let cipher = new_cipher(key)?;

    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);

    let ciphertext_and_tag = cipher
        .encrypt(&Nonce::from(iv), plaintext)
        .map_err(|_| CryptoError::EncryptionFailed("AES-GCM seal failed".to_string()))?;

    let mut sealed = Vec::with_capacity(IV_SIZE + ciphertext_and_tag.len());
    sealed.extend_from_slice(&iv);
    sealed.extend_from_slice(&ciphertext_and_tag);
    Ok(sealed)
}

/// Decrypts `iv || ciphertext || tag` with AES-256-GCM under `key`.
///
/// The tag is verified before any plaintext is released.
///
/// # Errors
///
/// - `InvalidEnvelopeLength` if `sealed` is shorter than 28 bytes (checked
///   before any cipher work)
/// - `InvalidKeySize` if `key` is not 32 bytes
/// - `AuthenticationFailed` on tag mismatch (wrong key or tampered data)
pub fn decrypt(sealed: &[u8], key: &[u8]) -> CryptoResult<Vec<u8>> {
    if sealed.len() < SEALED_OVERHEAD {
        return Err(CryptoError::InvalidEnvelopeLength {
            min: SEALED_OVERHEAD,
            actual: sealed.len(),
        });
    }
    let cipher = new_cipher(key)?;

    let (iv, ciphertext_and_tag) = sealed
        .split_first_chunk::<IV_SIZE>()
        .ok_or(CryptoError::InvalidEnvelopeLength {
            min: SEALED_OVERHEAD,
            actual: sealed.len(),
        })?;
    cipher
        .decrypt(&Nonce::from(*iv), ciphertext_and_tag)
        .map_err(|_| CryptoError::AuthenticationFailed)
}

/// Encrypts and base64-encodes the sealed layout.
pub fn encrypt_to_base64(plaintext: &[u8], key: &[u8]) -> CryptoResult<String> {
    encrypt(plaintext, key).map(|sealed| BASE64.encode(sealed))
}

/// Base64-decodes and decrypts the sealed layout.
pub fn decrypt_from_base64(sealed_b64: &str, key: &[u8]) -> CryptoResult<Vec<u8>> {
    let sealed = BASE64
        .decode(sealed_b64)
        .map_err(|_| CryptoError::InvalidBase64("sealed payload"))?;
    decrypt(&sealed, key)
}

fn new_cipher(key: &[u8]) -> CryptoResult<Aes256Gcm> {
    if key.len() != KEY_SIZE {
        return Err(CryptoError::InvalidKeySize {
            expected: KEY_SIZE,
            actual: key.len(),
        });
    }
    Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::InvalidKeySize {
        expected: KEY_SIZE,
        actual: key.len(),
    })
}
