//! Crypto error types.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors raised by the envelope primitives.
///
/// Messages carry structural facts only (lengths, labels, stage hints),
/// never key bytes, plaintext, or signatures.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("malformed PEM: {0}")]
    MalformedPem(String),

    #[error("unsupported key format: {0}")]
    UnsupportedKeyFormat(String),

    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("invalid key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },

    #[error("invalid envelope length: got {actual} bytes, minimum is {min}")]
    InvalidEnvelopeLength { min: usize, actual: usize },

    #[error("invalid base64 in {0}")]
    InvalidBase64(&'static str),

    #[error("invalid compressed data: {0}")]
    InvalidCompressedData(String),

    #[error("compression failed: {0}")]
    CompressionFailed(String),

    #[error("authentication failed (wrong key or tampered data)")]
    AuthenticationFailed,

    #[error("signature verification failed")]
    SignatureVerificationFailed,

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl CryptoError {
    /// Returns true when the error means "do not trust this data" rather
    /// than "malformed request".
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            CryptoError::AuthenticationFailed | CryptoError::SignatureVerificationFailed
        )
    }
}
