//! ECDSA P-256 signatures over SHA-384 digests.
//!
//! Signatures travel as base64 of the DER `SEQUENCE { r, s }` encoding, not
//! the fixed-width `r || s` form. The SHA-384 digest is truncated to the
//! curve's 256-bit order length as FIPS 186-4 prescribes.

use crate::error::{CryptoError, CryptoResult};
use crate::keys::{self, KeyMaterial};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use p256::ecdsa::Signature;
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use sha2::{Digest, Sha384};
use tracing::debug;

/// Signs `content` with a P-256 private key.
///
/// # Errors
///
/// - `InvalidArgument` if `content` is empty
/// - `InvalidKeyMaterial` if `private_key` is not a P-256 private key
pub fn sign(content: &[u8], private_key: &KeyMaterial) -> CryptoResult<String> {
    if content.is_empty() {
        return Err(CryptoError::InvalidArgument(
            "content to sign must not be empty".to_string(),
        ));
    }
    let signing_key = private_key.ec_signing()?;

    let digest = Sha384::digest(content);
    let signature: Signature = signing_key
        .sign_prehash(&digest)
        .map_err(|e| CryptoError::InvalidArgument(format!("ECDSA signing failed: {e}")))?;

    Ok(BASE64.encode(signature.to_der().as_bytes()))
}

/// Checks a base64 DER signature over `content`.
///
/// Returns `Ok(false)` for a signature made by another key, over other
/// content, or that is not a DER ECDSA signature at all.
///
/// # Errors
///
/// - `InvalidBase64` if `signature_b64` is not base64
/// - `InvalidKeyMaterial` if `public_key` is not a P-256 key
pub fn verify(
    content: &[u8],
    signature_b64: &str,
    public_key: &KeyMaterial,
) -> CryptoResult<bool> {
    let verifying_key = public_key.ec_verifying()?;
    let der = BASE64
        .decode(signature_b64.trim())
        .map_err(|_| CryptoError::InvalidBase64("signature"))?;

    let Ok(signature) = Signature::from_der(&der) else {
        debug!(len = der.len(), "signature is not DER-encoded");
        return Ok(false);
    };

    let digest = Sha384::digest(content);
    Ok(verifying_key.verify_prehash(&digest, &signature).is_ok())
}

/// [`sign`] taking PEM private key text (`PRIVATE KEY` or `EC PRIVATE KEY`).
pub fn sign_with_pem(content: &[u8], private_key_pem: &str) -> CryptoResult<String> {
    if private_key_pem.trim().is_empty() {
        return Err(CryptoError::InvalidArgument(
            "private key must not be empty".to_string(),
        ));
    }
    let private_key = keys::parse_private_key(private_key_pem)?;
    sign(content, &private_key)
}

/// [`verify`] taking PEM public key text.
pub fn verify_with_pem(
    content: &[u8],
    signature_b64: &str,
    public_key_pem: &str,
) -> CryptoResult<bool> {
    let public_key = keys::parse_public_key(public_key_pem)?;
    verify(content, signature_b64, &public_key)
}
