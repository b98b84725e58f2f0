//! RSA transport of content keys.
//!
//! Content keys are wrapped with RSAES-PKCS1-v1_5, the scheme the
//! counterpart system expects. The out-of-band verification-content
//! challenge uses RSAES-OAEP with SHA-256 instead. The two paths use
//! separate functions and must never share a padding mode.

use crate::cipher::{KEY_SIZE, SymmetricKey};
use crate::error::{CryptoError, CryptoResult};
use crate::keys::{self, KeyMaterial};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::rngs::OsRng;
use rsa::{Oaep, Pkcs1v15Encrypt};
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroizing;

/// Encrypts a content key to the recipient's RSA public key.
///
/// Returns the base64 ciphertext, whose decoded length equals the
/// recipient's modulus size (256 bytes for RSA-2048).
pub fn wrap(key: &SymmetricKey, recipient: &KeyMaterial) -> CryptoResult<String> {
    let public = recipient.rsa_public()?;
    let wrapped = public
        .encrypt(&mut OsRng, Pkcs1v15Encrypt, key.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(format!("RSA key wrap failed: {e}")))?;

    debug!(wrapped_len = wrapped.len(), "wrapped content key");
    Ok(BASE64.encode(wrapped))
}

/// Recovers a content key with the recipient's RSA private key.
///
/// # Errors
///
/// - `InvalidBase64` if `wrapped` is not base64
/// - `InvalidKeyMaterial` if `recipient` is not an RSA private key
/// - `DecryptionFailed` on wrong key, corrupted ciphertext, or a recovered
///   key that is not 32 bytes
pub fn unwrap(wrapped: &str, recipient: &KeyMaterial) -> CryptoResult<SymmetricKey> {
    let private = recipient.rsa_private()?;
    let ciphertext = BASE64
        .decode(wrapped.trim())
        .map_err(|_| CryptoError::InvalidBase64("wrapped key"))?;

    let recovered = private
        .decrypt(Pkcs1v15Encrypt, &ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| {
            CryptoError::DecryptionFailed(
                "RSA key unwrap failed (wrong key or corrupted data)".to_string(),
            )
        })?;

    SymmetricKey::from_slice(&recovered).map_err(|_| {
        CryptoError::DecryptionFailed(format!(
            "unwrapped key is {} bytes, expected {KEY_SIZE}",
            recovered.len()
        ))
    })
}

/// [`wrap`] taking a raw key and PEM public key text.
pub fn wrap_with_pem(key: &[u8], recipient_public_pem: &str) -> CryptoResult<String> {
    let key = SymmetricKey::from_slice(key)?;
    let recipient = keys::parse_public_key(recipient_public_pem)?;
    wrap(&key, &recipient)
}

/// [`unwrap`] taking PEM private key text.
pub fn unwrap_with_pem(wrapped: &str, recipient_private_pem: &str) -> CryptoResult<SymmetricKey> {
    let recipient = keys::parse_private_key(recipient_private_pem)?;
    unwrap(wrapped, &recipient)
}

/// Decrypts an RSA-OAEP-SHA256 verification challenge to its UTF-8 text.
///
/// Used to prove possession of a freshly registered key pair.
pub fn decrypt_verification_content(
    content_b64: &str,
    private_key: &KeyMaterial,
) -> CryptoResult<String> {
    if content_b64.trim().is_empty() {
        return Err(CryptoError::InvalidArgument(
            "verification content must not be empty".to_string(),
        ));
    }
    let private = private_key.rsa_private()?;
    let ciphertext = BASE64
        .decode(content_b64.trim())
        .map_err(|_| CryptoError::InvalidBase64("verification content"))?;

    let plaintext = private
        .decrypt(Oaep::new::<Sha256>(), &ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed("OAEP decryption failed".to_string()))?;

    String::from_utf8(plaintext).map_err(|_| {
        CryptoError::DecryptionFailed("verification content is not UTF-8".to_string())
    })
}

/// [`decrypt_verification_content`] taking PEM private key text.
pub fn decrypt_verification_content_with_pem(
    content_b64: &str,
    private_key_pem: &str,
) -> CryptoResult<String> {
    if private_key_pem.trim().is_empty() {
        return Err(CryptoError::InvalidArgument(
            "private key must not be empty".to_string(),
        ));
    }
    let private_key = keys::parse_private_key(private_key_pem)?;
    decrypt_verification_content(content_b64, &private_key)
}

/// Encrypts a verification challenge with RSA-OAEP-SHA256.
///
/// This is the issuing side of the challenge; it is provided so both ends
/// of the exchange can be exercised locally.
pub fn encrypt_verification_content(
    content: &str,
    public_key: &KeyMaterial,
) -> CryptoResult<String> {
    if content.is_empty() {
        return Err(CryptoError::InvalidArgument(
            "verification content must not be empty".to_string(),
        ));
    }
    let public = public_key.rsa_public()?;
    let ciphertext = public
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), content.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(format!("OAEP encryption failed: {e}")))?;
    Ok(BASE64.encode(ciphertext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_ec_key_pair, generate_rsa_key_pair, MIN_RSA_BITS};

    #[test]
    fn wrap_unwrap_roundtrip() {
        let pair = generate_rsa_key_pair(MIN_RSA_BITS).unwrap();
        let key = SymmetricKey::generate();

        let wrapped = wrap(&key, &pair.public).unwrap();
        let recovered = unwrap(&wrapped, &pair.private).unwrap();
        assert_eq!(recovered.as_bytes(), key.as_bytes());
    }

    #[test]
    fn wrapped_length_matches_modulus() {
        let pair = generate_rsa_key_pair(MIN_RSA_BITS).unwrap();
        let wrapped = wrap(&SymmetricKey::generate(), &pair.public).unwrap();
        assert_eq!(BASE64.decode(wrapped).unwrap().len(), 128);
    }

    #[test]
    fn unwrap_rejects_bad_base64() {
        let pair = generate_rsa_key_pair(MIN_RSA_BITS).unwrap();
        let err = unwrap("%%% not base64 %%%", &pair.private).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidBase64(_)));
    }

    #[test]
    fn unwrap_rejects_corrupted_ciphertext() {
        let pair = generate_rsa_key_pair(MIN_RSA_BITS).unwrap();
        let wrapped = wrap(&SymmetricKey::generate(), &pair.public).unwrap();
        let mut bytes = BASE64.decode(wrapped).unwrap();
        bytes[5] ^= 0x40;
        let err = unwrap(&BASE64.encode(bytes), &pair.private).unwrap_err();
        assert!(matches!(err, CryptoError::DecryptionFailed(_)));
    }

    #[test]
    fn ec_key_cannot_wrap() {
        let ec = generate_ec_key_pair();
        let err = wrap(&SymmetricKey::generate(), &ec.public).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKeyMaterial(_)));
    }

    #[test]
    fn unwrap_with_unparsable_pem_is_invalid_key_material() {
        let pem = crate::pem_codec::encode("PRIVATE KEY", b"nope");
        let err = unwrap_with_pem("AAAA", &pem).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKeyMaterial(_)));
    }

    #[test]
    fn verification_content_roundtrip() {
        let pair = generate_rsa_key_pair(MIN_RSA_BITS).unwrap();
        let challenge = encrypt_verification_content("Hello RSA!", &pair.public).unwrap();
        let text = decrypt_verification_content(&challenge, &pair.private).unwrap();
        assert_eq!(text, "Hello RSA!");
    }

    #[test]
    fn padding_schemes_are_not_interchangeable() {
        let pair = generate_rsa_key_pair(MIN_RSA_BITS).unwrap();

        // An OAEP challenge is not a PKCS#1 v1.5 wrapped key.
        let challenge =
            encrypt_verification_content("0123456789abcdef0123456789abcdef", &pair.public).unwrap();
        assert!(unwrap(&challenge, &pair.private).is_err());

        // A PKCS#1 v1.5 wrapped key is not an OAEP challenge.
        let wrapped = wrap(&SymmetricKey::generate(), &pair.public).unwrap();
        assert!(decrypt_verification_content(&wrapped, &pair.private).is_err());
    }

    #[test]
    fn verification_content_rejects_empty_inputs() {
        let pair = generate_rsa_key_pair(MIN_RSA_BITS).unwrap();
        assert!(matches!(
            decrypt_verification_content("", &pair.private),
            Err(CryptoError::InvalidArgument(_))
        ));
        assert!(matches!(
            decrypt_verification_content_with_pem("AAAA", "  "),
            Err(CryptoError::InvalidArgument(_))
        ));
    }
}
