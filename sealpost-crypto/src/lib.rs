//! Cryptographic primitives for sealpost envelopes.
//!
//! Provides the building blocks the envelope pipeline composes:
//! - PEM armor for SPKI, PKCS#8, PKCS#1 and SEC1 key material
//! - gzip compression of plaintext
//! - AES-256-GCM with a fresh key and IV per envelope
//! - RSA PKCS#1 v1.5 wrapping of the content key
//! - ECDSA P-256 / SHA-384 signatures in DER form
//!
//! # Architecture
//!
//! Every envelope gets its own keys:
//!
//! 1. **Content Key**: A random 256-bit AES key generated per envelope.
//!    It encrypts the compressed payload and is zeroized when dropped.
//!
//! 2. **Recipient Key**: The recipient's RSA key pair. The content key is
//!    wrapped with the public half and only the private half can recover it.
//!
//! 3. **Sender Key** (optional): A P-256 key pair whose private half signs
//!    the sealed payload so the recipient can check its origin.
//!
//! All functions are synchronous and keep no state between calls.

pub mod cipher;
pub mod compression;
mod error;
pub mod key_wrap;
pub mod keys;
pub mod pem_codec;
pub mod signer;

pub use cipher::{
    decrypt, decrypt_from_base64, encrypt, encrypt_to_base64, SymmetricKey, IV_SIZE, KEY_SIZE,
    SEALED_OVERHEAD, TAG_SIZE,
};
pub use compression::{compress, compress_with_level, decompress};
pub use error::{CryptoError, CryptoResult};
pub use key_wrap::{
    decrypt_verification_content, decrypt_verification_content_with_pem,
    encrypt_verification_content, unwrap, unwrap_with_pem, wrap, wrap_with_pem,
};
pub use keys::{
    generate_ec_key_pair, generate_rsa_key_pair, parse_private_key, parse_public_key,
    KeyAlgorithm, KeyMaterial, KeyPair, KeyVisibility, DEFAULT_RSA_BITS, MIN_RSA_BITS,
};
pub use pem_codec::PemLabel;
pub use signer::{sign, sign_with_pem, verify, verify_with_pem};
