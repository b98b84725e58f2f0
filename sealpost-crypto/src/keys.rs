//! Typed asymmetric key material.
//!
//! PEM text is parsed once at the boundary by [`parse_public_key`] /
//! [`parse_private_key`]; everything downstream works on [`KeyMaterial`].
//! Import branches on the PEM label to pick the DER parser:
//!
//! | Label             | Encoding | Algorithms   |
//! |-------------------|----------|--------------|
//! | `PUBLIC KEY`      | SPKI     | RSA, P-256   |
//! | `RSA PUBLIC KEY`  | PKCS#1   | RSA          |
//! | `PRIVATE KEY`     | PKCS#8   | RSA, P-256   |
//! | `RSA PRIVATE KEY` | PKCS#1   | RSA          |
//! | `EC PRIVATE KEY`  | SEC1     | P-256        |
//!
//! Private key types from `rsa` and `p256` zeroize their secrets on drop.

use crate::error::{CryptoError, CryptoResult};
use crate::pem_codec::{self, PemLabel};
use p256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{
    DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, ObjectIdentifier,
    PrivateKeyInfo, SubjectPublicKeyInfoRef,
};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;
use tracing::debug;

/// rsaEncryption (PKCS#1).
const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
/// id-ecPublicKey (RFC 5480).
const EC_PUBLIC_KEY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// Smallest RSA modulus accepted for key generation.
pub const MIN_RSA_BITS: usize = 1024;
/// RSA modulus size used by key-generation call sites.
pub const DEFAULT_RSA_BITS: usize = 2048;

/// Asymmetric algorithm of a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    Rsa,
    EcdsaP256,
}

/// Whether a key is the public or the private half.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyVisibility {
    Public,
    Private,
}

/// A parsed asymmetric key.
#[derive(Clone)]
pub enum KeyMaterial {
    RsaPublic(RsaPublicKey),
    RsaPrivate(RsaPrivateKey),
    EcPublic(VerifyingKey),
    EcPrivate(SigningKey),
}

impl KeyMaterial {
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            KeyMaterial::RsaPublic(_) | KeyMaterial::RsaPrivate(_) => KeyAlgorithm::Rsa,
            KeyMaterial::EcPublic(_) | KeyMaterial::EcPrivate(_) => KeyAlgorithm::EcdsaP256,
        }
    }

    pub fn visibility(&self) -> KeyVisibility {
        match self {
            KeyMaterial::RsaPublic(_) | KeyMaterial::EcPublic(_) => KeyVisibility::Public,
            KeyMaterial::RsaPrivate(_) | KeyMaterial::EcPrivate(_) => KeyVisibility::Private,
        }
    }

    pub fn is_private(&self) -> bool {
        self.visibility() == KeyVisibility::Private
    }

    /// Returns the public half (a clone if this already is public).
    pub fn to_public(&self) -> KeyMaterial {
        match self {
            KeyMaterial::RsaPublic(key) => KeyMaterial::RsaPublic(key.clone()),
            KeyMaterial::RsaPrivate(key) => KeyMaterial::RsaPublic(key.to_public_key()),
            KeyMaterial::EcPublic(key) => KeyMaterial::EcPublic(key.clone()),
            KeyMaterial::EcPrivate(key) => KeyMaterial::EcPublic(key.verifying_key().clone()),
        }
    }

    /// Encodes as SPKI `PUBLIC KEY` or PKCS#8 `PRIVATE KEY` PEM.
    pub fn to_pem(&self) -> CryptoResult<String> {
        let pem = match self {
            KeyMaterial::RsaPublic(key) => {
                let doc = key.to_public_key_der().map_err(encode_err)?;
                pem_codec::encode(PemLabel::PublicKey.as_str(), doc.as_bytes())
            }
            KeyMaterial::EcPublic(key) => {
                let doc = key.to_public_key_der().map_err(encode_err)?;
                pem_codec::encode(PemLabel::PublicKey.as_str(), doc.as_bytes())
            }
            KeyMaterial::RsaPrivate(key) => {
                let doc = key.to_pkcs8_der().map_err(encode_err)?;
                pem_codec::encode(PemLabel::PrivateKey.as_str(), doc.as_bytes())
            }
            KeyMaterial::EcPrivate(key) => {
                let doc = key.to_pkcs8_der().map_err(encode_err)?;
                pem_codec::encode(PemLabel::PrivateKey.as_str(), doc.as_bytes())
            }
        };
        Ok(pem)
    }

    /// RSA modulus size in bytes, which is also the size of an RSA ciphertext.
    pub fn rsa_size(&self) -> Option<usize> {
        match self {
            KeyMaterial::RsaPublic(key) => Some(key.size()),
            KeyMaterial::RsaPrivate(key) => Some(key.size()),
            _ => None,
        }
    }

    pub(crate) fn rsa_public(&self) -> CryptoResult<RsaPublicKey> {
        match self {
            KeyMaterial::RsaPublic(key) => Ok(key.clone()),
            KeyMaterial::RsaPrivate(key) => Ok(key.to_public_key()),
            other => Err(other.mismatch("an RSA key")),
        }
    }

    pub(crate) fn rsa_private(&self) -> CryptoResult<&RsaPrivateKey> {
        match self {
            KeyMaterial::RsaPrivate(key) => Ok(key),
            other => Err(other.mismatch("an RSA private key")),
        }
    }

    pub(crate) fn ec_verifying(&self) -> CryptoResult<VerifyingKey> {
        match self {
            KeyMaterial::EcPublic(key) => Ok(key.clone()),
            KeyMaterial::EcPrivate(key) => Ok(key.verifying_key().clone()),
            other => Err(other.mismatch("a P-256 key")),
        }
    }

    pub(crate) fn ec_signing(&self) -> CryptoResult<&SigningKey> {
        match self {
            KeyMaterial::EcPrivate(key) => Ok(key),
            other => Err(other.mismatch("a P-256 private key")),
        }
    }

    fn mismatch(&self, wanted: &str) -> CryptoError {
        CryptoError::InvalidKeyMaterial(format!(
            "expected {wanted}, got {:?} {:?} key",
            self.algorithm(),
            self.visibility()
        ))
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("KeyMaterial");
        s.field("algorithm", &self.algorithm())
            .field("visibility", &self.visibility());
        if let Some(size) = self.rsa_size() {
            s.field("modulus_bits", &(size * 8));
        }
        s.finish_non_exhaustive()
    }
}

/// A freshly generated key pair.
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public: KeyMaterial,
    pub private: KeyMaterial,
}

impl KeyPair {
    /// SPKI `PUBLIC KEY` PEM of the public half.
    pub fn public_pem(&self) -> CryptoResult<String> {
        self.public.to_pem()
    }

    /// PKCS#8 `PRIVATE KEY` PEM of the private half.
    pub fn private_pem(&self) -> CryptoResult<String> {
        self.private.to_pem()
    }
}

/// Parses a public key from `PUBLIC KEY` (SPKI) or `RSA PUBLIC KEY` (PKCS#1) PEM.
pub fn parse_public_key(pem: &str) -> CryptoResult<KeyMaterial> {
    let (label, der) = pem_codec::parse_block(pem)?;
    match label {
        PemLabel::PublicKey => public_key_from_spki(&der),
        PemLabel::RsaPublicKey => RsaPublicKey::from_pkcs1_der(&der)
            .map(KeyMaterial::RsaPublic)
            .map_err(|e| invalid("PKCS#1 RSA public key", e)),
        private => Err(CryptoError::InvalidKeyMaterial(format!(
            "expected a public key, found \"{private}\" PEM"
        ))),
    }
}

/// Parses a private key from PKCS#8, PKCS#1 or SEC1 PEM.
pub fn parse_private_key(pem: &str) -> CryptoResult<KeyMaterial> {
    let (label, der) = pem_codec::parse_block(pem)?;
    let key = match label {
        PemLabel::PrivateKey => private_key_from_pkcs8(&der)?,
        PemLabel::RsaPrivateKey => RsaPrivateKey::from_pkcs1_der(&der)
            .map(KeyMaterial::RsaPrivate)
            .map_err(|e| invalid("PKCS#1 RSA private key", e))?,
        PemLabel::EcPrivateKey => p256::SecretKey::from_sec1_der(&der)
            .map(|secret| KeyMaterial::EcPrivate(SigningKey::from(secret)))
            .map_err(|e| invalid("SEC1 EC private key", e))?,
        public => {
            return Err(CryptoError::InvalidKeyMaterial(format!(
                "expected a private key, found \"{public}\" PEM"
            )));
        }
    };
    debug!(label = %label, algorithm = ?key.algorithm(), "imported private key");
    Ok(key)
}

/// Generates an RSA key pair with a `bits`-bit modulus.
pub fn generate_rsa_key_pair(bits: usize) -> CryptoResult<KeyPair> {
    if bits < MIN_RSA_BITS {
        return Err(CryptoError::InvalidArgument(format!(
            "RSA modulus must be at least {MIN_RSA_BITS} bits, got {bits}"
        )));
    }
    let private = RsaPrivateKey::new(&mut OsRng, bits)
        .map_err(|e| CryptoError::InvalidArgument(format!("RSA key generation failed: {e}")))?;
    let public = private.to_public_key();
    Ok(KeyPair {
        public: KeyMaterial::RsaPublic(public),
        private: KeyMaterial::RsaPrivate(private),
    })
}

/// Generates a P-256 ECDSA key pair.
pub fn generate_ec_key_pair() -> KeyPair {
    let private = SigningKey::random(&mut OsRng);
    let public = private.verifying_key().clone();
    KeyPair {
        public: KeyMaterial::EcPublic(public),
        private: KeyMaterial::EcPrivate(private),
    }
}

fn public_key_from_spki(der: &[u8]) -> CryptoResult<KeyMaterial> {
    let spki = SubjectPublicKeyInfoRef::try_from(der)
        .map_err(|e| invalid("SubjectPublicKeyInfo", e))?;
    let oid = spki.algorithm.oid;

    if oid == RSA_ENCRYPTION_OID {
        RsaPublicKey::from_public_key_der(der)
            .map(KeyMaterial::RsaPublic)
            .map_err(|e| invalid("SPKI RSA public key", e))
    } else if oid == EC_PUBLIC_KEY_OID {
        VerifyingKey::from_public_key_der(der)
            .map(KeyMaterial::EcPublic)
            .map_err(|e| invalid("SPKI P-256 public key", e))
    } else {
        Err(CryptoError::UnsupportedKeyFormat(format!(
            "public key algorithm {oid}"
        )))
    }
}

fn private_key_from_pkcs8(der: &[u8]) -> CryptoResult<KeyMaterial> {
    let info = PrivateKeyInfo::try_from(der).map_err(|e| invalid("PKCS#8 PrivateKeyInfo", e))?;
    let oid = info.algorithm.oid;

    if oid == RSA_ENCRYPTION_OID {
        RsaPrivateKey::from_pkcs8_der(der)
            .map(KeyMaterial::RsaPrivate)
            .map_err(|e| invalid("PKCS#8 RSA private key", e))
    } else if oid == EC_PUBLIC_KEY_OID {
        SigningKey::from_pkcs8_der(der)
            .map(KeyMaterial::EcPrivate)
            .map_err(|e| invalid("PKCS#8 P-256 private key", e))
    } else {
        Err(CryptoError::UnsupportedKeyFormat(format!(
            "private key algorithm {oid}"
        )))
    }
}

fn invalid(what: &str, err: impl fmt::Display) -> CryptoError {
    CryptoError::InvalidKeyMaterial(format!("cannot parse {what}: {err}"))
}

fn encode_err(err: impl fmt::Display) -> CryptoError {
    CryptoError::InvalidKeyMaterial(format!("cannot encode key: {err}"))
}
