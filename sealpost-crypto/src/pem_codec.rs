//! PEM armor for key material.
//!
//! Decoding accepts either line-ending convention and any amount of
//! surrounding whitespace. Encoding always emits RFC 7468 text with
//! 64-character base64 lines and `\n` line endings, so output is identical
//! on every host.

use crate::error::{CryptoError, CryptoResult};
use ::pem::{EncodeConfig, LineEnding, Pem};
use std::fmt;

/// Base64 characters per line in encoded PEM.
pub const LINE_WRAP: usize = 64;

/// PEM labels understood by key import.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PemLabel {
    /// SubjectPublicKeyInfo (RSA or EC).
    PublicKey,
    /// PKCS#8 private key (RSA or EC).
    PrivateKey,
    /// PKCS#1 RSA private key.
    RsaPrivateKey,
    /// SEC1 EC private key.
    EcPrivateKey,
    /// PKCS#1 RSA public key.
    RsaPublicKey,
}

impl PemLabel {
    pub const ALL: [PemLabel; 5] = [
        PemLabel::PublicKey,
        PemLabel::PrivateKey,
        PemLabel::RsaPrivateKey,
        PemLabel::EcPrivateKey,
        PemLabel::RsaPublicKey,
    ];

    /// Returns the label text as it appears between the dashes.
    pub const fn as_str(self) -> &'static str {
        match self {
            PemLabel::PublicKey => "PUBLIC KEY",
            PemLabel::PrivateKey => "PRIVATE KEY",
            PemLabel::RsaPrivateKey => "RSA PRIVATE KEY",
            PemLabel::EcPrivateKey => "EC PRIVATE KEY",
            PemLabel::RsaPublicKey => "RSA PUBLIC KEY",
        }
    }

    /// Maps a PEM tag to a known label.
    pub fn from_tag(tag: &str) -> CryptoResult<Self> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == tag)
            .ok_or_else(|| CryptoError::UnsupportedKeyFormat(format!("PEM label \"{tag}\"")))
    }

    /// Returns true for labels carrying private key material.
    pub const fn is_private(self) -> bool {
        matches!(
            self,
            PemLabel::PrivateKey | PemLabel::RsaPrivateKey | PemLabel::EcPrivateKey
        )
    }
}

impl fmt::Display for PemLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracts the DER bytes of the first block labeled `expected_label`.
///
/// Fails with `MalformedPem` when no such block exists, when any block's
/// BEGIN and END labels differ, or when the base64 body does not decode.
pub fn decode(pem: &str, expected_label: &str) -> CryptoResult<Vec<u8>> {
    let blocks = ::pem::parse_many(pem).map_err(malformed)?;
    blocks
        .into_iter()
        .find(|block| block.tag() == expected_label)
        .map(Pem::into_contents)
        .ok_or_else(|| {
            CryptoError::MalformedPem(format!("no \"{expected_label}\" block found"))
        })
}

/// Armors DER bytes under `label`.
pub fn encode(label: &str, der: &[u8]) -> String {
    let block = Pem::new(label, der.to_vec());
    ::pem::encode_config(&block, EncodeConfig::new().set_line_ending(LineEnding::LF))
}

/// Returns the label of the first PEM block in `pem`.
pub fn detect_label(pem: &str) -> CryptoResult<PemLabel> {
    let block = ::pem::parse(pem).map_err(malformed)?;
    PemLabel::from_tag(block.tag())
}

/// Parses the first PEM block, returning its recognized label and DER body.
pub(crate) fn parse_block(pem: &str) -> CryptoResult<(PemLabel, Vec<u8>)> {
    let block = ::pem::parse(pem).map_err(malformed)?;
    let label = PemLabel::from_tag(block.tag())?;
    Ok((label, block.into_contents()))
}

fn malformed(err: ::pem::PemError) -> CryptoError {
    CryptoError::MalformedPem(err.to_string())
}
