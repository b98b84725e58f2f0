//! Wire and result types for the envelope pipeline.

use crate::error::EnvelopeResult;
use serde::{Deserialize, Serialize};

/// A sealed envelope as exchanged with the counterpart system.
///
/// `payload` is base64 of `iv || ciphertext || tag` over the gzip-compressed
/// plaintext. `encryption_key` is base64 of the RSA-wrapped content key.
/// `signature` and `signature_key_version` are present together or not at
/// all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub payload: String,
    pub encryption_key: String,
    pub public_key_version: String,
    /// Base64 DER ECDSA signature over the `payload` text.
    #[serde(
        rename = "payloadSignature",
        alias = "signature",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_key_version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Envelope {
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    pub fn to_json(&self) -> EnvelopeResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> EnvelopeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Related-resource descriptor carried through the envelope untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Link {
    pub fn new(href: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            rel: Some(rel.into()),
            description: None,
        }
    }
}

/// Plaintext and metadata recovered by opening an envelope.
///
/// `signature_key_version` is `Some` only when a signature was present and
/// verified before decryption.
#[derive(Clone, PartialEq, Eq)]
pub struct OpenedEnvelope {
    pub payload: Vec<u8>,
    pub public_key_version: String,
    pub signature_key_version: Option<String>,
    pub links: Vec<Link>,
}

impl OpenedEnvelope {
    pub fn was_signed(&self) -> bool {
        self.signature_key_version.is_some()
    }
}

impl std::fmt::Debug for OpenedEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenedEnvelope")
            .field("payload_len", &self.payload.len())
            .field("public_key_version", &self.public_key_version)
            .field("signature_key_version", &self.signature_key_version)
            .field("links", &self.links)
            .finish()
    }
}
