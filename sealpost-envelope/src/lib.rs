//! Envelope encryption and signing for sealpost.
//!
//! Turns an arbitrary byte payload into an [`Envelope`] that only the
//! holder of a given RSA private key can open:
//! - gzip compression before encryption
//! - AES-256-GCM under a fresh content key per envelope
//! - RSA key wrapping of the content key for the recipient
//! - Optional ECDSA P-256 signature, checked before any decryption
//!
//! Envelopes serialize to the JSON shape the counterpart system exchanges
//! (`payload`, `encryptionKey`, `publicKeyVersion`, `payloadSignature`,
//! `signatureKeyVersion`, `links`).

pub mod codec;
pub mod config;
pub mod error;
pub mod types;

pub use codec::{EnvelopeCodec, OpenRequest, SealRequest};
pub use config::EnvelopeConfig;
pub use error::{EnvelopeError, EnvelopeResult, Stage};
pub use types::*;
