//! Envelope pipeline configuration.

use crate::error::{EnvelopeError, EnvelopeResult};
use sealpost_crypto::{compression, DEFAULT_RSA_BITS, MIN_RSA_BITS};
use serde::{Deserialize, Serialize};

/// Configuration for the envelope codec.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// gzip level applied before encryption (0-9).
    pub compression_level: u32,

    /// Modulus size for recipient keys generated through this config.
    pub rsa_key_bits: usize,

    /// Reject envelopes that carry no signature.
    pub require_signature: bool,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            compression_level: compression::DEFAULT_LEVEL,
            rsa_key_bits: DEFAULT_RSA_BITS,
            require_signature: false,
        }
    }
}

impl EnvelopeConfig {
    /// Config that refuses unsigned envelopes.
    pub fn signed_only() -> Self {
        Self {
            require_signature: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> EnvelopeResult<()> {
        if self.compression_level > 9 {
            return Err(EnvelopeError::Config(format!(
                "compression_level must be 0-9, got {}",
                self.compression_level
            )));
        }
        if self.rsa_key_bits < MIN_RSA_BITS {
            return Err(EnvelopeError::Config(format!(
                "rsa_key_bits must be at least {MIN_RSA_BITS}, got {}",
                self.rsa_key_bits
            )));
        }
        Ok(())
    }
}
