//! Envelope pipeline error types.

use sealpost_crypto::CryptoError;
use std::fmt;
use thiserror::Error;

/// Result type for envelope operations.
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;

/// Pipeline step at which a seal or open failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Compress,
    Encrypt,
    Wrap,
    Sign,
    Verify,
    Unwrap,
    Decrypt,
    Decompress,
    Serialize,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::Compress => "compress",
            Stage::Encrypt => "encrypt",
            Stage::Wrap => "wrap",
            Stage::Sign => "sign",
            Stage::Verify => "verify",
            Stage::Unwrap => "unwrap",
            Stage::Decrypt => "decrypt",
            Stage::Decompress => "decompress",
            Stage::Serialize => "serialize",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while sealing or opening an envelope.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("envelope {stage} failed: {source}")]
    Pipeline {
        stage: Stage,
        #[source]
        source: CryptoError,
    },

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EnvelopeError {
    pub fn at(stage: Stage, source: CryptoError) -> Self {
        EnvelopeError::Pipeline { stage, source }
    }

    /// The pipeline step that failed, if the failure came from the pipeline.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            EnvelopeError::Pipeline { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The underlying primitive error, if any.
    pub fn kind(&self) -> Option<&CryptoError> {
        match self {
            EnvelopeError::Pipeline { source, .. } | EnvelopeError::Crypto(source) => Some(source),
            _ => None,
        }
    }

    /// True when the envelope was tampered with or signed by someone else.
    pub fn is_integrity_failure(&self) -> bool {
        self.kind().is_some_and(CryptoError::is_integrity_failure)
    }
}

/// Tags a primitive result with the stage it ran in.
pub(crate) trait AtStage<T> {
    fn at(self, stage: Stage) -> EnvelopeResult<T>;
}

impl<T> AtStage<T> for Result<T, CryptoError> {
    fn at(self, stage: Stage) -> EnvelopeResult<T> {
        self.map_err(|source| EnvelopeError::at(stage, source))
    }
}
