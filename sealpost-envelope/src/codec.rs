//! Envelope seal/open orchestration.
//!
//! Seal runs `compress -> encrypt -> wrap -> sign?`; open runs
//! `verify? -> unwrap -> decrypt -> decompress`. Each call generates its
//! own content key and IV and holds no state afterwards. A failure at any
//! step aborts the call; no partial envelope or plaintext is returned.

use crate::config::EnvelopeConfig;
use crate::error::{AtStage, EnvelopeError, EnvelopeResult, Stage};
use crate::types::{Envelope, Link, OpenedEnvelope};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use sealpost_crypto::{
    compression, key_wrap, signer, CryptoError, KeyMaterial, KeyPair, SymmetricKey,
    SEALED_OVERHEAD,
};
use tracing::{debug, warn};

/// Inputs for [`EnvelopeCodec::seal`].
pub struct SealRequest<'a> {
    plaintext: &'a [u8],
    recipient: &'a KeyMaterial,
    public_key_version: String,
    signer: Option<(&'a KeyMaterial, String)>,
    links: Vec<Link>,
}

impl<'a> SealRequest<'a> {
    /// Seals `plaintext` for the holder of `recipient`'s private half.
    pub fn new(
        plaintext: &'a [u8],
        recipient: &'a KeyMaterial,
        public_key_version: impl Into<String>,
    ) -> Self {
        Self {
            plaintext,
            recipient,
            public_key_version: public_key_version.into(),
            signer: None,
            links: Vec::new(),
        }
    }

    /// Signs the sealed payload with a P-256 private key.
    pub fn signed_by(
        mut self,
        private_key: &'a KeyMaterial,
        key_version: impl Into<String>,
    ) -> Self {
        self.signer = Some((private_key, key_version.into()));
        self
    }

    pub fn with_links(mut self, links: Vec<Link>) -> Self {
        self.links = links;
        self
    }
}

/// Inputs for [`EnvelopeCodec::open`].
pub struct OpenRequest<'a> {
    envelope: &'a Envelope,
    recipient: &'a KeyMaterial,
    verifying_key: Option<&'a KeyMaterial>,
}

impl<'a> OpenRequest<'a> {
    /// Opens `envelope` with the recipient's RSA private key.
    pub fn new(envelope: &'a Envelope, recipient: &'a KeyMaterial) -> Self {
        Self {
            envelope,
            recipient,
            verifying_key: None,
        }
    }

    /// Sender public key used to check the envelope signature.
    pub fn verified_by(mut self, public_key: &'a KeyMaterial) -> Self {
        self.verifying_key = Some(public_key);
        self
    }
}

/// Seals and opens envelopes under a fixed configuration.
#[derive(Clone, Debug, Default)]
pub struct EnvelopeCodec {
    config: EnvelopeConfig,
}

impl EnvelopeCodec {
    pub fn new(config: EnvelopeConfig) -> EnvelopeResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    /// Generates a recipient RSA key pair of the configured size.
    pub fn generate_recipient_keys(&self) -> EnvelopeResult<KeyPair> {
        self.config.validate()?;
        Ok(sealpost_crypto::generate_rsa_key_pair(self.config.rsa_key_bits)?)
    }

    pub fn seal(&self, request: SealRequest<'_>) -> EnvelopeResult<Envelope> {
        debug!(
            plaintext_len = request.plaintext.len(),
            public_key_version = %request.public_key_version,
            signed = request.signer.is_some(),
            "sealing envelope"
        );

        let compressed =
            compression::compress_with_level(request.plaintext, self.config.compression_level)
                .at(Stage::Compress)?;

        let content_key = SymmetricKey::generate();
        let sealed = content_key.encrypt(&compressed).at(Stage::Encrypt)?;
        let payload = BASE64.encode(&sealed);

        let encryption_key = key_wrap::wrap(&content_key, request.recipient).at(Stage::Wrap)?;

        let (signature, signature_key_version) = match request.signer {
            Some((private_key, key_version)) => {
                let signature = signer::sign(payload.as_bytes(), private_key).at(Stage::Sign)?;
                (Some(signature), Some(key_version))
            }
            None => (None, None),
        };

        debug!(sealed_len = sealed.len(), "envelope sealed");
        Ok(Envelope {
            payload,
            encryption_key,
            public_key_version: request.public_key_version,
            signature,
            signature_key_version,
            links: request.links,
        })
    }

    pub fn open(&self, request: OpenRequest<'_>) -> EnvelopeResult<OpenedEnvelope> {
        let envelope = request.envelope;
        debug!(
            public_key_version = %envelope.public_key_version,
            signed = envelope.is_signed(),
            "opening envelope"
        );

        let signature_key_version = self.verify_signature(envelope, request.verifying_key)?;

        let sealed = BASE64
            .decode(envelope.payload.trim())
            .map_err(|_| CryptoError::InvalidBase64("payload"))
            .at(Stage::Decrypt)?;
        // A gzip member is never empty, so a bare IV and tag is not a valid envelope.
        if sealed.len() <= SEALED_OVERHEAD {
            return Err(EnvelopeError::at(
                Stage::Decrypt,
                CryptoError::InvalidEnvelopeLength {
                    min: SEALED_OVERHEAD + 1,
                    actual: sealed.len(),
                },
            ));
        }

        let content_key =
            key_wrap::unwrap(&envelope.encryption_key, request.recipient).at(Stage::Unwrap)?;

        let compressed = content_key.decrypt(&sealed).map_err(|e| {
            if e.is_integrity_failure() {
                warn!(sealed_len = sealed.len(), "envelope payload failed authentication");
            }
            EnvelopeError::at(Stage::Decrypt, e)
        })?;

        let payload = compression::decompress(&compressed).at(Stage::Decompress)?;

        debug!(payload_len = payload.len(), "envelope opened");
        Ok(OpenedEnvelope {
            payload,
            public_key_version: envelope.public_key_version.clone(),
            signature_key_version: signature_key_version.map(str::to_string),
            links: envelope.links.clone(),
        })
    }

    /// Checks the envelope signature, returning the verified signing key version.
    ///
    /// A `signatureKeyVersion` without a signature marks an unsigned envelope;
    /// a signature without its key version is refused.
    fn verify_signature<'e>(
        &self,
        envelope: &'e Envelope,
        verifying_key: Option<&KeyMaterial>,
    ) -> EnvelopeResult<Option<&'e str>> {
        let Some(signature) = &envelope.signature else {
            if self.config.require_signature {
                warn!("unsigned envelope rejected");
                return Err(EnvelopeError::at(
                    Stage::Verify,
                    CryptoError::SignatureVerificationFailed,
                ));
            }
            return Ok(None);
        };
        let Some(key_version) = envelope.signature_key_version.as_deref() else {
            return Err(EnvelopeError::at(
                Stage::Verify,
                CryptoError::InvalidArgument(
                    "payloadSignature requires a signatureKeyVersion".to_string(),
                ),
            ));
        };
        let Some(public_key) = verifying_key else {
            return Err(EnvelopeError::at(
                Stage::Verify,
                CryptoError::InvalidArgument(
                    "envelope is signed but no verifying key was supplied".to_string(),
                ),
            ));
        };

        let verified =
            signer::verify(envelope.payload.as_bytes(), signature, public_key).at(Stage::Verify)?;
        if !verified {
            warn!(signature_key_version = %key_version, "envelope signature rejected");
            return Err(EnvelopeError::at(
                Stage::Verify,
                CryptoError::SignatureVerificationFailed,
            ));
        }
        debug!(signature_key_version = %key_version, "signature verified");
        Ok(Some(key_version))
    }
}
