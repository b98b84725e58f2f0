use sealpost_crypto::CryptoError;
use sealpost_envelope::{EnvelopeError, Stage};

#[test]
fn pipeline_error_display() {
    let err = EnvelopeError::at(Stage::Decrypt, CryptoError::AuthenticationFailed);
    assert_eq!(
        err.to_string(),
        "envelope decrypt failed: authentication failed (wrong key or tampered data)"
    );
}

#[test]
fn pipeline_error_exposes_stage_and_kind() {
    let err = EnvelopeError::at(
        Stage::Unwrap,
        CryptoError::DecryptionFailed("bad padding".into()),
    );
    assert_eq!(err.stage(), Some(Stage::Unwrap));
    assert!(matches!(err.kind(), Some(CryptoError::DecryptionFailed(_))));
    assert!(!err.is_integrity_failure());
}

#[test]
fn pipeline_error_source_is_crypto_error() {
    use std::error::Error;
    let err = EnvelopeError::at(Stage::Verify, CryptoError::SignatureVerificationFailed);
    let source = err.source().expect("source must be set");
    assert_eq!(source.to_string(), "signature verification failed");
    assert!(err.is_integrity_failure());
}

#[test]
fn stage_display() {
    let names: Vec<String> = [
        Stage::Compress,
        Stage::Encrypt,
        Stage::Wrap,
        Stage::Sign,
        Stage::Verify,
        Stage::Unwrap,
        Stage::Decrypt,
        Stage::Decompress,
        Stage::Serialize,
    ]
    .iter()
    .map(ToString::to_string)
    .collect();
    assert_eq!(
        names,
        [
            "compress",
            "encrypt",
            "wrap",
            "sign",
            "verify",
            "unwrap",
            "decrypt",
            "decompress",
            "serialize",
        ]
    );
}

#[test]
fn config_error_display() {
    let err = EnvelopeError::Config("compression_level must be 0-9, got 11".into());
    assert_eq!(err.to_string(), "invalid configuration: compression_level must be 0-9, got 11");
    assert_eq!(err.stage(), None);
    assert!(err.kind().is_none());
}

#[test]
fn crypto_error_outside_pipeline_has_no_stage() {
    let err = EnvelopeError::from(CryptoError::InvalidArgument("x".into()));
    assert_eq!(err.to_string(), "crypto error: invalid argument: x");
    assert_eq!(err.stage(), None);
    assert!(matches!(err.kind(), Some(CryptoError::InvalidArgument(_))));
    assert!(!err.is_integrity_failure());
}

#[test]
fn from_serde_json_error() {
    let json_err = serde_json::from_str::<serde_json::Value>("not valid json").unwrap_err();
    let env_err: EnvelopeError = json_err.into();
    assert!(env_err.to_string().contains("serialization error"));
}

// ── CryptoError display ──

#[test]
fn invalid_key_size_display() {
    let err = CryptoError::InvalidKeySize { expected: 32, actual: 16 };
    assert_eq!(err.to_string(), "invalid key size: expected 32 bytes, got 16");
}

#[test]
fn invalid_envelope_length_display() {
    let err = CryptoError::InvalidEnvelopeLength { min: 28, actual: 5 };
    assert_eq!(err.to_string(), "invalid envelope length: got 5 bytes, minimum is 28");
}

#[test]
fn invalid_base64_display() {
    let err = CryptoError::InvalidBase64("payload");
    assert_eq!(err.to_string(), "invalid base64 in payload");
}

#[test]
fn malformed_pem_display() {
    let err = CryptoError::MalformedPem("no \"PUBLIC KEY\" block found".into());
    assert_eq!(err.to_string(), "malformed PEM: no \"PUBLIC KEY\" block found");
}

#[test]
fn unsupported_key_format_display() {
    let err = CryptoError::UnsupportedKeyFormat("CERTIFICATE".into());
    assert_eq!(err.to_string(), "unsupported key format: CERTIFICATE");
}

#[test]
fn compression_failed_display() {
    let err = CryptoError::CompressionFailed("broken pipe".into());
    assert_eq!(err.to_string(), "compression failed: broken pipe");
    assert!(!err.is_integrity_failure());

    let err = EnvelopeError::at(Stage::Compress, err);
    assert_eq!(err.to_string(), "envelope compress failed: compression failed: broken pipe");
}

#[test]
fn integrity_failures_are_distinguished() {
    assert!(CryptoError::AuthenticationFailed.is_integrity_failure());
    assert!(CryptoError::SignatureVerificationFailed.is_integrity_failure());
    assert!(!CryptoError::InvalidCompressedData("x".into()).is_integrity_failure());
    assert!(!CryptoError::InvalidArgument("x".into()).is_integrity_failure());
}
