use pretty_assertions::assert_eq;
use sealpost_envelope::{Envelope, EnvelopeError, Link};
use serde_json::{json, Value};

fn signed_envelope() -> Envelope {
    Envelope {
        payload: "cGF5bG9hZA==".into(),
        encryption_key: "a2V5".into(),
        public_key_version: "pk-3".into(),
        signature: Some("c2ln".into()),
        signature_key_version: Some("sig-7".into()),
        links: vec![Link::new("https://example.test/a", "self")],
    }
}

// --- Envelope JSON ---

#[test]
fn envelope_uses_wire_field_names() {
    let value: Value = serde_json::from_str(&signed_envelope().to_json().unwrap()).unwrap();
    assert_eq!(
        value,
        json!({
            "payload": "cGF5bG9hZA==",
            "encryptionKey": "a2V5",
            "publicKeyVersion": "pk-3",
            "payloadSignature": "c2ln",
            "signatureKeyVersion": "sig-7",
            "links": [{ "href": "https://example.test/a", "rel": "self" }]
        })
    );
}

#[test]
fn unsigned_envelope_omits_optional_fields() {
    let envelope = Envelope {
        signature: None,
        signature_key_version: None,
        links: Vec::new(),
        ..signed_envelope()
    };
    let value: Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();
    let object = value.as_object().unwrap();

    assert_eq!(object.len(), 3);
    assert!(!object.contains_key("payloadSignature"));
    assert!(!object.contains_key("signatureKeyVersion"));
    assert!(!object.contains_key("links"));
}

#[test]
fn envelope_json_roundtrip() {
    let envelope = signed_envelope();
    let parsed = Envelope::from_json(&envelope.to_json().unwrap()).unwrap();
    assert_eq!(parsed, envelope);
}

#[test]
fn signature_alias_accepted() {
    let json = r#"{
        "payload": "cA==",
        "encryptionKey": "aw==",
        "publicKeyVersion": "1",
        "signature": "c2ln",
        "signatureKeyVersion": "2"
    }"#;
    let envelope = Envelope::from_json(json).unwrap();
    assert_eq!(envelope.signature.as_deref(), Some("c2ln"));
    assert!(envelope.is_signed());
    assert!(envelope.links.is_empty());
}

#[test]
fn missing_payload_is_serialization_error() {
    let json = r#"{"encryptionKey":"aw==","publicKeyVersion":"1"}"#;
    let err = Envelope::from_json(json).unwrap_err();
    assert!(matches!(err, EnvelopeError::Serialization(_)));
}

// --- Link ---

#[test]
fn link_keeps_only_present_fields() {
    let link = Link {
        description: Some("terms and conditions".into()),
        ..Link::default()
    };
    assert_eq!(
        serde_json::to_value(&link).unwrap(),
        json!({ "description": "terms and conditions" })
    );
}

#[test]
fn link_ignores_unknown_fields() {
    let link: Link = serde_json::from_str(r#"{"href":"h","rel":"r","method":"GET"}"#).unwrap();
    assert_eq!(link, Link::new("h", "r"));
}
