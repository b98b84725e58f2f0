//! Shared test helpers: cached key pairs and log setup.
#![allow(dead_code)]

use sealpost_crypto::{generate_ec_key_pair, generate_rsa_key_pair, KeyPair, DEFAULT_RSA_BITS};
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// Installs a test log subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Recipient RSA-2048 pair, generated once per test binary.
pub fn recipient() -> &'static KeyPair {
    static PAIR: OnceLock<KeyPair> = OnceLock::new();
    PAIR.get_or_init(|| generate_rsa_key_pair(DEFAULT_RSA_BITS).expect("RSA keygen must succeed"))
}

/// A second RSA-2048 pair that must never open the first one's envelopes.
pub fn other_recipient() -> &'static KeyPair {
    static PAIR: OnceLock<KeyPair> = OnceLock::new();
    PAIR.get_or_init(|| generate_rsa_key_pair(DEFAULT_RSA_BITS).expect("RSA keygen must succeed"))
}

/// Sender P-256 signing pair.
pub fn sender() -> &'static KeyPair {
    static PAIR: OnceLock<KeyPair> = OnceLock::new();
    PAIR.get_or_init(generate_ec_key_pair)
}
