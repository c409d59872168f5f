//! Test support: trait mocks, router state, and on-disk key fixtures.
//!
//! Compiled unconditionally so the integration suites under `tests/` can use
//! it; nothing here is part of the service's runtime behavior.

pub mod mocks;

pub use mocks::{MockCipher, MockConfig, MockEngineClient};

use std::sync::Arc;

use crate::app::AppState;

/// App state wired to succeeding mocks, for router-level tests.
#[must_use]
pub fn test_state() -> Arc<AppState> {
    Arc::new(AppState::new(
        Arc::new(MockEngineClient::new()),
        Arc::new(MockCipher::new()),
    ))
}

/// On-disk RSA key fixtures for cipher tests.
pub mod keys {
    use std::path::Path;

    use rand::rngs::OsRng;
    use rsa::RsaPrivateKey;
    use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};

    /// Generate a key pair and write the PEM files the cipher expects
    /// (`public_key.pem` / `private_key.pem`) into `dir`.
    ///
    /// 1024-bit keys keep test key generation fast; use 2048 where the
    /// production OAEP bound matters.
    pub fn write_key_pair(dir: &Path, bits: usize) {
        let mut rng = OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, bits).expect("generate RSA key");
        let public_key = private_key.to_public_key();

        let private_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .expect("encode private key");
        let public_pem = public_key
            .to_public_key_pem(LineEnding::LF)
            .expect("encode public key");

        std::fs::write(dir.join("private_key.pem"), private_pem.as_bytes())
            .expect("write private key");
        std::fs::write(dir.join("public_key.pem"), public_pem).expect("write public key");
    }
}
