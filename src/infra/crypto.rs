//! RSA-OAEP message cipher over the gateway key pair.
//!
//! Wraps the `rsa` crate; no cryptographic algorithm lives here. Key material
//! is PEM text at `<keys dir>/public_key.pem` and `<keys dir>/private_key.pem`,
//! read fresh from disk on every call, never cached or rotated. The private
//! key PEM is held in `SecretString` and exposed only inside the parse.

use std::fs;
use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::domain::{CryptoError, MessageCipher};

const PUBLIC_KEY_FILE: &str = "public_key.pem";
const PRIVATE_KEY_FILE: &str = "private_key.pem";
const DEFAULT_KEYS_DIR: &str = "keys";

/// OAEP overhead for SHA-256: two digests plus two separator bytes.
const OAEP_OVERHEAD: usize = 2 * 32 + 2;

/// Cipher bound to a directory holding the gateway PEM key pair.
pub struct RsaMessageCipher {
    keys_dir: PathBuf,
}

impl RsaMessageCipher {
    pub fn new(keys_dir: impl Into<PathBuf>) -> Self {
        Self {
            keys_dir: keys_dir.into(),
        }
    }

    /// Cipher over the conventional `keys/` directory.
    #[must_use]
    pub fn with_default_dir() -> Self {
        Self::new(DEFAULT_KEYS_DIR)
    }

    fn read_pem(&self, file: &str) -> Result<String, CryptoError> {
        let path = self.keys_dir.join(file);
        fs::read_to_string(&path).map_err(|e| CryptoError::KeyUnavailable {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Parse the public key, accepting SPKI (`BEGIN PUBLIC KEY`) with a
    /// PKCS#1 (`BEGIN RSA PUBLIC KEY`) fallback.
    fn load_public_key(&self) -> Result<RsaPublicKey, CryptoError> {
        let pem = self.read_pem(PUBLIC_KEY_FILE)?;
        match RsaPublicKey::from_public_key_pem(&pem) {
            Ok(key) => Ok(key),
            Err(_) => RsaPublicKey::from_pkcs1_pem(&pem)
                .map_err(|e| CryptoError::InvalidKey(e.to_string())),
        }
    }

    /// Parse the private key, accepting PKCS#8 with a PKCS#1 fallback.
    /// The PEM text leaves the `SecretString` only within this scope.
    fn load_private_key(&self) -> Result<RsaPrivateKey, CryptoError> {
        let pem = SecretString::from(self.read_pem(PRIVATE_KEY_FILE)?);
        let exposed = pem.expose_secret();
        match RsaPrivateKey::from_pkcs8_pem(exposed) {
            Ok(key) => Ok(key),
            Err(_) => RsaPrivateKey::from_pkcs1_pem(exposed)
                .map_err(|e| CryptoError::InvalidKey(e.to_string())),
        }
    }
}

fn oaep_limit(key: &RsaPublicKey) -> usize {
    key.size().saturating_sub(OAEP_OVERHEAD)
}

impl MessageCipher for RsaMessageCipher {
    fn seal(&self, plaintext: &str) -> Result<String, CryptoError> {
        let public_key = self.load_public_key()?;
        let max = oaep_limit(&public_key);
        let bytes = plaintext.as_bytes();
        if bytes.len() > max {
            return Err(CryptoError::PayloadTooLarge {
                len: bytes.len(),
                max,
            });
        }

        // SHA-256 for both the label hash and MGF1.
        let padding = Oaep::new::<Sha256>();
        let mut rng = OsRng;
        let ciphertext = public_key
            .encrypt(&mut rng, padding, bytes)
            .map_err(|e| CryptoError::Encrypt(e.to_string()))?;
        Ok(BASE64.encode(ciphertext))
    }

    fn open(&self, ciphertext: &str) -> Result<String, CryptoError> {
        let private_key = self.load_private_key()?;
        let raw = BASE64
            .decode(ciphertext)
            .map_err(|e| CryptoError::InvalidCiphertext(e.to_string()))?;

        let padding = Oaep::new::<Sha256>();
        let plaintext = private_key
            .decrypt(padding, &raw)
            .map_err(|e| CryptoError::Decrypt(e.to_string()))?;
        String::from_utf8(plaintext).map_err(|e| CryptoError::InvalidPlaintext(e.to_string()))
    }

    fn max_plaintext_len(&self) -> Result<usize, CryptoError> {
        Ok(oaep_limit(&self.load_public_key()?))
    }
}
