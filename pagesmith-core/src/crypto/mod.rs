use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::sync::Arc;

use crate::Error;

const NONCE_LEN: usize = 12;

/// AES-256-GCM encryptor for access tokens at rest.
///
/// Output format is base64(`nonce || ciphertext`); a fresh 12-byte nonce is
/// drawn for every encryption.
#[derive(Clone)]
pub struct Encryptor {
    cipher: Arc<Aes256Gcm>,
}

impl Encryptor {
    pub fn new(key_bytes: &[u8]) -> Result<Self, Error> {
        if key_bytes.len() != 32 {
            return Err(Error::KeyDerivation(format!(
                "AES-256 key must be 32 bytes, got {}",
                key_bytes.len()
            )));
        }
        let key = Key::<Aes256Gcm>::from_slice(key_bytes);
        Ok(Self {
            cipher: Arc::new(Aes256Gcm::new(key)),
        })
    }

    /// Build from the base64-encoded key kept in configuration.
    pub fn from_base64(key_b64: &str) -> Result<Self, Error> {
        let key_bytes = BASE64
            .decode(key_b64)
            .map_err(|e| Error::KeyDerivation(format!("encryption key is not valid base64: {}", e)))?;
        Self::new(&key_bytes)
    }

    pub fn encrypt(&self, data: &str) -> Result<String, Error> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, data.as_bytes())
            .map_err(|e| Error::Encryption(e.to_string()))?;

        let mut combined = nonce.to_vec();
        combined.extend(ciphertext);
        Ok(BASE64.encode(combined))
    }

    pub fn decrypt(&self, encrypted_data: &str) -> Result<String, Error> {
        let data = BASE64
            .decode(encrypted_data)
            .map_err(|e| Error::Decryption(e.to_string()))?;
        if data.len() < NONCE_LEN {
            return Err(Error::Decryption(
                "ciphertext too short (missing nonce)".to_string(),
            ));
        }
        let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| Error::Decryption(e.to_string()))?;
        String::from_utf8(plaintext).map_err(|e| Error::Decryption(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_encryptor() -> Encryptor {
        Encryptor::new(&[7u8; 32]).unwrap()
    }

    #[test]
    fn round_trip() {
        let enc = test_encryptor();
        let token = "EAAB-some-page-access-token";
        let sealed = enc.encrypt(token).unwrap();
        assert_ne!(sealed, token);
        assert_eq!(enc.decrypt(&sealed).unwrap(), token);
    }

    #[test]
    fn fresh_nonce_every_time() {
        let enc = test_encryptor();
        let a = enc.encrypt("same input").unwrap();
        let b = enc.encrypt("same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_fails() {
        let sealed = test_encryptor().encrypt("secret").unwrap();
        let other = Encryptor::new(&[8u8; 32]).unwrap();
        assert!(matches!(other.decrypt(&sealed), Err(Error::Decryption(_))));
    }

    #[test]
    fn short_key_rejected() {
        assert!(matches!(
            Encryptor::new(&[0u8; 16]),
            Err(Error::KeyDerivation(_))
        ));
    }

    #[test]
    fn from_base64_round_trip() {
        let key_b64 = BASE64.encode([9u8; 32]);
        let enc = Encryptor::from_base64(&key_b64).unwrap();
        let sealed = enc.encrypt("hello").unwrap();
        assert_eq!(enc.decrypt(&sealed).unwrap(), "hello");
    }
}
