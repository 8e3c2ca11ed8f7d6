//! Password hashing, API key generation, and secret-at-rest encryption.
//! `bcrypt` and `aes-gcm` usage mirrors the pack's standard pairing for
//! these two concerns (see `other_examples` Cargo manifests).

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine as _;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::ApiError;

const BCRYPT_COST: u32 = 12;

pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    bcrypt::hash(plain, BCRYPT_COST).map_err(ApiError::internal)
}

pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

/// Mints a new bearer key: `tck_` + 32 random bytes, base64url-encoded.
/// Login always mints a fresh key rather than rotating an existing one.
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!(
        "tck_{}",
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
    )
}

/// Random URL-safe token of `len` bytes' entropy, used for generated
/// credentials (managed database/cache passwords).
pub fn random_token(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// AES-256-GCM envelope for secret values. The key is derived once from the
/// server's master secret (`SHA-256` of the configured passphrase) so the
/// same config always decrypts the same ciphertexts.
pub struct SecretCipher {
    cipher: Aes256Gcm,
}

impl SecretCipher {
    pub fn new(master_secret: &str) -> Self {
        let key_bytes = Sha256::digest(master_secret.as_bytes());
        let key = Key::<Aes256Gcm>::from_slice(&key_bytes);
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Encrypts `plaintext`, returning `base64(nonce || ciphertext)`.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, ApiError> {
        let mut nonce_bytes = [0u8; 12];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| ApiError::Internal("failed to encrypt secret".into()))?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend_from_slice(&ciphertext);
        Ok(base64::engine::general_purpose::STANDARD.encode(combined))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String, ApiError> {
        let combined = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|_| ApiError::Internal("corrupt secret envelope".into()))?;
        if combined.len() < 12 {
            return Err(ApiError::Internal("corrupt secret envelope".into()));
        }
        let (nonce_bytes, ciphertext) = combined.split_at(12);
        let nonce = Nonce::from_slice(nonce_bytes);
        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| ApiError::Internal("failed to decrypt secret".into()))?;
        String::from_utf8(plaintext).map_err(|_| ApiError::Internal("corrupt secret envelope".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trips() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn api_keys_are_unique_and_prefixed() {
        let a = generate_api_key();
        let b = generate_api_key();
        assert_ne!(a, b);
        assert!(a.starts_with("tck_"));
    }

    #[test]
    fn secret_cipher_round_trips() {
        let cipher = SecretCipher::new("test-master-secret");
        let ciphertext = cipher.encrypt("db-password-123").unwrap();
        assert_ne!(ciphertext, "db-password-123");
        assert_eq!(cipher.decrypt(&ciphertext).unwrap(), "db-password-123");
    }

    #[test]
    fn wrong_key_fails_to_decrypt() {
        let a = SecretCipher::new("key-a");
        let b = SecretCipher::new("key-b");
        let ciphertext = a.encrypt("value").unwrap();
        assert!(b.decrypt(&ciphertext).is_err());
    }
}
