//! Password-based record encryption
//!
//! Record layout produced by [`PasswordCipher`]:
//!
//! ```text
//! "SGX1" | salt (16) | nonce (24) | XChaCha20-Poly1305 ciphertext + tag
//! ```
//!
//! The key is derived from the password and salt with Argon2id, so every
//! record gets a fresh key even under the same password.

use std::fmt;

use argon2::{Algorithm, Argon2, Params, Version};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::RngCore;

use crate::error::{Result, SaveError};

/// Symmetric encode/decode of record bytes under a password
pub trait Cipher: Send + Sync {
    fn encode(&self, plain: &[u8], password: &str) -> Result<Vec<u8>>;

    /// Must fail with [`SaveError::Decryption`] on a wrong password or
    /// malformed input, never return garbage.
    fn decode(&self, data: &[u8], password: &str) -> Result<Vec<u8>>;

    fn name(&self) -> &str;
}

impl fmt::Debug for dyn Cipher + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cipher({})", self.name())
    }
}

const MAGIC: &[u8; 4] = b"SGX1";
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 24;
const KEY_LEN: usize = 32;
const HEADER_LEN: usize = MAGIC.len() + SALT_LEN + NONCE_LEN;

/// XChaCha20-Poly1305 with an Argon2id-derived key
#[derive(Clone)]
pub struct PasswordCipher {
    params: Params,
}

impl PasswordCipher {
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Custom Argon2 cost: memory in KiB and iteration count.
    ///
    /// Records must be decoded with the same cost they were encoded with.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self> {
        let params = Params::new(memory_kib, iterations, 1, Some(KEY_LEN))
            .map_err(|e| SaveError::Config(format!("invalid argon2 cost: {}", e)))?;
        Ok(Self { params })
    }

    fn derive_key(&self, password: &str, salt: &[u8]) -> Result<[u8; KEY_LEN]> {
        let mut key = [0u8; KEY_LEN];
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
            .hash_password_into(password.as_bytes(), salt, &mut key)
            .map_err(|e| SaveError::Encryption(format!("key derivation failed: {}", e)))?;
        Ok(key)
    }
}

impl Default for PasswordCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl Cipher for PasswordCipher {
    fn encode(&self, plain: &[u8], password: &str) -> Result<Vec<u8>> {
        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        let mut rng = rand::rng();
        rng.fill_bytes(&mut salt);
        rng.fill_bytes(&mut nonce);

        let key = self.derive_key(password, &salt)?;
        let ciphertext = XChaCha20Poly1305::new(Key::from_slice(&key))
            .encrypt(XNonce::from_slice(&nonce), plain)
            .map_err(|_| SaveError::Encryption("encryption failed".into()))?;

        let mut out = Vec::with_capacity(HEADER_LEN + ciphertext.len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&salt);
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    fn decode(&self, data: &[u8], password: &str) -> Result<Vec<u8>> {
        if data.len() < HEADER_LEN || &data[..MAGIC.len()] != MAGIC {
            return Err(SaveError::Decryption("data is not an encrypted record".into()));
        }
        let (salt, rest) = data[MAGIC.len()..].split_at(SALT_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        let key = self.derive_key(password, salt)?;
        XChaCha20Poly1305::new(Key::from_slice(&key))
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|_| SaveError::Decryption("wrong password or corrupted data".into()))
    }

    fn name(&self) -> &str {
        "xchacha20poly1305-argon2id"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> PasswordCipher {
        PasswordCipher::with_cost(64, 1).unwrap()
    }

    #[test]
    fn test_encode_decode() {
        let sealed = cipher().encode(b"wave 12, score 4500", "hunter2").unwrap();
        assert_eq!(&sealed[..4], b"SGX1");
        assert_ne!(&sealed[HEADER_LEN..], b"wave 12, score 4500");
        assert_eq!(cipher().decode(&sealed, "hunter2").unwrap(), b"wave 12, score 4500");
    }

    #[test]
    fn test_fresh_salt_per_record() {
        let a = cipher().encode(b"same", "pw").unwrap();
        let b = cipher().encode(b"same", "pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_password() {
        let sealed = cipher().encode(b"secret", "pw1").unwrap();
        let err = cipher().decode(&sealed, "pw2").unwrap_err();
        assert!(err.is_decryption_failure());
    }

    #[test]
    fn test_tampered_and_malformed() {
        let mut sealed = cipher().encode(b"secret", "pw").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert!(cipher().decode(&sealed, "pw").unwrap_err().is_decryption_failure());
        assert!(cipher().decode(b"\"plain json\"", "pw").unwrap_err().is_decryption_failure());
        assert!(cipher().decode(b"", "pw").unwrap_err().is_decryption_failure());
    }

    #[test]
    fn test_invalid_cost() {
        assert!(PasswordCipher::with_cost(0, 0).is_err());
    }
}
