//! Passphrase-based symmetric encryption.
//!
//! Keys are derived with PBKDF2-HMAC-SHA256 and payloads sealed with
//! AES-256-GCM. The random nonce is prefixed to the ciphertext, and string
//! payloads travel as base64.

use crate::{LatticeError, LatticeResult};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use rand::RngCore;
use ring::pbkdf2;
use std::num::NonZeroU32;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const MIN_SALT_LEN: usize = 8;
const PBKDF2_ITERATIONS: u32 = 100_000;

/// A symmetric cipher bound to a passphrase-derived key.
pub struct Cipher {
    aead: Aes256Gcm,
}

impl Cipher {
    /// Derives a key from `passphrase` and `salt`. The salt must be at
    /// least 8 bytes.
    pub fn new(passphrase: &str, salt: &[u8]) -> LatticeResult<Self> {
        if passphrase.is_empty() {
            return Err(LatticeError::invalid_input("passphrase must not be empty"));
        }
        if salt.len() < MIN_SALT_LEN {
            return Err(LatticeError::invalid_input(format!(
                "salt must be at least {MIN_SALT_LEN} bytes"
            )));
        }

        let iterations = NonZeroU32::new(PBKDF2_ITERATIONS)
            .ok_or_else(|| LatticeError::crypto("invalid iteration count"))?;
        let mut key = [0u8; KEY_LEN];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            iterations,
            salt,
            passphrase.as_bytes(),
            &mut key,
        );

        let aead = Aes256Gcm::new_from_slice(&key)
            .map_err(|_| LatticeError::crypto("derived key has wrong length"))?;
        Ok(Self { aead })
    }

    /// Seals `plaintext`, returning nonce-prefixed ciphertext.
    pub fn encrypt(&self, plaintext: &[u8]) -> LatticeResult<Vec<u8>> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let ciphertext = self
            .aead
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| LatticeError::crypto("encryption failed"))?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Opens nonce-prefixed ciphertext produced by [`encrypt`].
    ///
    /// [`encrypt`]: Cipher::encrypt
    pub fn decrypt(&self, bytes: &[u8]) -> LatticeResult<Vec<u8>> {
        if bytes.len() <= NONCE_LEN {
            return Err(LatticeError::crypto("ciphertext too short"));
        }
        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        self.aead
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| LatticeError::crypto("decryption failed"))
    }

    /// Seals a string, returning base64.
    pub fn encrypt_string(&self, plaintext: &str) -> LatticeResult<String> {
        Ok(base64::engine::general_purpose::STANDARD.encode(self.encrypt(plaintext.as_bytes())?))
    }

    /// Opens base64 produced by [`encrypt_string`].
    ///
    /// [`encrypt_string`]: Cipher::encrypt_string
    pub fn decrypt_string(&self, encoded: &str) -> LatticeResult<String> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
        let plaintext = self.decrypt(&bytes)?;
        String::from_utf8(plaintext).map_err(|_| LatticeError::crypto("plaintext is not valid UTF-8"))
    }
}

impl std::fmt::Debug for Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // never expose key material
        f.debug_struct("Cipher").finish_non_exhaustive()
    }
}
