//! Envelope encryption of stored credentials.
//!
//! AES-128-GCM with a fresh random 12-byte nonce per call and no associated data.
//! The persisted text form is `hex(nonce) || hex(ciphertext)`: the nonce always
//! occupies the first [`NONCE_HEX_LEN`] characters, and readers split at that
//! fixed offset. Changing the nonce width would break every stored secret; a
//! length-prefixed envelope is the way to go if that is ever needed.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Nonce};
use mailroom_core::error::{Result, StoreError};
use mailroom_core::port::SecretCipher;
use rand::rngs::OsRng;
use rand::RngCore;
use std::str::FromStr;

/// Key length in bytes (128-bit)
pub const KEY_LEN: usize = 16;

/// Nonce length in bytes (96-bit)
pub const NONCE_LEN: usize = 12;

/// Width of the hex nonce prefix in the persisted text form
pub const NONCE_HEX_LEN: usize = NONCE_LEN * 2;

/// Supported modes of operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMode {
    AesGcmRandomNonce,
}

impl FromStr for CipherMode {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "aes-gcm-random-nonce" | "aes-128-gcm" => Ok(CipherMode::AesGcmRandomNonce),
            other => Err(StoreError::EncryptionConfigInvalid(format!(
                "unsupported cipher mode {other:?}; AES-GCM with random nonce is the only supported mode"
            ))),
        }
    }
}

/// Nonce and ciphertext of one encryption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedSecret {
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

impl SealedSecret {
    pub fn to_text(&self) -> String {
        let mut text = hex::encode(self.nonce);
        text.push_str(&hex::encode(&self.ciphertext));
        text
    }

    /// Split at the fixed nonce offset. Malformed input is reported as an
    /// authentication failure so that callers cannot tell it apart from tampering.
    pub fn from_text(text: &str) -> Result<Self> {
        let (nonce_hex, ciphertext_hex) = match (text.get(..NONCE_HEX_LEN), text.get(NONCE_HEX_LEN..)) {
            (Some(n), Some(c)) => (n, c),
            _ => return Err(StoreError::AuthenticationFailure),
        };

        let mut nonce = [0u8; NONCE_LEN];
        hex::decode_to_slice(nonce_hex, &mut nonce).map_err(|_| StoreError::AuthenticationFailure)?;
        let ciphertext = hex::decode(ciphertext_hex).map_err(|_| StoreError::AuthenticationFailure)?;

        Ok(Self { nonce, ciphertext })
    }
}

/// Stateless after construction; safe to share across tasks without locking
pub struct CredentialCipher {
    cipher: Aes128Gcm,
}

impl std::fmt::Debug for CredentialCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCipher")
            .field("mode", &CipherMode::AesGcmRandomNonce)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl CredentialCipher {
    /// Create a cipher; the key must be exactly 16 bytes
    pub fn new(mode: CipherMode, key: &[u8]) -> Result<Self> {
        match mode {
            CipherMode::AesGcmRandomNonce => {}
        }
        if key.len() != KEY_LEN {
            return Err(StoreError::EncryptionConfigInvalid(format!(
                "key must be {KEY_LEN} bytes, got {}",
                key.len()
            )));
        }

        let cipher = Aes128Gcm::new_from_slice(key)
            .map_err(|e| StoreError::EncryptionConfigInvalid(e.to_string()))?;
        Ok(Self { cipher })
    }

    /// Create from a mode name and a hex-encoded key (32 characters)
    pub fn from_hex_key(mode: &str, key_hex: &str) -> Result<Self> {
        let mode = CipherMode::from_str(mode)?;
        let key = hex::decode(key_hex.trim()).map_err(|_| {
            StoreError::EncryptionConfigInvalid("key must be hex encoded [0-9a-f]".into())
        })?;
        Self::new(mode, &key)
    }

    /// Generate a random key suitable for [`CredentialCipher::new`]
    pub fn generate_key() -> [u8; KEY_LEN] {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        key
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<SealedSecret> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| StoreError::EncryptionConfigInvalid("AES-GCM seal failed".into()))?;

        Ok(SealedSecret { nonce, ciphertext })
    }

    /// Fails closed: any modification of nonce or ciphertext is rejected
    pub fn decrypt(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        if nonce.len() != NONCE_LEN {
            return Err(StoreError::AuthenticationFailure);
        }

        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| {
                tracing::warn!("Secret failed AES-GCM authentication");
                StoreError::AuthenticationFailure
            })
    }
}

impl SecretCipher for CredentialCipher {
    fn encrypt_to_text(&self, plaintext: &str) -> Result<String> {
        Ok(self.encrypt(plaintext.as_bytes())?.to_text())
    }

    fn decrypt_from_text(&self, sealed: &str) -> Result<String> {
        let secret = SealedSecret::from_text(sealed)?;
        let plaintext = self.decrypt(&secret.nonce, &secret.ciphertext)?;
        String::from_utf8(plaintext).map_err(|_| StoreError::AuthenticationFailure)
    }
}
