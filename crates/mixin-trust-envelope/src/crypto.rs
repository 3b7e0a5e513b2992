//! Content encryption and per-recipient key wrapping.
//!
//! The content is sealed with AES-128-GCM. The 16-byte content key is
//! extended with a fixed block of `0x10` bytes to 32 bytes and encrypted
//! with AES-256-CBC (no further padding) under the raw X25519 shared secret.

use aes::Aes256;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Nonce};
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{CryptoRng, RngCore};
use std::fmt;

use mixin_trust_core::{CryptoError, Result};

use crate::wire::{IV_LEN, NONCE_LEN, WRAPPED_KEY_LEN};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Length of the content key.
pub const CONTENT_KEY_LEN: usize = 16;

/// Fill byte extending the content key to a full 32-byte wrap input.
const KEY_PAD: u8 = 0x10;

/// A 128-bit AES-GCM content key, fresh per message.
#[derive(Clone, PartialEq, Eq)]
pub struct ContentKey([u8; CONTENT_KEY_LEN]);

impl ContentKey {
    /// Generate a new random key.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; CONTENT_KEY_LEN];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; CONTENT_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; CONTENT_KEY_LEN] {
        &self.0
    }

    /// Encrypt content; the 16-byte tag is appended to the ciphertext.
    pub fn seal(&self, nonce: &ContentNonce, plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = Aes128Gcm::new_from_slice(&self.0)
            .map_err(|e| CryptoError::InvalidKeyMaterial(e.to_string()))?;
        cipher
            .encrypt(Nonce::from_slice(&nonce.0), plaintext)
            .map_err(|e| CryptoError::DecryptFailure(format!("content seal: {e}")))
    }

    /// Decrypt content and verify its tag.
    pub fn open(&self, nonce: &ContentNonce, sealed: &[u8]) -> Result<Vec<u8>> {
        let cipher = Aes128Gcm::new_from_slice(&self.0)
            .map_err(|e| CryptoError::InvalidKeyMaterial(e.to_string()))?;
        cipher
            .decrypt(Nonce::from_slice(&nonce.0), sealed)
            .map_err(|_| CryptoError::AuthenticationFailure)
    }

    /// Encrypt this key for one recipient under their shared secret.
    pub fn wrap(&self, secret: &[u8; 32], iv: &[u8; IV_LEN]) -> Result<[u8; WRAPPED_KEY_LEN]> {
        let mut padded = [KEY_PAD; WRAPPED_KEY_LEN];
        padded[..CONTENT_KEY_LEN].copy_from_slice(&self.0);

        let cipher = Aes256CbcEnc::new_from_slices(secret, iv)
            .map_err(|e| CryptoError::InvalidKeyMaterial(e.to_string()))?;
        let wrapped = cipher.encrypt_padded_vec_mut::<NoPadding>(&padded);

        wrapped.as_slice().try_into().map_err(|_| {
            CryptoError::DecryptFailure(format!("wrapped key is {} bytes", wrapped.len()))
        })
    }

    /// Recover a content key wrapped with [`ContentKey::wrap`].
    ///
    /// The trailing fill block is discarded without inspection; a wrong
    /// secret surfaces later as a content authentication failure.
    pub fn unwrap_key(
        secret: &[u8; 32],
        iv: &[u8; IV_LEN],
        wrapped: &[u8; WRAPPED_KEY_LEN],
    ) -> Result<Self> {
        let cipher = Aes256CbcDec::new_from_slices(secret, iv)
            .map_err(|e| CryptoError::InvalidKeyMaterial(e.to_string()))?;
        let padded = cipher
            .decrypt_padded_vec_mut::<NoPadding>(wrapped)
            .map_err(|e| CryptoError::DecryptFailure(format!("key unwrap: {e}")))?;

        let mut key = [0u8; CONTENT_KEY_LEN];
        key.copy_from_slice(&padded[..CONTENT_KEY_LEN]);
        Ok(Self(key))
    }
}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContentKey(..)")
    }
}

/// A 96-bit AES-GCM nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentNonce(pub [u8; NONCE_LEN]);

impl ContentNonce {
    /// Generate a new random nonce.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; NONCE_LEN];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

/// Draw a fresh CBC IV.
pub fn generate_iv<R: RngCore + CryptoRng>(rng: &mut R) -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    rng.fill_bytes(&mut iv);
    iv
}
