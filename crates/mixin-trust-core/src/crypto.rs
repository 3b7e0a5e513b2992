//! Key material wrappers.
//!
//! Wraps Ed25519 signing keys and X25519 key agreement with strong types.

use ed25519_dalek::pkcs8::EncodePrivateKey;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use x25519_dalek::{PublicKey, StaticSecret};

use crate::convert;
use crate::error::{CryptoError, Result};

/// An Ed25519 keypair.
///
/// The same key signs request tokens and, once converted to Curve25519,
/// performs Diffie-Hellman for PIN and message encryption.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Create from either a 32-byte seed or a 64-byte `seed || public` buffer.
    pub fn from_private_bytes(bytes: &[u8]) -> Result<Self> {
        let seed = convert::seed_from_slice(bytes)?;
        Ok(Self::from_seed(&seed))
    }

    /// Get the raw seed bytes (secret key material).
    pub fn seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Get the Ed25519 public key bytes.
    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Verify a signature made by this keypair.
    pub fn verify(&self, message: &[u8], signature: &[u8; 64]) -> Result<()> {
        let sig = Signature::from_bytes(signature);
        self.signing_key
            .verifying_key()
            .verify(message, &sig)
            .map_err(|e| CryptoError::InvalidKeyMaterial(e.to_string()))
    }

    /// The Curve25519 secret for Diffie-Hellman.
    pub fn x25519_secret(&self) -> X25519Secret {
        X25519Secret::from_bytes(convert::seed_to_curve25519(&self.seed()))
    }

    /// The Curve25519 public key matching [`Keypair::x25519_secret`].
    pub fn x25519_public(&self) -> X25519PublicKey {
        let montgomery = self.signing_key.verifying_key().to_montgomery();
        X25519PublicKey(montgomery.to_bytes())
    }

    /// Encode the signing key as a PKCS#8 DER document.
    pub fn to_pkcs8_der(&self) -> Result<Vec<u8>> {
        self.signing_key
            .to_pkcs8_der()
            .map(|doc| doc.as_bytes().to_vec())
            .map_err(|e| CryptoError::InvalidKeyMaterial(e.to_string()))
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({}...)", &hex::encode(self.public_key())[..16])
    }
}

/// An X25519 public key (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct X25519PublicKey(pub [u8; 32]);

impl X25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, which must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidKeyMaterial(format!(
                "curve25519 public key must be 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert an Ed25519 public key into its Curve25519 counterpart.
    pub fn from_ed25519(ed25519_public: &[u8]) -> Result<Self> {
        convert::ed25519_public_to_curve25519(ed25519_public).map(Self)
    }

    fn to_dalek(self) -> PublicKey {
        PublicKey::from(self.0)
    }
}

impl fmt::Debug for X25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X25519Pub({}...)", &hex::encode(self.0)[..16])
    }
}

impl From<PublicKey> for X25519PublicKey {
    fn from(pk: PublicKey) -> Self {
        Self(*pk.as_bytes())
    }
}

/// A Curve25519 static secret, usually converted from an Ed25519 seed.
pub struct X25519Secret(StaticSecret);

impl X25519Secret {
    /// Create from scalar bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(StaticSecret::from(bytes))
    }

    /// Derive the public key.
    pub fn public_key(&self) -> X25519PublicKey {
        X25519PublicKey::from(PublicKey::from(&self.0))
    }

    /// Perform key agreement with a peer's public key.
    ///
    /// The raw 32-byte shared secret is used directly as an AES-256 key by
    /// both the PIN cipher and the envelope key wrap; there is no KDF step.
    pub fn diffie_hellman(&self, peer_public: &X25519PublicKey) -> [u8; 32] {
        *self.0.diffie_hellman(&peer_public.to_dalek()).as_bytes()
    }
}

impl fmt::Debug for X25519Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X25519Secret({:?})", self.public_key())
    }
}

/// Verify an Ed25519 signature against raw public key bytes.
pub fn verify_ed25519(public_key: &[u8; 32], message: &[u8], signature: &[u8; 64]) -> Result<()> {
    let verifying_key = VerifyingKey::from_bytes(public_key)
        .map_err(|e| CryptoError::InvalidKeyMaterial(e.to_string()))?;
    verifying_key
        .verify(message, &Signature::from_bytes(signature))
        .map_err(|e| CryptoError::InvalidKeyMaterial(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_sign_verify() {
        let keypair = Keypair::generate();
        let message = b"hello world";
        let signature = keypair.sign(message);

        keypair.verify(message, &signature).unwrap();
        verify_ed25519(&keypair.public_key(), message, &signature).unwrap();

        // Tampered message should fail
        assert!(keypair.verify(b"hello worlD", &signature).is_err());
    }

    #[test]
    fn test_keypair_deterministic_from_seed() {
        let seed = [0x42u8; 32];
        let kp1 = Keypair::from_seed(&seed);
        let kp2 = Keypair::from_seed(&seed);
        assert_eq!(kp1.public_key(), kp2.public_key());
    }

    #[test]
    fn test_keypair_from_libsodium_layout() {
        let kp = Keypair::from_seed(&[0x07; 32]);
        let mut expanded = kp.seed().to_vec();
        expanded.extend_from_slice(&kp.public_key());

        let recovered = Keypair::from_private_bytes(&expanded).unwrap();
        assert_eq!(recovered.public_key(), kp.public_key());
    }

    #[test]
    fn test_converted_keys_agree() {
        let alice = Keypair::generate();
        let bob = Keypair::generate();

        let ab = alice.x25519_secret().diffie_hellman(&bob.x25519_public());
        let ba = bob.x25519_secret().diffie_hellman(&alice.x25519_public());

        assert_eq!(ab, ba);
    }

    #[test]
    fn test_x25519_public_matches_secret() {
        let kp = Keypair::from_seed(&[0x13; 32]);
        assert_eq!(kp.x25519_secret().public_key(), kp.x25519_public());
    }

    #[test]
    fn test_x25519_public_from_slice_rejects_short() {
        assert!(matches!(
            X25519PublicKey::from_slice(&[0u8; 31]),
            Err(CryptoError::InvalidKeyMaterial(_))
        ));
    }
}
