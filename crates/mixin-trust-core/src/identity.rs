//! The local client's identity.
//!
//! An identity binds an actor id and a session id to the private key that
//! session registered with the platform. Two key algorithms exist and they
//! behave differently for signing and for PIN key derivation, so the key is
//! a closed union and every consumer matches on it exhaustively.

use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use std::fmt;
use std::str::FromStr;

use crate::crypto::Keypair;
use crate::error::{CryptoError, Result};
use crate::types::{SessionId, UserId};

/// Signing algorithm of a session key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    /// EdDSA over Curve25519 (`"Ed25519"` / `"EdDSA"`).
    Ed25519,
    /// RSA with SHA-512 (`"RSA"` / `"RS512"`).
    Rsa,
}

impl KeyAlgorithm {
    /// The JWT `alg` header value for this algorithm.
    pub const fn jwt_name(&self) -> &'static str {
        match self {
            KeyAlgorithm::Ed25519 => "EdDSA",
            KeyAlgorithm::Rsa => "RS512",
        }
    }
}

impl FromStr for KeyAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ed25519" | "eddsa" => Ok(KeyAlgorithm::Ed25519),
            "rsa" | "rs512" => Ok(KeyAlgorithm::Rsa),
            _ => Err(CryptoError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.jwt_name())
    }
}

/// Private key material of a session.
#[derive(Clone)]
pub enum PrivateKey {
    Ed25519(Keypair),
    Rsa(Box<RsaPrivateKey>),
}

impl PrivateKey {
    /// Parse an RSA private key from PKCS#1 or PKCS#8 PEM.
    pub fn rsa_from_pem(pem: &str) -> Result<Self> {
        let key = RsaPrivateKey::from_pkcs1_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
            .map_err(|e| CryptoError::InvalidKeyMaterial(format!("rsa private key: {e}")))?;
        Ok(PrivateKey::Rsa(Box::new(key)))
    }

    /// Parse an RSA private key from PKCS#1 or PKCS#8 DER.
    pub fn rsa_from_der(der: &[u8]) -> Result<Self> {
        let key = RsaPrivateKey::from_pkcs1_der(der)
            .or_else(|_| RsaPrivateKey::from_pkcs8_der(der))
            .map_err(|e| CryptoError::InvalidKeyMaterial(format!("rsa private key: {e}")))?;
        Ok(PrivateKey::Rsa(Box::new(key)))
    }

    /// The algorithm of this key.
    pub const fn algorithm(&self) -> KeyAlgorithm {
        match self {
            PrivateKey::Ed25519(_) => KeyAlgorithm::Ed25519,
            PrivateKey::Rsa(_) => KeyAlgorithm::Rsa,
        }
    }

    /// The Ed25519 keypair, or `UnsupportedAlgorithm` for RSA keys.
    pub fn ed25519(&self) -> Result<&Keypair> {
        match self {
            PrivateKey::Ed25519(keypair) => Ok(keypair),
            PrivateKey::Rsa(_) => Err(CryptoError::UnsupportedAlgorithm(
                "operation requires an Ed25519 session key, found RS512".to_string(),
            )),
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivateKey::Ed25519(keypair) => write!(f, "PrivateKey::Ed25519({keypair:?})"),
            PrivateKey::Rsa(_) => f.write_str("PrivateKey::Rsa(..)"),
        }
    }
}

/// Actor id, session id and key material of the local client.
///
/// Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Identity {
    user_id: UserId,
    session_id: SessionId,
    key: PrivateKey,
}

impl Identity {
    /// Create a new identity.
    pub fn new(user_id: UserId, session_id: SessionId, key: PrivateKey) -> Self {
        Self {
            user_id,
            session_id,
            key,
        }
    }

    /// Create an Ed25519 identity from a 32-byte seed.
    pub fn ed25519(user_id: UserId, session_id: SessionId, seed: &[u8; 32]) -> Self {
        Self::new(user_id, session_id, PrivateKey::Ed25519(Keypair::from_seed(seed)))
    }

    /// Build an identity from an algorithm name and raw key material.
    ///
    /// For Ed25519 `key` is a 32-byte seed (or 64-byte `seed || public`);
    /// for RSA it is PEM text or DER bytes.
    pub fn from_parts(
        user_id: UserId,
        session_id: SessionId,
        algorithm: &str,
        key: &[u8],
    ) -> Result<Self> {
        let key = match algorithm.parse::<KeyAlgorithm>()? {
            KeyAlgorithm::Ed25519 => PrivateKey::Ed25519(Keypair::from_private_bytes(key)?),
            KeyAlgorithm::Rsa => match std::str::from_utf8(key) {
                Ok(pem) if pem.contains("-----BEGIN") => PrivateKey::rsa_from_pem(pem)?,
                _ => PrivateKey::rsa_from_der(key)?,
            },
        };
        Ok(Self::new(user_id, session_id, key))
    }

    /// The actor (user or application) id.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// The session id.
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// The private key.
    pub fn key(&self) -> &PrivateKey {
        &self.key
    }

    /// The key algorithm.
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.key.algorithm()
    }
}
