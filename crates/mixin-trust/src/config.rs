//! Client configuration and credential loading.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use mixin_trust_auth::{TokenConfig, DEFAULT_SCOPE, DEFAULT_TTL};
use mixin_trust_core::{encoding, CryptoError, Identity, KeyAlgorithm, SessionId, UserId};

use crate::error::{ClientError, Result};

/// Configuration for the client.
#[derive(Debug, Clone)]
pub struct TrustConfig {
    /// Lifetime of each request token.
    pub token_ttl: Duration,
    /// Scope claim placed in each request token.
    pub token_scope: String,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            token_ttl: DEFAULT_TTL,
            token_scope: DEFAULT_SCOPE.to_string(),
        }
    }
}

impl TrustConfig {
    /// The token signer configuration derived from this config.
    pub fn token_config(&self) -> TokenConfig {
        TokenConfig {
            ttl: self.token_ttl,
            scope: self.token_scope.clone(),
        }
    }
}

/// Session credentials as issued by the platform.
///
/// Accepts both the application keystore (`client_id`) and the network user
/// keystore (`user_id`). Unknown fields, including a stored `pin`, are
/// ignored.
#[derive(Clone, Deserialize)]
pub struct Keystore {
    #[serde(alias = "client_id")]
    pub user_id: UserId,
    pub session_id: SessionId,
    /// PEM text for RSA sessions, base64url seed otherwise.
    pub private_key: String,
    /// Base64 PIN token, or empty if the session has none.
    #[serde(default)]
    pub pin_token: String,
}

impl Keystore {
    /// Parse a keystore from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a keystore file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Algorithm of the session key, detected from its encoding.
    pub fn algorithm(&self) -> KeyAlgorithm {
        let key = self.private_key.trim_start();
        if key.starts_with("-----BEGIN") && key.contains("PRIVATE KEY") {
            KeyAlgorithm::Rsa
        } else {
            KeyAlgorithm::Ed25519
        }
    }

    /// Build the session identity.
    pub fn identity(&self) -> Result<Identity> {
        let algorithm = self.algorithm();
        let key = match algorithm {
            KeyAlgorithm::Rsa => self.private_key.trim().as_bytes().to_vec(),
            KeyAlgorithm::Ed25519 => encoding::decode(self.private_key.trim()).map_err(|e| {
                CryptoError::InvalidKeyMaterial(format!("private_key is not base64url: {e}"))
            })?,
        };

        let identity = Identity::from_parts(
            self.user_id,
            self.session_id,
            algorithm.jwt_name(),
            &key,
        )?;
        Ok(identity)
    }

    /// The decoded PIN token.
    ///
    /// RSA sessions are issued standard base64 tokens, Ed25519 sessions
    /// base64url; both alphabets are accepted.
    pub fn pin_token(&self) -> Result<Vec<u8>> {
        if self.pin_token.is_empty() {
            return Err(ClientError::InvalidConfig(
                "keystore has no pin_token".to_string(),
            ));
        }
        encoding::decode_any(self.pin_token.trim()).map_err(|e| {
            ClientError::Crypto(CryptoError::InvalidKeyMaterial(format!(
                "pin_token is not base64: {e}"
            )))
        })
    }
}

impl fmt::Debug for Keystore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keystore")
            .field("user_id", &self.user_id)
            .field("session_id", &self.session_id)
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}
