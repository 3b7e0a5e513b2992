//! Request-signing tokens.
//!
//! Every outbound API request carries `Authorization: Bearer <jwt>`. The JWT
//! binds the request through `sig = hex(sha256(method || path || body))` and
//! expires shortly after issue, so a leaked token cannot be replayed against
//! a different request or for long.

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use rsa::pkcs1::EncodeRsaPrivateKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use mixin_trust_core::{CryptoError, Identity, PrivateKey, Result, SessionId, UserId};

/// Default token lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(200);

/// Default `scp` claim.
pub const DEFAULT_SCOPE: &str = "FULL";

/// Configuration for token signing.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Time between `iat` and `exp`.
    pub ttl: Duration,
    /// Value of the `scp` claim.
    pub scope: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            scope: DEFAULT_SCOPE.to_string(),
        }
    }
}

/// The signed claim set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Actor the request is made for.
    #[serde(rename = "uid")]
    pub user_id: UserId,

    /// Session whose key signed the token.
    #[serde(rename = "sid")]
    pub session_id: SessionId,

    /// Issue time, unix seconds.
    #[serde(rename = "iat")]
    pub issued_at: u64,

    /// Expiry time, unix seconds.
    #[serde(rename = "exp")]
    pub expires_at: u64,

    /// Random nonce, unique per token.
    #[serde(rename = "jti")]
    pub nonce: Uuid,

    /// Hex SHA-256 of method, path and body.
    #[serde(rename = "sig")]
    pub request_hash: String,

    /// Authorization scope.
    #[serde(rename = "scp")]
    pub scope: String,
}

/// Compute `hex(sha256(method || path || body))`.
pub fn request_hash(method: &str, path: &str, body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(path.as_bytes());
    hasher.update(body);
    hex::encode(hasher.finalize())
}

/// Builds signed, time-bounded request tokens.
#[derive(Debug, Clone, Default)]
pub struct AuthTokenSigner {
    config: TokenConfig,
}

impl AuthTokenSigner {
    /// Create a signer.
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    /// The signer's configuration.
    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Sign a token for one request using the system clock.
    pub fn sign(&self, identity: &Identity, method: &str, path: &str, body: &[u8]) -> Result<String> {
        self.sign_at(identity, method, path, body, SystemTime::now())
    }

    /// Sign a token for one request issued at `now`.
    pub fn sign_at(
        &self,
        identity: &Identity,
        method: &str,
        path: &str,
        body: &[u8],
        now: SystemTime,
    ) -> Result<String> {
        let claims = self.claims_at(identity, method, path, body, now);
        let (algorithm, key) = encoding_key(identity.key())?;

        jsonwebtoken::encode(&Header::new(algorithm), &claims, &key)
            .map_err(|e| CryptoError::SigningFailure(e.to_string()))
    }

    /// Build the claim set that [`AuthTokenSigner::sign_at`] would sign.
    pub fn claims_at(
        &self,
        identity: &Identity,
        method: &str,
        path: &str,
        body: &[u8],
        now: SystemTime,
    ) -> Claims {
        let issued_at = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Claims {
            user_id: identity.user_id(),
            session_id: identity.session_id(),
            issued_at,
            expires_at: issued_at + self.config.ttl.as_secs(),
            nonce: Uuid::new_v4(),
            request_hash: request_hash(method, path, body),
            scope: self.config.scope.clone(),
        }
    }
}

fn encoding_key(key: &PrivateKey) -> Result<(Algorithm, EncodingKey)> {
    match key {
        PrivateKey::Ed25519(keypair) => {
            let der = keypair.to_pkcs8_der()?;
            Ok((Algorithm::EdDSA, EncodingKey::from_ed_der(&der)))
        }
        PrivateKey::Rsa(rsa_key) => {
            let der = rsa_key
                .to_pkcs1_der()
                .map_err(|e| CryptoError::InvalidKeyMaterial(e.to_string()))?;
            Ok((Algorithm::RS512, EncodingKey::from_rsa_der(der.as_bytes())))
        }
    }
}
