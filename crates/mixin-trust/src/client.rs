//! The client: one session's view of the trust layer.
//!
//! Holds the session identity and configuration and exposes the operations
//! the HTTP and message transports call.

use std::sync::Arc;

use uuid::Uuid;

use mixin_trust_auth::{pin, AuthTokenSigner};
use mixin_trust_core::{encoding, Identity, UserId};
use mixin_trust_envelope::{self as envelope, RecipientSession};

use crate::config::{Keystore, TrustConfig};
use crate::error::{ClientError, Result};

/// Category prefix of end-to-end encrypted messages.
pub const ENCRYPTED_PREFIX: &str = "ENCRYPTED_";

struct Inner {
    identity: Identity,
    pin_token: Option<Vec<u8>>,
    signer: AuthTokenSigner,
    config: TrustConfig,
}

/// A session client.
///
/// Cheap to clone; all state is immutable and shared.
#[derive(Clone)]
pub struct TrustClient {
    inner: Arc<Inner>,
}

impl TrustClient {
    /// Create a client for `identity`.
    pub fn new(identity: Identity, pin_token: Option<Vec<u8>>, config: TrustConfig) -> Self {
        let signer = AuthTokenSigner::new(config.token_config());
        Self {
            inner: Arc::new(Inner {
                identity,
                pin_token,
                signer,
                config,
            }),
        }
    }

    /// Create a client from platform-issued credentials.
    pub fn from_keystore(keystore: &Keystore, config: TrustConfig) -> Result<Self> {
        let identity = keystore.identity()?;
        let pin_token = if keystore.pin_token.is_empty() {
            None
        } else {
            Some(keystore.pin_token()?)
        };

        tracing::debug!(
            user = %identity.user_id(),
            session = %identity.session_id(),
            algorithm = %identity.algorithm(),
            "loaded keystore"
        );
        Ok(Self::new(identity, pin_token, config))
    }

    pub fn identity(&self) -> &Identity {
        &self.inner.identity
    }

    pub fn config(&self) -> &TrustConfig {
        &self.inner.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Request Authentication
    // ─────────────────────────────────────────────────────────────────────────

    /// Sign a token for one request. An absent body is signed as empty.
    pub fn sign_token(&self, method: &str, path: &str, body: Option<&[u8]>) -> Result<String> {
        let token = self.inner.signer.sign(
            &self.inner.identity,
            method,
            path,
            body.unwrap_or_default(),
        )?;
        tracing::debug!(method, path, "signed request token");
        Ok(token)
    }

    /// The `Authorization` header value for one request.
    pub fn authorization(&self, method: &str, path: &str, body: Option<&[u8]>) -> Result<String> {
        Ok(format!("Bearer {}", self.sign_token(method, path, body)?))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // PIN
    // ─────────────────────────────────────────────────────────────────────────

    /// Encrypt `pin` for a PIN-gated request.
    pub fn encrypt_pin(&self, pin: &str, iterator: Option<&[u8]>) -> Result<String> {
        let pin_token = self
            .inner
            .pin_token
            .as_deref()
            .ok_or_else(|| ClientError::InvalidConfig("client has no pin token".to_string()))?;
        Ok(pin::encrypt(&self.inner.identity, pin, pin_token, iterator)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Messages
    // ─────────────────────────────────────────────────────────────────────────

    /// Encrypt a message payload for `recipients`.
    pub fn seal_message(&self, plaintext: &[u8], recipients: &[RecipientSession]) -> Result<String> {
        Ok(envelope::encode(&self.inner.identity, plaintext, recipients)?)
    }

    /// Decrypt an envelope addressed to this session.
    pub fn open_message(&self, data: &str) -> Result<Vec<u8>> {
        Ok(envelope::decode(&self.inner.identity, data)?)
    }

    /// Extract the payload of an inbound message.
    ///
    /// Encrypted categories are opened; plain ones carry base64 data in
    /// either alphabet.
    pub fn open_inbound(&self, category: &str, data: &str) -> Result<Vec<u8>> {
        if category.starts_with(ENCRYPTED_PREFIX) {
            return self.open_message(data);
        }
        encoding::decode_any(data)
            .map_err(|e| ClientError::InvalidMessageData(format!("{category} data: {e}")))
    }

    /// [`TrustClient::seal_message`] on the blocking thread pool.
    pub async fn seal_message_async(
        &self,
        plaintext: Vec<u8>,
        recipients: Vec<RecipientSession>,
    ) -> Result<String> {
        let client = self.clone();
        tokio::task::spawn_blocking(move || client.seal_message(&plaintext, &recipients)).await?
    }

    /// [`TrustClient::open_message`] on the blocking thread pool.
    pub async fn open_message_async(&self, data: String) -> Result<Vec<u8>> {
        let client = self.clone();
        tokio::task::spawn_blocking(move || client.open_message(&data)).await?
    }

    /// Id of the one-to-one conversation with `other`.
    pub fn conversation_id(&self, other: &UserId) -> Uuid {
        envelope::unique_conversation_id(&self.inner.identity.user_id(), other)
    }
}

impl std::fmt::Debug for TrustClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustClient")
            .field("identity", &self.inner.identity)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
