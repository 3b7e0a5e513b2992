//! # Mixin Trust
//!
//! The unified API for the Mixin trust layer: the cryptography a client
//! session needs to talk to the network.
//!
//! ## Overview
//!
//! - **Request tokens**: short-lived JWTs bound to the method, path and body
//!   of a single HTTP request
//! - **PIN encryption**: the user's PIN, encrypted under a key only this
//!   session and the server can derive
//! - **Message envelopes**: end-to-end encrypted payloads readable by every
//!   addressed recipient session and nobody else
//!
//! Everything is a pure function of caller-supplied key material. No
//! process-wide state exists; a [`TrustClient`] is built from an explicit
//! [`Keystore`] and [`TrustConfig`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mixin_trust::{Keystore, TrustClient, TrustConfig};
//!
//! # fn main() -> mixin_trust::Result<()> {
//! let keystore = Keystore::from_file("keystore.json")?;
//! let client = TrustClient::from_keystore(&keystore, TrustConfig::default())?;
//!
//! // Authorization header for GET /me
//! let header = client.authorization("GET", "/me", None)?;
//!
//! // Encrypted PIN for a transfer
//! let pin = client.encrypt_pin("123456", None)?;
//!
//! // Decrypt an inbound message
//! // let payload = client.open_inbound(&message.category, &message.data)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `mixin_trust::core` - Identities, key material, key conversion
//! - `mixin_trust::auth` - Request tokens and PIN encryption
//! - `mixin_trust::envelope` - Message envelopes

pub mod client;
pub mod config;
pub mod error;

// Re-export component crates
pub use mixin_trust_auth as auth;
pub use mixin_trust_core as core;
pub use mixin_trust_envelope as envelope;

// Re-export main types for convenience
pub use client::{TrustClient, ENCRYPTED_PREFIX};
pub use config::{Keystore, TrustConfig};
pub use error::{ClientError, Result};

// Re-export commonly used component types
pub use mixin_trust_auth::{AuthTokenSigner, Claims, TokenConfig};
pub use mixin_trust_core::{
    CryptoError, Identity, KeyAlgorithm, Keypair, PrivateKey, SessionId, UserId, X25519PublicKey,
};
pub use mixin_trust_envelope::{recipients_checksum, unique_conversation_id, RecipientSession};
