//! # Mixin Trust Envelope
//!
//! End-to-end encrypted message payloads addressed to many recipient
//! sessions at once.
//!
//! ## Encryption Model
//!
//! 1. **Content key**: a fresh AES-128-GCM key encrypts the message once.
//! 2. **Wrapped keys**: for every recipient session the content key is
//!    encrypted with AES-256-CBC under `X25519(sender, recipient)`.
//!
//! The sender's Curve25519 key is its long-lived session key converted from
//! Ed25519, not an ephemeral one; the network expects exactly that.
//!
//! ## Wire Format
//!
//! ```text
//! version(1) | count(u16 LE) | sender_pub(32)
//!   | count x [ session_id(16) | iv(16) | wrapped_key(32) ]
//!   | nonce(12) | ciphertext | tag(16)
//! ```
//!
//! Transported as unpadded base64url. See [`wire`] for the constants.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mixin_trust_envelope::{decode, encode, RecipientSession};
//! use mixin_trust_core::{Identity, SessionId, UserId};
//!
//! // let recipients: Vec<RecipientSession> = serde_json::from_str(sessions_json)?;
//! // let data = encode(&identity, b"hello", &recipients)?;
//! // let plaintext = decode(&their_identity, &data)?;
//! ```

pub mod checksum;
pub mod codec;
pub mod crypto;
pub mod recipient;
pub mod wire;

pub use checksum::{recipients_checksum, unique_conversation_id};
pub use codec::{decode, decode_bytes, encode, encode_bytes_with_rng, encode_with_rng};
pub use crypto::{ContentKey, ContentNonce};
pub use recipient::RecipientSession;
pub use wire::{EnvelopeView, WrappedKey};
