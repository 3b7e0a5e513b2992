//! # Mixin Trust Auth
//!
//! Request authentication and PIN encryption.
//!
//! ## Overview
//!
//! - [`AuthTokenSigner`] builds a short-lived JWT bound to one HTTP request
//!   (method, path and body are hashed into the `sig` claim).
//! - [`pin`] encrypts the user's PIN under a key derived from the
//!   server-issued PIN token and the session's private key.
//!
//! Both work for Ed25519 and RSA sessions. Neither keeps state between calls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mixin_trust_auth::{pin, AuthTokenSigner, TokenConfig};
//! use mixin_trust_core::{Identity, SessionId, UserId};
//!
//! let identity = Identity::ed25519(
//!     UserId::from_uuid(uuid::Uuid::new_v4()),
//!     SessionId::generate(),
//!     &[7u8; 32],
//! );
//!
//! let signer = AuthTokenSigner::new(TokenConfig::default());
//! let token = signer.sign(&identity, "GET", "/me", b"").unwrap();
//!
//! // let encrypted = pin::encrypt(&identity, "123456", &pin_token, None)?;
//! ```

pub mod pin;
pub mod token;

pub use token::{request_hash, AuthTokenSigner, Claims, TokenConfig, DEFAULT_SCOPE, DEFAULT_TTL};
