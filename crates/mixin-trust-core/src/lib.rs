//! # Mixin Trust Core
//!
//! Pure primitives for the Mixin Trust layer: identities, key material and
//! the Ed25519 to Curve25519 key conversion.
//!
//! This crate contains no I/O, no clock reads, no networking. Every function
//! is a stateless transformation over caller-supplied key material.
//!
//! ## Key Types
//!
//! - [`Identity`] - Actor id, session id and signing key of the local client
//! - [`PrivateKey`] - Closed union of the two supported key algorithms
//! - [`Keypair`] - Ed25519 signing key, also usable for Diffie-Hellman
//! - [`X25519PublicKey`] - A Curve25519 public key of a recipient session
//! - [`UserId`] / [`SessionId`] - UUID newtypes
//!
//! ## Key Conversion
//!
//! See [`convert`] for the Edwards to Montgomery conversions used by the PIN
//! cipher and the message envelope.

pub mod convert;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod identity;
pub mod types;

pub use convert::{ed25519_private_to_curve25519, ed25519_public_to_curve25519};
pub use crypto::{verify_ed25519, Keypair, X25519PublicKey, X25519Secret};
pub use error::{CryptoError, Result};
pub use identity::{Identity, KeyAlgorithm, PrivateKey};
pub use types::{SessionId, UserId};
