//! # Mixin Trust Testkit
//!
//! Testing utilities for Mixin Trust.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known inputs with expected outputs for interoperability checks
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Parties, recipients and a replayable random source
//!
//! ## Golden Vectors
//!
//! ```rust
//! use mixin_trust_testkit::vectors::envelope_vectors;
//!
//! for vector in envelope_vectors() {
//!     assert_eq!(vector.encode(), vector.expected);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use mixin_trust_testkit::generators::EnvelopeParams;
//!
//! proptest! {
//!     #[test]
//!     fn any_recipient_can_read(params: EnvelopeParams) {
//!         let (sender, recipients) = params.parties();
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use mixin_trust_testkit::fixtures::{multi_party_fixtures, recipients};
//!
//! let parties = multi_party_fixtures(3);
//! let sessions = recipients(&parties);
//! assert_eq!(sessions.len(), 3);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, recipients, rsa_identity, ScriptedRng, TestParty};
