//! Error types for the trust layer.

use thiserror::Error;

use crate::types::SessionId;

/// Errors produced by token signing, PIN encryption and envelope coding.
///
/// Every error is terminal for the operation that produced it.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("unsupported key algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("session {0} not found in envelope")]
    SessionNotFound(SessionId),

    #[error("authentication tag mismatch")]
    AuthenticationFailure,

    #[error("decryption failed: {0}")]
    DecryptFailure(String),

    #[error("signing failed: {0}")]
    SigningFailure(String),
}

/// Result type for trust-layer operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
