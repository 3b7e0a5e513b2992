//! Error types for the client.

use mixin_trust_core::CryptoError;
use thiserror::Error;

/// Errors that can occur during client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A cryptographic operation failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Reading a keystore failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A keystore was not valid JSON or lacked a required field.
    #[error("keystore format error: {0}")]
    Json(#[from] serde_json::Error),

    /// Plain message data was not valid base64.
    #[error("invalid message data: {0}")]
    InvalidMessageData(String),

    /// Configuration is incomplete or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A blocking task was cancelled or panicked.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
