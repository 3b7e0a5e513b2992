//! Base64 helpers.
//!
//! The platform uses the URL-safe alphabet everywhere. Output never carries
//! `=` padding; input is accepted with or without it.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

/// URL-safe engine that writes no padding and tolerates either form on read.
pub const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes as unpadded base64url.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_LENIENT.encode(bytes)
}

/// Decode base64url text, with or without trailing `=`.
pub fn decode(text: impl AsRef<[u8]>) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_LENIENT.decode(text)
}

/// Decode base64 text in either the standard or the URL-safe alphabet.
///
/// Plain message data and RSA pin tokens arrive in the standard alphabet.
pub fn decode_any(text: impl AsRef<[u8]>) -> Result<Vec<u8>, base64::DecodeError> {
    let normalized: Vec<u8> = text
        .as_ref()
        .iter()
        .map(|&b| match b {
            b'+' => b'-',
            b'/' => b'_',
            other => other,
        })
        .collect();
    URL_SAFE_LENIENT.decode(normalized)
}
