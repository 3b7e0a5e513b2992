//! Conversation helpers shared by the message send path.

use md5::{Digest, Md5};
use uuid::Uuid;

use mixin_trust_core::{SessionId, UserId};

/// Checksum of the recipient session set sent alongside an encrypted message.
///
/// MD5 over the concatenated session-id strings in ascending order, as
/// lowercase hex. The server rejects the message if its own view of the
/// conversation's sessions hashes differently. An empty set yields `""`.
pub fn recipients_checksum<'a>(sessions: impl IntoIterator<Item = &'a SessionId>) -> String {
    let mut ids: Vec<String> = sessions.into_iter().map(|s| s.to_string()).collect();
    if ids.is_empty() {
        return String::new();
    }
    ids.sort();

    let mut hasher = Md5::new();
    for id in &ids {
        hasher.update(id.as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Deterministic id of the one-to-one conversation between two users.
///
/// Order-independent: both sides compute the same id.
pub fn unique_conversation_id(a: &UserId, b: &UserId) -> Uuid {
    let (a, b) = (a.to_string(), b.to_string());
    let (min, max) = if a <= b { (a, b) } else { (b, a) };

    let mut hasher = Md5::new();
    hasher.update(min.as_bytes());
    hasher.update(max.as_bytes());
    let mut sum: [u8; 16] = hasher.finalize().into();

    sum[6] = (sum[6] & 0x0f) | 0x30;
    sum[8] = (sum[8] & 0x3f) | 0x80;
    Uuid::from_bytes(sum)
}
