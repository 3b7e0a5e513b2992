//! Envelope wire layout.
//!
//! All multi-byte integers are little-endian. Offsets are fixed; the only
//! variable part is the session table length and the content length.

use bytes::{Buf, BufMut, BytesMut};

use mixin_trust_core::{CryptoError, Result, SessionId, X25519PublicKey};

/// The only envelope version in use.
pub const VERSION: u8 = 1;

pub const VERSION_LEN: usize = 1;
pub const COUNT_LEN: usize = 2;
pub const SENDER_KEY_LEN: usize = 32;

/// `version || count || sender_pub`.
pub const HEADER_LEN: usize = VERSION_LEN + COUNT_LEN + SENDER_KEY_LEN;

pub const SESSION_ID_LEN: usize = 16;
pub const IV_LEN: usize = 16;
pub const WRAPPED_KEY_LEN: usize = 32;

/// One session table entry: `session_id || iv || wrapped_key`.
pub const SESSION_ENTRY_LEN: usize = SESSION_ID_LEN + IV_LEN + WRAPPED_KEY_LEN;

pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

/// Smallest envelope a recipient could possibly open.
pub const MIN_ENVELOPE_LEN: usize = HEADER_LEN + SESSION_ENTRY_LEN + NONCE_LEN + TAG_LEN;

/// Encoded size of an envelope for `session_count` recipients.
pub const fn envelope_len(session_count: usize, plaintext_len: usize) -> usize {
    HEADER_LEN + SESSION_ENTRY_LEN * session_count + NONCE_LEN + plaintext_len + TAG_LEN
}

/// A content key wrapped for one recipient session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedKey {
    pub session_id: SessionId,
    pub iv: [u8; IV_LEN],
    pub ciphertext: [u8; WRAPPED_KEY_LEN],
}

impl WrappedKey {
    /// Append this entry to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.put_slice(self.session_id.as_bytes());
        buf.put_slice(&self.iv);
        buf.put_slice(&self.ciphertext);
    }

    /// Read one entry from exactly [`SESSION_ENTRY_LEN`] bytes.
    fn read(mut entry: &[u8]) -> Self {
        let mut session_id = [0u8; SESSION_ID_LEN];
        let mut iv = [0u8; IV_LEN];
        let mut ciphertext = [0u8; WRAPPED_KEY_LEN];
        entry.copy_to_slice(&mut session_id);
        entry.copy_to_slice(&mut iv);
        entry.copy_to_slice(&mut ciphertext);
        Self {
            session_id: SessionId::from_bytes(session_id),
            iv,
            ciphertext,
        }
    }
}

/// A length-checked, borrowed view of an encoded envelope.
#[derive(Debug)]
pub struct EnvelopeView<'a> {
    version: u8,
    sender_public: X25519PublicKey,
    session_table: &'a [u8],
    nonce: [u8; NONCE_LEN],
    sealed: &'a [u8],
}

impl<'a> EnvelopeView<'a> {
    /// Validate lengths and split an envelope into its fields.
    ///
    /// No cryptographic work happens here.
    pub fn parse(raw: &'a [u8]) -> Result<Self> {
        if raw.len() < MIN_ENVELOPE_LEN {
            return Err(CryptoError::MalformedEnvelope(format!(
                "envelope is {} bytes, minimum is {MIN_ENVELOPE_LEN}",
                raw.len()
            )));
        }

        let mut header = &raw[..HEADER_LEN];
        let version = header.get_u8();
        if version != VERSION {
            return Err(CryptoError::MalformedEnvelope(format!(
                "unsupported envelope version {version}"
            )));
        }
        let session_count = header.get_u16_le() as usize;
        let mut sender_public = [0u8; SENDER_KEY_LEN];
        header.copy_to_slice(&mut sender_public);

        let table_end = HEADER_LEN + SESSION_ENTRY_LEN * session_count;
        if raw.len() < table_end + NONCE_LEN + TAG_LEN {
            return Err(CryptoError::MalformedEnvelope(format!(
                "envelope is {} bytes, {session_count} sessions need at least {}",
                raw.len(),
                table_end + NONCE_LEN + TAG_LEN
            )));
        }

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&raw[table_end..table_end + NONCE_LEN]);

        Ok(Self {
            version,
            sender_public: X25519PublicKey::from_bytes(sender_public),
            session_table: &raw[HEADER_LEN..table_end],
            nonce,
            sealed: &raw[table_end + NONCE_LEN..],
        })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn session_count(&self) -> usize {
        self.session_table.len() / SESSION_ENTRY_LEN
    }

    /// The sender's Curve25519 public key.
    pub fn sender_public(&self) -> &X25519PublicKey {
        &self.sender_public
    }

    /// All session table entries in wire order.
    pub fn wrapped_keys(&self) -> impl Iterator<Item = WrappedKey> + 'a {
        self.session_table
            .chunks_exact(SESSION_ENTRY_LEN)
            .map(WrappedKey::read)
    }

    /// The entry addressed to `session_id`, if any.
    pub fn find(&self, session_id: &SessionId) -> Option<WrappedKey> {
        self.session_table
            .chunks_exact(SESSION_ENTRY_LEN)
            .find(|entry| &entry[..SESSION_ID_LEN] == session_id.as_bytes())
            .map(WrappedKey::read)
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// Content ciphertext followed by the 16-byte GCM tag.
    pub fn sealed(&self) -> &'a [u8] {
        self.sealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(session_count: u16, content_len: usize) -> Vec<u8> {
        let mut buf = BytesMut::new();
        buf.put_u8(VERSION);
        buf.put_u16_le(session_count);
        buf.put_slice(&[0xee; SENDER_KEY_LEN]);
        for i in 0..session_count {
            WrappedKey {
                session_id: SessionId::from_bytes([i as u8 + 1; 16]),
                iv: [0x11; IV_LEN],
                ciphertext: [0x22; WRAPPED_KEY_LEN],
            }
            .write_to(&mut buf);
        }
        buf.put_slice(&[0x33; NONCE_LEN]);
        buf.put_slice(&vec![0x44; content_len + TAG_LEN]);
        buf.to_vec()
    }

    #[test]
    fn test_constants() {
        assert_eq!(HEADER_LEN, 35);
        assert_eq!(SESSION_ENTRY_LEN, 64);
        assert_eq!(MIN_ENVELOPE_LEN, 35 + 64 + 12 + 16);
        assert_eq!(envelope_len(2, 5), 35 + 128 + 12 + 5 + 16);
    }

    #[test]
    fn test_parse_fields() {
        let raw = sample(2, 5);
        let view = EnvelopeView::parse(&raw).unwrap();

        assert_eq!(view.version(), 1);
        assert_eq!(view.session_count(), 2);
        assert_eq!(view.sender_public().as_bytes(), &[0xee; 32]);
        assert_eq!(view.nonce(), &[0x33; 12]);
        assert_eq!(view.sealed().len(), 5 + TAG_LEN);

        let entries: Vec<_> = view.wrapped_keys().collect();
        assert_eq!(entries[1].session_id, SessionId::from_bytes([2; 16]));
    }

    #[test]
    fn test_find_session() {
        let raw = sample(3, 0);
        let view = EnvelopeView::parse(&raw).unwrap();

        assert!(view.find(&SessionId::from_bytes([3; 16])).is_some());
        assert!(view.find(&SessionId::from_bytes([9; 16])).is_none());
    }

    #[test]
    fn test_too_short() {
        let raw = sample(1, 0);
        let result = EnvelopeView::parse(&raw[..MIN_ENVELOPE_LEN - 1]);
        assert!(matches!(result, Err(CryptoError::MalformedEnvelope(_))));
    }

    #[test]
    fn test_count_exceeds_length() {
        let mut raw = sample(1, 0);
        // Claim 2 sessions while carrying only one.
        raw[1] = 2;
        let result = EnvelopeView::parse(&raw);
        assert!(matches!(result, Err(CryptoError::MalformedEnvelope(_))));
    }

    #[test]
    fn test_unknown_version() {
        let mut raw = sample(1, 0);
        raw[0] = 2;
        let result = EnvelopeView::parse(&raw);
        assert!(matches!(result, Err(CryptoError::MalformedEnvelope(_))));
    }
}
