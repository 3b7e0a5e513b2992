//! Envelope encoding and decoding.

use bytes::{BufMut, BytesMut};
use rand::{CryptoRng, RngCore};

use mixin_trust_core::{encoding, CryptoError, Identity, Result};

use crate::crypto::{generate_iv, ContentKey, ContentNonce};
use crate::recipient::RecipientSession;
use crate::wire::{envelope_len, EnvelopeView, WrappedKey, VERSION};

/// Encrypt `plaintext` for every session in `recipients`.
///
/// Returns the envelope as unpadded base64url. Entries appear in the
/// session table in the order given.
pub fn encode(
    identity: &Identity,
    plaintext: &[u8],
    recipients: &[RecipientSession],
) -> Result<String> {
    encode_with_rng(identity, plaintext, recipients, &mut rand::thread_rng())
}

/// [`encode`] with a caller-supplied randomness source.
pub fn encode_with_rng<R: RngCore + CryptoRng>(
    identity: &Identity,
    plaintext: &[u8],
    recipients: &[RecipientSession],
    rng: &mut R,
) -> Result<String> {
    encode_bytes_with_rng(identity, plaintext, recipients, rng).map(encoding::encode)
}

/// Build the raw envelope bytes.
///
/// Randomness is drawn in a fixed order: the content key, the nonce, then
/// one IV per recipient.
pub fn encode_bytes_with_rng<R: RngCore + CryptoRng>(
    identity: &Identity,
    plaintext: &[u8],
    recipients: &[RecipientSession],
    rng: &mut R,
) -> Result<Vec<u8>> {
    let keypair = identity.key().ed25519()?;
    let count = u16::try_from(recipients.len()).map_err(|_| {
        CryptoError::MalformedEnvelope(format!(
            "{} recipients exceed the session table limit of {}",
            recipients.len(),
            u16::MAX
        ))
    })?;

    let secret = keypair.x25519_secret();
    let content_key = ContentKey::generate(rng);
    let nonce = ContentNonce::generate(rng);

    let mut buf = BytesMut::with_capacity(envelope_len(recipients.len(), plaintext.len()));
    buf.put_u8(VERSION);
    buf.put_u16_le(count);
    buf.put_slice(keypair.x25519_public().as_bytes());

    for recipient in recipients {
        let shared = secret.diffie_hellman(&recipient.public_key);
        let iv = generate_iv(rng);
        WrappedKey {
            session_id: recipient.session_id,
            iv,
            ciphertext: content_key.wrap(&shared, &iv)?,
        }
        .write_to(&mut buf);
    }

    buf.put_slice(nonce.as_bytes());
    buf.put_slice(&content_key.seal(&nonce, plaintext)?);

    tracing::debug!(
        sender = %identity.session_id(),
        recipients = count,
        len = buf.len(),
        "sealed envelope"
    );
    Ok(buf.to_vec())
}

/// Decrypt a base64url envelope addressed to `identity`'s session.
pub fn decode(identity: &Identity, data: &str) -> Result<Vec<u8>> {
    let raw = encoding::decode(data)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("invalid base64: {e}")))?;
    decode_bytes(identity, &raw)
}

/// Decrypt raw envelope bytes addressed to `identity`'s session.
pub fn decode_bytes(identity: &Identity, raw: &[u8]) -> Result<Vec<u8>> {
    let view = EnvelopeView::parse(raw)?;

    let session_id = identity.session_id();
    let entry = view
        .find(&session_id)
        .ok_or(CryptoError::SessionNotFound(session_id))?;
    let keypair = identity.key().ed25519()?;

    let shared = keypair.x25519_secret().diffie_hellman(view.sender_public());
    let content_key = ContentKey::unwrap_key(&shared, &entry.iv, &entry.ciphertext)?;
    let nonce = ContentNonce::from_bytes(*view.nonce());

    content_key.open(&nonce, view.sealed()).map_err(|e| {
        tracing::warn!(
            session = %session_id,
            sender = ?view.sender_public(),
            "envelope failed authentication"
        );
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{HEADER_LEN, MIN_ENVELOPE_LEN, SESSION_ENTRY_LEN};
    use mixin_trust_core::{Keypair, PrivateKey, SessionId, UserId};
    use mixin_trust_testkit::ScriptedRng;
    use proptest::prelude::*;

    fn user(n: u8) -> UserId {
        UserId(uuid::Uuid::from_bytes([n; 16]))
    }

    fn party(n: u8) -> (Identity, RecipientSession) {
        let session = SessionId::generate();
        let seed = [n; 32];
        let identity = Identity::ed25519(user(n), session, &seed);
        let recipient = RecipientSession::new(
            user(n),
            session,
            Keypair::from_seed(&seed).x25519_public(),
        );
        (identity, recipient)
    }

    #[test]
    fn test_known_envelope() {
        let sender = Identity::ed25519(
            "11111111-1111-1111-1111-111111111111".parse().unwrap(),
            "11111111-1111-1111-1111-111111111111".parse().unwrap(),
            &[0x01; 32],
        );
        let session: SessionId = "22222222-2222-2222-2222-222222222222".parse().unwrap();
        let receiver = Identity::ed25519(
            "22222222-2222-2222-2222-222222222222".parse().unwrap(),
            session,
            &[0x02; 32],
        );
        let recipient = RecipientSession::from_ed25519_public(
            receiver.user_id(),
            session,
            &Keypair::from_seed(&[0x02; 32]).public_key(),
        )
        .unwrap();

        let content_key: Vec<u8> = (0u8..16).collect();
        let mut rng = ScriptedRng::new(&[content_key.as_slice(), &[0xaa; 12][..], &[0xbb; 16][..]]);
        let data = encode_with_rng(&sender, b"hello", &[recipient], &mut rng).unwrap();

        assert_eq!(
            data,
            "AQEAGxtY3VDqFLYNoXt5DNAnVNlwybq4ZOuzwPMBb-UdP1ciIiIiIiIiIiIiIiIiIiIiu7u7u7u7u7u7u7u7u7u7u1Lf4NH3ySQLZyoh3Tz5ssjqaSeoyYO3kZ8xpSm8Bp4uqqqqqqqqqqqqqqqqQ1BfrL2-dfr8QOsIVPp3Ev7LMIxm"
        );
        assert_eq!(decode(&receiver, &data).unwrap(), b"hello");
    }

    #[test]
    fn test_every_recipient_can_decode() {
        let (sender, _) = party(1);
        let parties: Vec<_> = (2..6).map(party).collect();
        let recipients: Vec<_> = parties.iter().map(|(_, r)| r.clone()).collect();

        let data = encode(&sender, b"group message", &recipients).unwrap();

        for (identity, _) in &parties {
            assert_eq!(decode(identity, &data).unwrap(), b"group message");
        }
    }

    #[test]
    fn test_sender_can_include_itself() {
        let (sender, own) = party(1);
        let (_, other) = party(2);

        let data = encode(&sender, b"note to self", &[other, own]).unwrap();
        assert_eq!(decode(&sender, &data).unwrap(), b"note to self");
    }

    #[test]
    fn test_table_order_matches_input() {
        let (sender, _) = party(1);
        let recipients: Vec<_> = (2..5).map(|n| party(n).1).collect();

        let raw =
            encode_bytes_with_rng(&sender, b"x", &recipients, &mut rand::thread_rng()).unwrap();
        let view = EnvelopeView::parse(&raw).unwrap();

        let ids: Vec<_> = view.wrapped_keys().map(|w| w.session_id).collect();
        let expected: Vec<_> = recipients.iter().map(|r| r.session_id).collect();
        assert_eq!(ids, expected);
        assert_eq!(view.sender_public(), &Keypair::from_seed(&[1; 32]).x25519_public());
    }

    #[test]
    fn test_fresh_iv_per_recipient() {
        let (sender, _) = party(1);
        let recipients: Vec<_> = (2..4).map(|n| party(n).1).collect();

        let raw =
            encode_bytes_with_rng(&sender, b"x", &recipients, &mut rand::thread_rng()).unwrap();
        let view = EnvelopeView::parse(&raw).unwrap();
        let entries: Vec<_> = view.wrapped_keys().collect();
        assert_ne!(entries[0].iv, entries[1].iv);
    }

    #[test]
    fn test_empty_recipient_list() {
        let (sender, _) = party(1);
        let raw = encode_bytes_with_rng(&sender, b"abc", &[], &mut rand::thread_rng()).unwrap();

        assert_eq!(raw.len(), envelope_len(0, 3));
        assert_eq!(&raw[1..3], &[0, 0]);
    }

    #[test]
    fn test_too_many_recipients() {
        let (sender, recipient) = party(1);
        let recipients = vec![recipient; u16::MAX as usize + 1];

        let result = encode(&sender, b"x", &recipients);
        assert!(matches!(result, Err(CryptoError::MalformedEnvelope(_))));
    }

    #[test]
    fn test_arbitrary_recipient_key() {
        let (sender, _) = party(1);
        let mut key = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut key);
        let recipient = RecipientSession::new(
            user(9),
            SessionId::generate(),
            mixin_trust_core::X25519PublicKey::from_bytes(key),
        );

        assert!(encode(&sender, b"x", &[recipient]).is_ok());
    }

    #[test]
    fn test_session_not_in_table() {
        let (sender, _) = party(1);
        let (_, recipient) = party(2);
        let (outsider, _) = party(3);

        let data = encode(&sender, b"secret", &[recipient]).unwrap();
        let result = decode(&outsider, &data);
        assert!(
            matches!(result, Err(CryptoError::SessionNotFound(id)) if id == outsider.session_id())
        );
    }

    #[test]
    fn test_tampered_ciphertext() {
        let (sender, _) = party(1);
        let (receiver, recipient) = party(2);

        let mut raw =
            encode_bytes_with_rng(&sender, b"secret", &[recipient], &mut rand::thread_rng())
                .unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x80;

        assert!(matches!(
            decode_bytes(&receiver, &raw),
            Err(CryptoError::AuthenticationFailure)
        ));
    }

    #[test]
    fn test_tampered_wrapped_key() {
        let (sender, _) = party(1);
        let (receiver, recipient) = party(2);

        let mut raw =
            encode_bytes_with_rng(&sender, b"secret", &[recipient], &mut rand::thread_rng())
                .unwrap();
        // First byte of the wrapped key.
        raw[HEADER_LEN + 32] ^= 0x01;

        assert!(matches!(
            decode_bytes(&receiver, &raw),
            Err(CryptoError::AuthenticationFailure)
        ));
    }

    #[test]
    fn test_substituted_sender_key() {
        let (sender, _) = party(1);
        let (receiver, recipient) = party(2);

        let mut raw =
            encode_bytes_with_rng(&sender, b"secret", &[recipient], &mut rand::thread_rng())
                .unwrap();
        let impostor = Keypair::from_seed(&[7; 32]).x25519_public();
        raw[3..HEADER_LEN].copy_from_slice(impostor.as_bytes());

        assert!(matches!(
            decode_bytes(&receiver, &raw),
            Err(CryptoError::AuthenticationFailure)
        ));
    }

    #[test]
    fn test_truncated_envelope() {
        let (sender, _) = party(1);
        let (receiver, recipient) = party(2);

        let raw = encode_bytes_with_rng(&sender, b"", &[recipient], &mut rand::thread_rng())
            .unwrap();
        assert_eq!(raw.len(), MIN_ENVELOPE_LEN);

        assert!(matches!(
            decode_bytes(&receiver, &raw[..raw.len() - 1]),
            Err(CryptoError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_invalid_base64() {
        let (receiver, _) = party(2);
        assert!(matches!(
            decode(&receiver, "not*base64"),
            Err(CryptoError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_padded_base64_accepted() {
        let (sender, _) = party(1);
        let (receiver, recipient) = party(2);

        let mut data = encode(&sender, b"hi", &[recipient]).unwrap();
        while data.len() % 4 != 0 {
            data.push('=');
        }
        assert_eq!(decode(&receiver, &data).unwrap(), b"hi");
    }

    #[test]
    fn test_rsa_identity_rejected() {
        let key = rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
        let identity = Identity::new(user(1), SessionId::generate(), PrivateKey::Rsa(Box::new(key)));
        let (_, recipient) = party(2);

        assert!(matches!(
            encode(&identity, b"x", &[recipient]),
            Err(CryptoError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_rsa_identity_cannot_decode() {
        let key = rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
        let session = SessionId::generate();
        let identity = Identity::new(user(1), session, PrivateKey::Rsa(Box::new(key)));
        let (sender, _) = party(2);
        let recipient = RecipientSession::new(user(1), session, Keypair::generate().x25519_public());

        let data = encode(&sender, b"x", &[recipient]).unwrap();
        assert!(matches!(
            decode(&identity, &data),
            Err(CryptoError::UnsupportedAlgorithm(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_roundtrip_any_payload(
            plaintext in proptest::collection::vec(any::<u8>(), 0..512),
            count in 1usize..4,
        ) {
            let (sender, _) = party(1);
            let parties: Vec<_> = (0..count).map(|i| party(10 + i as u8)).collect();
            let recipients: Vec<_> = parties.iter().map(|(_, r)| r.clone()).collect();

            let raw = encode_bytes_with_rng(&sender, &plaintext, &recipients, &mut rand::thread_rng())
                .unwrap();
            prop_assert_eq!(raw.len(), envelope_len(count, plaintext.len()));
            prop_assert_eq!(raw.len(), HEADER_LEN + SESSION_ENTRY_LEN * count + 12 + plaintext.len() + 16);

            for (identity, _) in &parties {
                prop_assert_eq!(decode_bytes(identity, &raw).unwrap(), plaintext.clone());
            }
        }
    }
}
