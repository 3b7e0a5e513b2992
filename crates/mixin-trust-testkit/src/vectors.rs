//! Golden test vectors for interoperability.
//!
//! Expected values were produced with an independent implementation
//! (libsodium-compatible key conversion, OpenSSL AES) and must never change.

use mixin_trust_core::{Identity, Keypair, SessionId, UserId};
use mixin_trust_envelope::{encode_with_rng, RecipientSession};

use crate::fixtures::ScriptedRng;

/// Ed25519 seed to Curve25519 conversion.
#[derive(Debug, Clone)]
pub struct ConversionVector {
    pub seed: [u8; 32],
    /// Ed25519 public key (hex).
    pub ed25519_public: &'static str,
    /// Clamped Curve25519 scalar (hex).
    pub x25519_private: &'static str,
    /// Curve25519 public key (hex).
    pub x25519_public: &'static str,
}

/// Get all key conversion vectors.
pub fn conversion_vectors() -> Vec<ConversionVector> {
    vec![
        ConversionVector {
            seed: [0x01; 32],
            ed25519_public: "8a88e3dd7409f195fd52db2d3cba5d72ca6709bf1d94121bf3748801b40f6f5c",
            x25519_private: "58e86efb75fa4e2c410f46e16de9f6acae1a1703528651b69bc176c088bef36e",
            x25519_public: "1b1b58dd50ea14b60da17b790cd02754d970c9bab864ebb3c0f3016fe51d3f57",
        },
        ConversionVector {
            seed: [0x02; 32],
            ed25519_public: "8139770ea87d175f56a35466c34c7ecccb8d8a91b4ee37a25df60f5b8fc9b394",
            x25519_private: "a83c626bc9c38c8c201878ebb1d5b0b50ac40e8986c78793db1d4ef369fca14e",
            x25519_public: "60346e7c911a5f6ba154129174cafe75b294ac3bbd5549632f48cec6266f8410",
        },
    ]
}

/// A single-recipient envelope with every random input pinned.
#[derive(Debug, Clone)]
pub struct EnvelopeVector {
    pub name: &'static str,
    pub sender_seed: [u8; 32],
    pub sender_user: &'static str,
    pub sender_session: &'static str,
    pub recipient_seed: [u8; 32],
    pub recipient_user: &'static str,
    pub recipient_session: &'static str,
    pub content_key: [u8; 16],
    pub nonce: [u8; 12],
    pub iv: [u8; 16],
    pub plaintext: &'static [u8],
    /// Expected envelope, unpadded base64url.
    pub expected: &'static str,
}

impl EnvelopeVector {
    pub fn sender(&self) -> Identity {
        Identity::ed25519(
            parse(self.sender_user),
            parse(self.sender_session),
            &self.sender_seed,
        )
    }

    pub fn recipient_identity(&self) -> Identity {
        Identity::ed25519(
            parse(self.recipient_user),
            parse(self.recipient_session),
            &self.recipient_seed,
        )
    }

    pub fn recipient(&self) -> RecipientSession {
        RecipientSession::new(
            parse(self.recipient_user),
            parse(self.recipient_session),
            Keypair::from_seed(&self.recipient_seed).x25519_public(),
        )
    }

    /// Encode this vector's inputs.
    pub fn encode(&self) -> String {
        let mut rng = ScriptedRng::new(&[&self.content_key[..], &self.nonce[..], &self.iv[..]]);
        encode_with_rng(&self.sender(), self.plaintext, &[self.recipient()], &mut rng)
            .expect("vector encodes")
    }
}

fn parse<T: std::str::FromStr>(s: &str) -> T
where
    T::Err: std::fmt::Debug,
{
    s.parse().expect("vector id parses")
}

/// Get all envelope vectors.
pub fn envelope_vectors() -> Vec<EnvelopeVector> {
    vec![EnvelopeVector {
        name: "hello to one session",
        sender_seed: [0x01; 32],
        sender_user: "11111111-1111-1111-1111-111111111111",
        sender_session: "11111111-1111-1111-1111-111111111111",
        recipient_seed: [0x02; 32],
        recipient_user: "11111111-1111-1111-1111-111111111111",
        recipient_session: "22222222-2222-2222-2222-222222222222",
        content_key: [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
        nonce: [0xaa; 12],
        iv: [0xbb; 16],
        plaintext: b"hello",
        expected: "AQEAGxtY3VDqFLYNoXt5DNAnVNlwybq4ZOuzwPMBb-UdP1ciIiIiIiIiIiIiIiIiIiIiu7u7u7u7u7u7u7u7u7u7u1Lf4NH3ySQLZyoh3Tz5ssjqaSeoyYO3kZ8xpSm8Bp4uqqqqqqqqqqqqqqqqQ1BfrL2-dfr8QOsIVPp3Ev7LMIxm",
    }]
}

/// Conversation id of two users.
#[derive(Debug, Clone)]
pub struct ConversationVector {
    pub a: &'static str,
    pub b: &'static str,
    pub conversation_id: &'static str,
    /// Checksum of the session set `{a, b}` read as session ids.
    pub checksum: &'static str,
}

/// Get all conversation vectors.
pub fn conversation_vectors() -> Vec<ConversationVector> {
    vec![ConversationVector {
        a: "11111111-1111-1111-1111-111111111111",
        b: "22222222-2222-2222-2222-222222222222",
        conversation_id: "47e7170d-735f-3df0-be69-f563f353ccd3",
        checksum: "47e7170d735f4df0fe69f563f353ccd3",
    }]
}

impl ConversationVector {
    pub fn users(&self) -> (UserId, UserId) {
        (parse(self.a), parse(self.b))
    }

    pub fn sessions(&self) -> [SessionId; 2] {
        [parse(self.a), parse(self.b)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixin_trust_core::{ed25519_private_to_curve25519, ed25519_public_to_curve25519};
    use mixin_trust_envelope::{decode, recipients_checksum, unique_conversation_id};

    #[test]
    fn test_conversion_vectors() {
        for v in conversion_vectors() {
            let keypair = Keypair::from_seed(&v.seed);
            assert_eq!(hex::encode(keypair.public_key()), v.ed25519_public);

            let x_private = ed25519_private_to_curve25519(&v.seed).unwrap();
            assert_eq!(hex::encode(x_private), v.x25519_private);

            let x_public = ed25519_public_to_curve25519(&keypair.public_key()).unwrap();
            assert_eq!(hex::encode(x_public), v.x25519_public);
        }
    }

    #[test]
    fn test_envelope_vectors() {
        for v in envelope_vectors() {
            let data = v.encode();
            assert_eq!(data, v.expected, "{}", v.name);
            assert_eq!(decode(&v.recipient_identity(), &data).unwrap(), v.plaintext);
        }
    }

    #[test]
    fn test_conversation_vectors() {
        for v in conversation_vectors() {
            let (a, b) = v.users();
            assert_eq!(unique_conversation_id(&a, &b).to_string(), v.conversation_id);
            assert_eq!(recipients_checksum(&v.sessions()), v.checksum);
        }
    }
}
