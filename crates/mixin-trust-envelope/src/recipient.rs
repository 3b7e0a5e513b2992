//! Recipient sessions.

use serde::{Deserialize, Serialize};

use mixin_trust_core::{Result, SessionId, UserId, X25519PublicKey};

/// One device of a conversation member that a message is encrypted for.
///
/// Deserializes from the platform's session JSON, where `public_key` is
/// base64url text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientSession {
    pub user_id: UserId,
    pub session_id: SessionId,
    #[serde(with = "public_key_base64")]
    pub public_key: X25519PublicKey,
}

impl RecipientSession {
    /// Create a recipient from its Curve25519 public key.
    pub fn new(user_id: UserId, session_id: SessionId, public_key: X25519PublicKey) -> Self {
        Self {
            user_id,
            session_id,
            public_key,
        }
    }

    /// Create a recipient from the session's Ed25519 public key.
    pub fn from_ed25519_public(
        user_id: UserId,
        session_id: SessionId,
        ed25519_public: &[u8],
    ) -> Result<Self> {
        let public_key = X25519PublicKey::from_ed25519(ed25519_public)?;
        Ok(Self::new(user_id, session_id, public_key))
    }
}

mod public_key_base64 {
    use mixin_trust_core::{encoding, X25519PublicKey};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(key: &X25519PublicKey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encoding::encode(key.as_bytes()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<X25519PublicKey, D::Error> {
        let text = String::deserialize(deserializer)?;
        let bytes = encoding::decode(&text).map_err(D::Error::custom)?;
        X25519PublicKey::from_slice(&bytes).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixin_trust_core::{encoding, CryptoError, Keypair};

    #[test]
    fn test_parse_session_json() {
        let key = [0x5au8; 32];
        let json = format!(
            r#"{{"user_id":"11111111-1111-1111-1111-111111111111",
                "session_id":"22222222-2222-2222-2222-222222222222",
                "public_key":"{}","platform":"Android"}}"#,
            encoding::encode(key)
        );

        let recipient: RecipientSession = serde_json::from_str(&json).unwrap();
        assert_eq!(recipient.public_key.as_bytes(), &key);
        assert_eq!(
            recipient.session_id.to_string(),
            "22222222-2222-2222-2222-222222222222"
        );
    }

    #[test]
    fn test_reject_short_public_key() {
        let json = format!(
            r#"{{"user_id":"11111111-1111-1111-1111-111111111111",
                "session_id":"22222222-2222-2222-2222-222222222222",
                "public_key":"{}"}}"#,
            encoding::encode([1u8; 20])
        );
        assert!(serde_json::from_str::<RecipientSession>(&json).is_err());
    }

    #[test]
    fn test_from_ed25519_public() {
        let keypair = Keypair::from_seed(&[0x33; 32]);
        let recipient = RecipientSession::from_ed25519_public(
            "11111111-1111-1111-1111-111111111111".parse().unwrap(),
            SessionId::generate(),
            &keypair.public_key(),
        )
        .unwrap();

        assert_eq!(recipient.public_key, keypair.x25519_public());
    }

    #[test]
    fn test_from_ed25519_public_bad_length() {
        let result = RecipientSession::from_ed25519_public(
            "11111111-1111-1111-1111-111111111111".parse().unwrap(),
            SessionId::generate(),
            &[0u8; 31],
        );
        assert!(matches!(result, Err(CryptoError::InvalidKeyMaterial(_))));
    }
}
