//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::collections::VecDeque;

use rand::{CryptoRng, RngCore};
use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
use rsa::RsaPrivateKey;
use uuid::Uuid;

use mixin_trust_core::{Identity, Keypair, PrivateKey, SessionId, UserId};
use mixin_trust_envelope::RecipientSession;

/// A user session: its identity and how others address it.
#[derive(Debug, Clone)]
pub struct TestParty {
    pub keypair: Keypair,
    pub identity: Identity,
}

impl TestParty {
    /// Create a party with a random key and fresh ids.
    pub fn new() -> Self {
        Self::from_keypair(Keypair::generate())
    }

    /// Create a party with a deterministic key from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::from_keypair(Keypair::from_seed(&seed))
    }

    fn from_keypair(keypair: Keypair) -> Self {
        let identity = Identity::new(
            UserId::from_uuid(Uuid::new_v4()),
            SessionId::generate(),
            PrivateKey::Ed25519(keypair.clone()),
        );
        Self { keypair, identity }
    }

    /// A second session of the same user.
    pub fn other_session(&self, seed: [u8; 32]) -> Self {
        let keypair = Keypair::from_seed(&seed);
        let identity = Identity::new(
            self.identity.user_id(),
            SessionId::generate(),
            PrivateKey::Ed25519(keypair.clone()),
        );
        Self { keypair, identity }
    }

    pub fn user_id(&self) -> UserId {
        self.identity.user_id()
    }

    pub fn session_id(&self) -> SessionId {
        self.identity.session_id()
    }

    /// This session as a message recipient.
    pub fn recipient(&self) -> RecipientSession {
        RecipientSession::new(
            self.user_id(),
            self.session_id(),
            self.keypair.x25519_public(),
        )
    }
}

impl Default for TestParty {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple parties with distinct deterministic keys.
pub fn multi_party_fixtures(count: usize) -> Vec<TestParty> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            seed[1] = (i >> 8) as u8;
            TestParty::with_seed(seed)
        })
        .collect()
}

/// Recipients for every party, in order.
pub fn recipients(parties: &[TestParty]) -> Vec<RecipientSession> {
    parties.iter().map(TestParty::recipient).collect()
}

/// An RSA session identity and its PKCS#1 PEM encoding.
///
/// 2048 bits; the JWT backend refuses smaller RSA keys.
pub fn rsa_identity() -> (Identity, String) {
    let mut rng = rand::thread_rng();
    let key = RsaPrivateKey::new(&mut rng, 2048).expect("rsa keygen");
    let pem = key
        .to_pkcs1_pem(LineEnding::LF)
        .expect("rsa pem encoding")
        .to_string();
    let identity = Identity::new(
        UserId::from_uuid(Uuid::new_v4()),
        SessionId::generate(),
        PrivateKey::Rsa(Box::new(key)),
    );
    (identity, pem)
}

/// A random source that replays fixed bytes, then counts upward.
///
/// Lets tests pin the content key, nonce and IVs of an envelope.
pub struct ScriptedRng {
    queue: VecDeque<u8>,
    counter: u8,
}

impl ScriptedRng {
    pub fn new(chunks: &[&[u8]]) -> Self {
        Self {
            queue: chunks.iter().flat_map(|c| c.iter().copied()).collect(),
            counter: 0,
        }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let mut b = [0u8; 4];
        self.fill_bytes(&mut b);
        u32::from_le_bytes(b)
    }

    fn next_u64(&mut self) -> u64 {
        let mut b = [0u8; 8];
        self.fill_bytes(&mut b);
        u64::from_le_bytes(b)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest {
            *byte = self.queue.pop_front().unwrap_or_else(|| {
                self.counter = self.counter.wrapping_add(1);
                self.counter
            });
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for ScriptedRng {}
