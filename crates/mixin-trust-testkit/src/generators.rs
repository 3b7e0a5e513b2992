//! Proptest generators for property-based testing.

use proptest::prelude::*;

use crate::fixtures::TestParty;

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a numeric PIN.
pub fn pin() -> impl Strategy<Value = String> {
    "[0-9]{6}".prop_map(String::from)
}

/// Generate an HTTP method.
pub fn http_method() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("GET"), Just("POST"), Just("PUT"), Just("DELETE")]
}

/// Generate an API path.
pub fn request_path() -> impl Strategy<Value = String> {
    "/[a-z]{1,12}(/[a-z0-9-]{1,36}){0,2}".prop_map(String::from)
}

/// Parameters for one encrypted message exchange.
#[derive(Debug, Clone)]
pub struct EnvelopeParams {
    pub sender_seed: [u8; 32],
    pub recipient_seeds: Vec<[u8; 32]>,
    /// Index of the recipient that decodes.
    pub reader: usize,
    pub plaintext: Vec<u8>,
}

impl EnvelopeParams {
    /// Build the sender and recipient parties.
    pub fn parties(&self) -> (TestParty, Vec<TestParty>) {
        let sender = TestParty::with_seed(self.sender_seed);
        let recipients = self
            .recipient_seeds
            .iter()
            .map(|seed| TestParty::with_seed(*seed))
            .collect();
        (sender, recipients)
    }
}

impl Arbitrary for EnvelopeParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<[u8; 32]>(),
            prop::collection::vec(any::<[u8; 32]>(), 1..=6),
            payload(1024),
        )
            .prop_flat_map(|(sender_seed, recipient_seeds, plaintext)| {
                let count = recipient_seeds.len();
                (0..count).prop_map(move |reader| EnvelopeParams {
                    sender_seed,
                    recipient_seeds: recipient_seeds.clone(),
                    reader,
                    plaintext: plaintext.clone(),
                })
            })
            .boxed()
    }
}
