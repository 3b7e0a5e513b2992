//! PIN encryption.
//!
//! PIN-gated calls (verify/update PIN, transfers) carry the PIN encrypted
//! under a 32-byte key that only this session and the server can derive:
//!
//! - Ed25519 sessions: `X25519(curve25519(seed), pin_token)`
//! - RSA sessions: RSA-OAEP(SHA-256, label = session id) decryption of the
//!   PIN token
//!
//! The plaintext is `pin || unix_secs (u64 LE) || iterator || pkcs7 pad`,
//! encrypted with AES-256-CBC under a fresh IV and shipped as unpadded
//! base64url of `iv || ciphertext`.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockEncryptMut, KeyIvInit};
use rand::{CryptoRng, RngCore};
use rsa::Oaep;
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

use mixin_trust_core::{encoding, CryptoError, Identity, PrivateKey, Result, X25519PublicKey};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;

/// AES block size, also the IV length.
pub const BLOCK_SIZE: usize = 16;

/// Length of the derived PIN key.
pub const PIN_KEY_LEN: usize = 32;

/// Encrypt a PIN using the system clock and thread-local CSPRNG.
///
/// `iterator`, when given, is appended verbatim in place of the nanosecond
/// timestamp; callers that need uniqueness across rapid calls pass 8 bytes.
pub fn encrypt(
    identity: &Identity,
    pin: &str,
    pin_token: &[u8],
    iterator: Option<&[u8]>,
) -> Result<String> {
    encrypt_at(
        identity,
        pin,
        pin_token,
        iterator,
        SystemTime::now(),
        &mut rand::thread_rng(),
    )
}

/// Encrypt a PIN with an explicit clock reading and random source.
pub fn encrypt_at<R: RngCore + CryptoRng>(
    identity: &Identity,
    pin: &str,
    pin_token: &[u8],
    iterator: Option<&[u8]>,
    now: SystemTime,
    rng: &mut R,
) -> Result<String> {
    let key = derive_key(identity, pin_token)?;
    let plaintext = pin_plaintext(pin, iterator, now);

    let mut iv = [0u8; BLOCK_SIZE];
    rng.fill_bytes(&mut iv);

    let cipher = Aes256CbcEnc::new_from_slices(&key, &iv)
        .map_err(|e| CryptoError::InvalidKeyMaterial(e.to_string()))?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(&plaintext);

    let mut out = Vec::with_capacity(BLOCK_SIZE + ciphertext.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);
    Ok(encoding::encode(out))
}

/// Derive the 32-byte PIN key from the server-issued PIN token.
pub fn derive_key(identity: &Identity, pin_token: &[u8]) -> Result<[u8; PIN_KEY_LEN]> {
    let key = match identity.key() {
        PrivateKey::Ed25519(keypair) => {
            let token_public = X25519PublicKey::from_slice(pin_token)?;
            keypair.x25519_secret().diffie_hellman(&token_public).to_vec()
        }
        PrivateKey::Rsa(rsa_key) => {
            let label = identity.session_id().to_string();
            rsa_key
                .decrypt(Oaep::new_with_label::<Sha256, _>(label), pin_token)
                .map_err(|e| CryptoError::DecryptFailure(format!("pin token unwrap: {e}")))?
        }
    };

    key.as_slice().try_into().map_err(|_| {
        CryptoError::InvalidKeyMaterial(format!(
            "derived pin key must be {PIN_KEY_LEN} bytes, got {}",
            key.len()
        ))
    })
}

/// The unpadded PIN plaintext; PKCS#7 padding is applied by the cipher.
fn pin_plaintext(pin: &str, iterator: Option<&[u8]>, now: SystemTime) -> Vec<u8> {
    let since_epoch = now.duration_since(UNIX_EPOCH).unwrap_or_default();

    let mut buf = Vec::with_capacity(pin.len() + 16 + BLOCK_SIZE);
    buf.extend_from_slice(pin.as_bytes());
    buf.extend_from_slice(&since_epoch.as_secs().to_le_bytes());
    match iterator {
        Some(iterator) => buf.extend_from_slice(iterator),
        None => buf.extend_from_slice(&(since_epoch.as_nanos() as u64).to_le_bytes()),
    }
    buf
}
