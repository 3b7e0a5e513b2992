//! Edwards to Montgomery key conversion.
//!
//! A session signs with Ed25519 and agrees keys with X25519 using the same
//! key material. The private conversion is the libsodium one:
//! `clamp(SHA-512(seed)[0..32])`. The public conversion maps the Edwards
//! point to its birationally equivalent Montgomery u-coordinate.

use ed25519_dalek::{SigningKey, VerifyingKey};

use crate::error::{CryptoError, Result};

/// Convert an Ed25519 private key into a Curve25519 scalar.
///
/// Accepts a 32-byte seed or the 64-byte `seed || public` layout.
pub fn ed25519_private_to_curve25519(private_key: &[u8]) -> Result<[u8; 32]> {
    let seed = seed_from_slice(private_key)?;
    Ok(seed_to_curve25519(&seed))
}

/// Convert a 32-byte Ed25519 public key into a Curve25519 public key.
pub fn ed25519_public_to_curve25519(public_key: &[u8]) -> Result<[u8; 32]> {
    let bytes: [u8; 32] = public_key.try_into().map_err(|_| {
        CryptoError::InvalidKeyMaterial(format!(
            "ed25519 public key must be 32 bytes, got {}",
            public_key.len()
        ))
    })?;
    let verifying_key = VerifyingKey::from_bytes(&bytes)
        .map_err(|e| CryptoError::InvalidKeyMaterial(e.to_string()))?;
    Ok(verifying_key.to_montgomery().to_bytes())
}

pub(crate) fn seed_to_curve25519(seed: &[u8; 32]) -> [u8; 32] {
    let mut scalar = SigningKey::from_bytes(seed).to_scalar_bytes();
    scalar[0] &= 248;
    scalar[31] &= 127;
    scalar[31] |= 64;
    scalar
}

pub(crate) fn seed_from_slice(private_key: &[u8]) -> Result<[u8; 32]> {
    match private_key.len() {
        32 | 64 => {
            let mut seed = [0u8; 32];
            seed.copy_from_slice(&private_key[..32]);
            Ok(seed)
        }
        n => Err(CryptoError::InvalidKeyMaterial(format!(
            "ed25519 private key must be 32 or 64 bytes, got {n}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use x25519_dalek::{PublicKey, StaticSecret};

    #[test]
    fn test_private_conversion_is_clamped() {
        let scalar = ed25519_private_to_curve25519(&[0x5a; 32]).unwrap();
        assert_eq!(scalar[0] & 7, 0);
        assert_eq!(scalar[31] & 0x80, 0);
        assert_eq!(scalar[31] & 0x40, 0x40);
    }

    #[test]
    fn test_private_conversion_accepts_expanded_layout() {
        let seed = [0x21u8; 32];
        let public = SigningKey::from_bytes(&seed).verifying_key().to_bytes();
        let mut expanded = seed.to_vec();
        expanded.extend_from_slice(&public);

        assert_eq!(
            ed25519_private_to_curve25519(&expanded).unwrap(),
            ed25519_private_to_curve25519(&seed).unwrap()
        );
    }

    #[test]
    fn test_private_conversion_rejects_bad_length() {
        for len in [0usize, 31, 33, 63, 65] {
            let result = ed25519_private_to_curve25519(&vec![1u8; len]);
            assert!(matches!(result, Err(CryptoError::InvalidKeyMaterial(_))));
        }
    }

    #[test]
    fn test_public_conversion_rejects_bad_length() {
        let result = ed25519_public_to_curve25519(&[9u8; 16]);
        assert!(matches!(result, Err(CryptoError::InvalidKeyMaterial(_))));
    }

    proptest! {
        #[test]
        fn test_conversions_commute(seed: [u8; 32]) {
            // X25519 base-point multiplication of the converted scalar must
            // land on the converted Edwards public key.
            let ed_public = SigningKey::from_bytes(&seed).verifying_key().to_bytes();

            let scalar = ed25519_private_to_curve25519(&seed).unwrap();
            let derived = PublicKey::from(&StaticSecret::from(scalar));
            let converted = ed25519_public_to_curve25519(&ed_public).unwrap();

            prop_assert_eq!(*derived.as_bytes(), converted);
        }
    }
}
