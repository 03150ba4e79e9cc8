//! Property-based tests for the envelope codec.
//!
//! - Roundtrip: sealing then opening returns the payload
//! - Tamper detection: any single flipped bit in IV or ciphertext fails
//! - url64: encoding is reversible and never emits path-unsafe characters

use proptest::prelude::*;

use crate::hybrid::test_keys::keypair;
use crate::{bytes_to_url64, url64_to_bytes, CryptoError, ResponsePublicKey, SymmetricKey};

proptest! {
    #[test]
    fn url64_roundtrip(bytes: Vec<u8>) {
        let encoded = bytes_to_url64(&bytes);
        prop_assert!(!encoded.contains('='));
        prop_assert!(!encoded.contains('/'));
        prop_assert_eq!(url64_to_bytes(&encoded).unwrap(), bytes);
    }

    #[test]
    fn symmetric_roundtrip(plaintext: Vec<u8>) {
        let key = SymmetricKey::generate();
        let envelope = key.seal(&plaintext).unwrap();
        prop_assert_eq!(key.open(&envelope).unwrap(), plaintext);
    }

    #[test]
    fn symmetric_bit_flip_detected(
        plaintext in prop::collection::vec(any::<u8>(), 0..64),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let key = SymmetricKey::generate();
        let mut envelope = key.seal(&plaintext).unwrap();
        let i = position.index(envelope.len());
        envelope[i] ^= 1 << bit;
        prop_assert_eq!(key.open(&envelope), Err(CryptoError::DecryptionFailed));
    }
}

proptest! {
    // RSA-OAEP per case is slow; keep the case count modest.
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn hybrid_roundtrip(plaintext in prop::collection::vec(any::<u8>(), 0..512)) {
        let (private, public_url64) = keypair();
        let key = ResponsePublicKey::from_url64(public_url64).unwrap();
        let envelope = key.seal(&plaintext).unwrap();
        prop_assert_eq!(envelope.open(private).unwrap(), plaintext);
    }

    #[test]
    fn hybrid_bit_flip_detected(
        plaintext in prop::collection::vec(any::<u8>(), 1..128),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let (private, public_url64) = keypair();
        let key = ResponsePublicKey::from_url64(public_url64).unwrap();
        let mut envelope = key.seal(&plaintext).unwrap();

        let mut data = url64_to_bytes(&envelope.encrypted_data).unwrap();
        let i = position.index(data.len());
        data[i] ^= 1 << bit;
        envelope.encrypted_data = bytes_to_url64(&data);

        prop_assert_eq!(envelope.open(private), Err(CryptoError::DecryptionFailed));
    }
}
