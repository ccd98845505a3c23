// Sign/verify round-trip tests
//
// The crate leaves nonce generation to the key abstraction, so these tests
// drive it with a fixed-nonce signer doing textbook ECDSA over the Stark
// curve. The nonce is a constant; these keys must never leave a test.

use num_bigint::BigUint;
use num_traits::One;

use starkex_crypto::{
    sign, truncate_to_n, verify, CryptoError, DigestSigner, EcSignature, Felt252, VerifyingKey,
    CONSTANT_POINTS,
};

/// Curve order N.
fn curve_order() -> BigUint {
    BigUint::parse_bytes(
        b"0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f",
        16,
    )
    .unwrap()
}

/// Test-only signing key with a hardcoded nonce.
struct FixedNonceKey {
    private_key: BigUint,
    nonce: BigUint,
}

impl FixedNonceKey {
    fn new(private_key: u64, nonce: u64) -> Self {
        FixedNonceKey {
            private_key: BigUint::from(private_key),
            nonce: BigUint::from(nonce),
        }
    }

    fn verifying_key(&self) -> VerifyingKey {
        let public_point = CONSTANT_POINTS
            .generator()
            .scalar_mul(&Felt252::from_biguint(&self.private_key));
        VerifyingKey::new(public_point).expect("derived key is on the curve")
    }
}

impl DigestSigner for FixedNonceKey {
    fn ecdsa_sign(&self, adjusted_digest: &str) -> Result<EcSignature, CryptoError> {
        let n = curve_order();
        let m = truncate_to_n(adjusted_digest)? % &n;

        // R = k * G, r = R.x mod n
        let r_point = CONSTANT_POINTS
            .generator()
            .scalar_mul(&Felt252::from_biguint(&self.nonce));
        let r = r_point.x.to_biguint() % &n;

        // s = k^(-1) * (m + r * d) mod n; n is prime, so invert via Fermat
        let k_inv = self.nonce.modpow(&(&n - BigUint::from(2u32)), &n);
        let s = (&k_inv * (&m + &r * &self.private_key)) % &n;

        Ok(EcSignature::new(
            Felt252::from_biguint(&r),
            Felt252::from_biguint(&s),
        ))
    }
}

const MSG_HASH: &str = "30e480bed5fe53fa909cc0f8c4d99b8f9f2c016be4c41e13a4848797979c662";

#[test]
fn sign_verify_round_trip() {
    let key = FixedNonceKey::new(123456789, 987654321);

    let signature = sign(&key, MSG_HASH).expect("signing succeeds");

    // w = s^(-1) mod n stays under 2^251
    let n = curve_order();
    let s = signature.s.to_biguint();
    let w = s.modpow(&(&n - BigUint::from(2u32)), &n);
    assert!(w >= BigUint::one());
    assert!(w < (BigUint::one() << 251));

    let verdict = verify(&key.verifying_key(), MSG_HASH, &signature).expect("well-formed inputs");
    assert!(verdict);
}

#[test]
fn bit_flip_in_digest_fails_verification() {
    let key = FixedNonceKey::new(123456789, 987654321);
    let signature = sign(&key, MSG_HASH).unwrap();

    // Flip the low bit of the digest
    let mut flipped = MSG_HASH.to_string();
    flipped.pop();
    flipped.push('3');
    assert_ne!(flipped, MSG_HASH);

    let verdict = verify(&key.verifying_key(), &flipped, &signature).unwrap();
    assert!(!verdict);
}

#[test]
fn wrong_key_fails_verification() {
    let key = FixedNonceKey::new(123456789, 987654321);
    let other = FixedNonceKey::new(55555, 987654321);

    let signature = sign(&key, MSG_HASH).unwrap();
    let verdict = verify(&other.verifying_key(), MSG_HASH, &signature).unwrap();
    assert!(!verdict);
}

#[test]
fn full_width_digest_round_trips_through_length_fix() {
    // 63 hex digits: the digest occupies the full 252 bits and exercises
    // the appended-nibble path on both sign and verify.
    let digest = format!("4{}", "2".repeat(62));
    let key = FixedNonceKey::new(31415926, 27182818);

    let signature = sign(&key, &digest).unwrap();
    assert!(verify(&key.verifying_key(), &digest, &signature).unwrap());
}

#[test]
fn digest_at_ecdsa_bound_is_rejected() {
    let key = FixedNonceKey::new(123456789, 987654321);
    let at_bound = format!("8{}", "0".repeat(62)); // exactly 2^251

    assert_eq!(
        sign(&key, &at_bound),
        Err(CryptoError::InvalidRange { name: "msgHash" })
    );

    let signature = sign(&key, MSG_HASH).unwrap();
    assert_eq!(
        verify(&key.verifying_key(), &at_bound, &signature),
        Err(CryptoError::InvalidRange { name: "msgHash" })
    );
}

#[test]
fn tampered_signature_components_are_rejected() {
    let key = FixedNonceKey::new(123456789, 987654321);
    let signature = sign(&key, MSG_HASH).unwrap();

    let zero_r = EcSignature::new(Felt252::ZERO, signature.s);
    assert_eq!(
        verify(&key.verifying_key(), MSG_HASH, &zero_r),
        Err(CryptoError::SignatureOutOfRange { component: "r" })
    );

    let zero_s = EcSignature::new(signature.r, Felt252::ZERO);
    assert_eq!(
        verify(&key.verifying_key(), MSG_HASH, &zero_s),
        Err(CryptoError::SignatureOutOfRange { component: "s" })
    );
}

#[test]
fn swapped_components_do_not_verify() {
    let key = FixedNonceKey::new(123456789, 987654321);
    let signature = sign(&key, MSG_HASH).unwrap();
    let swapped = EcSignature::new(signature.s, signature.r);

    // Swapping r and s keeps both in range but breaks the equation
    match verify(&key.verifying_key(), MSG_HASH, &swapped) {
        Ok(verdict) => assert!(!verdict),
        Err(CryptoError::SignatureOutOfRange { .. }) => {}
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[test]
fn signature_hex_construction() {
    let signature = EcSignature::from_hex("1f2e3d", "4c5b6a").unwrap();
    assert_eq!(signature.r, Felt252::from_u64(0x1f2e3d));
    assert_eq!(signature.s, Felt252::from_u64(0x4c5b6a));
}
