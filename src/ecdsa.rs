// ECDSA over the Stark Curve
//
// Signing and verification of 252-bit digests. The module does not bind to
// any key representation: signing consumes a `DigestSigner` capability that
// produces (r, s) over a length-adjusted digest and supplies its own
// randomness; verification is a `DigestVerifier` capability, implemented
// here for affine public keys.
//
// # Digest length fix-up
//
// A standard ECDSA library right-shifts the digest by
// 8 * byteLen(digest) - bitLen(N) = 4 bits whenever the digest occupies the
// full 252 bits (63 hex digits round up to 32 bytes). `fix_msg_hash_len`
// cancels that shift by appending one '0' nibble, and is a no-op for
// digests of 62 hex digits or fewer, whose byte length stays at 31.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{CONSTANT_POINTS, MAX_ECDSA_BIGUINT, N_BIGUINT};
use crate::curve::ECPoint;
use crate::error::CryptoError;
use crate::felt::{mod_inverse, Felt252};
use crate::guards::assert_in_range;

/// An ECDSA signature (r, s) over the Stark curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcSignature {
    pub r: Felt252,
    pub s: Felt252,
}

impl EcSignature {
    pub fn new(r: Felt252, s: Felt252) -> Self {
        EcSignature { r, s }
    }

    /// Parse from minimal hex component strings.
    pub fn from_hex(r: &str, s: &str) -> Option<Self> {
        Some(EcSignature {
            r: Felt252::from_hex(r)?,
            s: Felt252::from_hex(s)?,
        })
    }
}

/// Capability that produces a raw (r, s) signature over a length-adjusted
/// digest. Implementations hold the private key material and supply their
/// own nonce randomness; neither ever passes through this crate.
pub trait DigestSigner {
    fn ecdsa_sign(&self, adjusted_digest: &str) -> Result<EcSignature, CryptoError>;
}

/// Capability that checks a raw (r, s) signature over a length-adjusted
/// digest.
pub trait DigestVerifier {
    fn ecdsa_verify(&self, adjusted_digest: &str, signature: &EcSignature)
        -> Result<bool, CryptoError>;
}

/// Adjust a digest's hex representation for the underlying ECDSA library.
/// Digests of up to 62 hex digits pass through; a 63-digit digest gains one
/// trailing '0' (a 4-bit left shift); anything longer is invalid.
pub fn fix_msg_hash_len(msg_hash: &str) -> Result<String, CryptoError> {
    let stripped = normalize_digest(msg_hash)?;

    match stripped.len() {
        0..=62 => Ok(stripped),
        63 => Ok(format!("{stripped}0")),
        len => Err(CryptoError::InvalidDigestLength { len }),
    }
}

/// Undo the byte-alignment shift a standard ECDSA library applies: drop
/// 8 * byteLen - 252 bits when positive. Inverse of [`fix_msg_hash_len`]
/// for every digest in [0, 2^251).
pub fn truncate_to_n(adjusted_digest: &str) -> Result<BigUint, CryptoError> {
    let stripped = normalize_digest(adjusted_digest)?;
    let value = BigUint::parse_bytes(stripped.as_bytes(), 16)
        .ok_or(CryptoError::InvalidHex { name: "msgHash" })?;

    let byte_len = stripped.len().div_ceil(2);
    let delta = 8 * byte_len as i64 - 252;
    if delta > 0 {
        Ok(value >> delta as u64)
    } else {
        Ok(value)
    }
}

/// Lowercase a digest string, drop an optional `0x` prefix and leading
/// zeros, and reject non-hex characters.
fn normalize_digest(msg_hash: &str) -> Result<String, CryptoError> {
    let lower = msg_hash.to_lowercase();
    let bare = lower.strip_prefix("0x").unwrap_or(&lower);
    if bare.is_empty() || !bare.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CryptoError::InvalidHex { name: "msgHash" });
    }
    let stripped = bare.trim_start_matches('0');
    if stripped.is_empty() {
        Ok("0".to_string())
    } else {
        Ok(stripped.to_string())
    }
}

/// Parse a digest and check it lies in [0, 2^251).
fn checked_digest_value(msg_hash: &str) -> Result<BigUint, CryptoError> {
    let stripped = normalize_digest(msg_hash)?;
    let value = BigUint::parse_bytes(stripped.as_bytes(), 16)
        .ok_or(CryptoError::InvalidHex { name: "msgHash" })?;
    assert_in_range(&value, &BigUint::zero(), &MAX_ECDSA_BIGUINT, "msgHash")?;
    Ok(value)
}

/// Range checks shared by signing and verification:
/// r in [1, 2^251), s in [1, N), w = s^(-1) mod N in [1, 2^251).
fn check_signature_ranges(signature: &EcSignature) -> Result<BigUint, CryptoError> {
    let r = signature.r.to_biguint();
    let s = signature.s.to_biguint();

    if r < BigUint::one() || r >= *MAX_ECDSA_BIGUINT {
        return Err(CryptoError::SignatureOutOfRange { component: "r" });
    }
    if s < BigUint::one() || s >= *N_BIGUINT {
        return Err(CryptoError::SignatureOutOfRange { component: "s" });
    }

    let w = mod_inverse(&s, &N_BIGUINT)
        .ok_or(CryptoError::SignatureOutOfRange { component: "w" })?;
    if w < BigUint::one() || w >= *MAX_ECDSA_BIGUINT {
        return Err(CryptoError::SignatureOutOfRange { component: "w" });
    }

    Ok(w)
}

/// Sign a digest. The digest must lie in [0, 2^251); the produced signature
/// is range-checked before it is returned.
pub fn sign<K: DigestSigner>(key: &K, msg_hash: &str) -> Result<EcSignature, CryptoError> {
    checked_digest_value(msg_hash)?;
    let adjusted = fix_msg_hash_len(msg_hash)?;

    let signature = key.ecdsa_sign(&adjusted)?;
    check_signature_ranges(&signature)?;
    Ok(signature)
}

/// Verify a signature over a digest in [0, 2^251). Range violations on r, s
/// or w are errors; an honest mismatch returns Ok(false).
pub fn verify<K: DigestVerifier>(
    key: &K,
    msg_hash: &str,
    signature: &EcSignature,
) -> Result<bool, CryptoError> {
    checked_digest_value(msg_hash)?;
    let adjusted = fix_msg_hash_len(msg_hash)?;

    check_signature_ranges(signature)?;
    key.ecdsa_verify(&adjusted, signature)
}

/// An affine Stark-curve public key, usable as a [`DigestVerifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyingKey {
    point: ECPoint,
}

impl VerifyingKey {
    /// Wrap an affine point, rejecting points not on the curve.
    pub fn new(point: ECPoint) -> Result<Self, CryptoError> {
        if point.is_infinity() || !point.is_on_curve() {
            return Err(CryptoError::InvalidPoint);
        }
        Ok(VerifyingKey { point })
    }

    /// Build from (x, y) hex coordinates.
    pub fn from_hex_coordinates(x: &str, y: &str) -> Result<Self, CryptoError> {
        let x = Felt252::from_hex(x).ok_or(CryptoError::InvalidHex { name: "publicKeyX" })?;
        let y = Felt252::from_hex(y).ok_or(CryptoError::InvalidHex { name: "publicKeyY" })?;
        Self::new(ECPoint::new(x, y))
    }

    pub fn point(&self) -> &ECPoint {
        &self.point
    }
}

impl DigestVerifier for VerifyingKey {
    /// Standard ECDSA acceptance: with u1 = m/s and u2 = r/s (mod N),
    /// R = u1*G + u2*Q must satisfy R.x ≡ r (mod N).
    fn ecdsa_verify(
        &self,
        adjusted_digest: &str,
        signature: &EcSignature,
    ) -> Result<bool, CryptoError> {
        let m = truncate_to_n(adjusted_digest)? % &*N_BIGUINT;
        let r = signature.r.to_biguint();
        let s = signature.s.to_biguint();

        let w = mod_inverse(&s, &N_BIGUINT)
            .ok_or(CryptoError::SignatureOutOfRange { component: "w" })?;
        let u1 = (&m * &w) % &*N_BIGUINT;
        let u2 = (&r * &w) % &*N_BIGUINT;

        let generator = CONSTANT_POINTS.generator();
        let point = generator
            .scalar_mul(&Felt252::from_biguint(&u1))
            .add(&self.point.scalar_mul(&Felt252::from_biguint(&u2)));

        if point.is_infinity() {
            debug!("signature rejected: combined point at infinity");
            return Ok(false);
        }

        Ok(point.x.to_biguint() % &*N_BIGUINT == r % &*N_BIGUINT)
    }
}
