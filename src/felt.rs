// Stark Field Element (252-bit)
//
// Field prime: P = 2^251 + 17 * 2^192 + 1
//
// `Felt252` is a raw 256-bit container; addition and subtraction reduce
// modulo P in pure limb arithmetic, while multiplication and inversion go
// through num-bigint. Range invariants stronger than "fits in 256 bits"
// (hash inputs < P, digests < 2^251) are enforced at the call boundaries,
// not by the container.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::constants::{P_BIGUINT, STARK_PRIME};

/// A field element in the Stark prime field.
/// Represented as 4 x 64-bit limbs in little-endian order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Felt252 {
    /// Limbs in little-endian order (limbs[0] is least significant)
    pub limbs: [u64; 4],
}

impl Felt252 {
    /// Zero element
    pub const ZERO: Self = Felt252 { limbs: [0, 0, 0, 0] };

    /// One element
    pub const ONE: Self = Felt252 { limbs: [1, 0, 0, 0] };

    /// Create from raw limbs (little-endian)
    pub const fn from_raw(limbs: [u64; 4]) -> Self {
        Felt252 { limbs }
    }

    /// Create from a u64 value
    pub fn from_u64(val: u64) -> Self {
        Felt252 { limbs: [val, 0, 0, 0] }
    }

    /// Create from big-endian bytes (32 bytes)
    pub fn from_be_bytes(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for i in 0..4 {
            let offset = (3 - i) * 8;
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&bytes[offset..offset + 8]);
            limbs[i] = u64::from_be_bytes(chunk);
        }
        Felt252 { limbs }
    }

    /// Convert to big-endian bytes (32 bytes)
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for i in 0..4 {
            let offset = (3 - i) * 8;
            bytes[offset..offset + 8].copy_from_slice(&self.limbs[i].to_be_bytes());
        }
        bytes
    }

    /// Parse from a hex string, with or without a `0x` prefix.
    /// Accepts at most 64 hex digits; odd-length strings are left-padded.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        if s.is_empty() || s.len() > 64 {
            return None;
        }
        let padded_str;
        let s = if s.len() % 2 == 1 {
            padded_str = format!("0{s}");
            &padded_str
        } else {
            s
        };
        let bytes = hex::decode(s).ok()?;

        let mut padded = [0u8; 32];
        padded[32 - bytes.len()..].copy_from_slice(&bytes);
        Some(Felt252::from_be_bytes(&padded))
    }

    /// Minimal-length lowercase hex, no `0x` prefix, no leading zeros.
    /// This is the wire format every public function returns.
    pub fn to_hex(&self) -> String {
        let full = hex::encode(self.to_be_bytes());
        let trimmed = full.trim_start_matches('0');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&x| x == 0)
    }

    /// Bit `i` of the value, counting from the least significant bit.
    #[inline]
    pub fn bit(&self, i: usize) -> bool {
        (self.limbs[i / 64] >> (i % 64)) & 1 == 1
    }

    /// Limb-wise addition; the returned flag is the carry out of the top limb.
    fn add_with_carry(&self, other: &Self) -> (Self, bool) {
        let mut out = [0u64; 4];
        let mut carry = false;
        for (i, slot) in out.iter_mut().enumerate() {
            let (partial, overflow_a) = self.limbs[i].overflowing_add(other.limbs[i]);
            let (full, overflow_b) = partial.overflowing_add(carry as u64);
            *slot = full;
            // At most one of the two additions can wrap
            carry = overflow_a || overflow_b;
        }
        (Felt252 { limbs: out }, carry)
    }

    /// Limb-wise subtraction; the returned flag is the borrow out of the top
    /// limb.
    fn sub_with_borrow(&self, other: &Self) -> (Self, bool) {
        let mut out = [0u64; 4];
        let mut borrow = false;
        for (i, slot) in out.iter_mut().enumerate() {
            let (partial, underflow_a) = self.limbs[i].overflowing_sub(other.limbs[i]);
            let (full, underflow_b) = partial.overflowing_sub(borrow as u64);
            *slot = full;
            borrow = underflow_a || underflow_b;
        }
        (Felt252 { limbs: out }, borrow)
    }

    /// Modular addition: (self + other) mod P
    pub fn add_mod(&self, other: &Self) -> Self {
        let (sum, carry) = self.add_with_carry(other);

        if carry || sum >= STARK_PRIME {
            let (result, _) = sum.sub_with_borrow(&STARK_PRIME);
            result
        } else {
            sum
        }
    }

    /// Modular subtraction: (self - other) mod P
    pub fn sub_mod(&self, other: &Self) -> Self {
        let (diff, borrow) = self.sub_with_borrow(other);

        if borrow {
            let (result, _) = diff.add_with_carry(&STARK_PRIME);
            result
        } else {
            diff
        }
    }

    /// Modular negation: -self mod P
    pub fn neg_mod(&self) -> Self {
        if self.is_zero() {
            *self
        } else {
            STARK_PRIME.sub_mod(self)
        }
    }

    /// Modular multiplication: (self * other) mod P
    pub fn mul_mod(&self, other: &Self) -> Self {
        let product = self.to_biguint() * other.to_biguint();
        Self::from_biguint(&(product % &*P_BIGUINT))
    }

    /// Modular inverse: self^(-1) mod P, via the extended Euclidean algorithm
    pub fn inv_mod(&self) -> Option<Self> {
        mod_inverse(&self.to_biguint(), &P_BIGUINT).map(|inv| Self::from_biguint(&inv))
    }

    /// Convert to BigUint
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.to_be_bytes())
    }

    /// Convert from BigUint. The value must fit in 256 bits.
    pub fn from_biguint(n: &BigUint) -> Self {
        let bytes = n.to_bytes_be();
        debug_assert!(bytes.len() <= 32, "value does not fit in 256 bits");
        let mut padded = [0u8; 32];
        padded[32 - bytes.len()..].copy_from_slice(&bytes);
        Felt252::from_be_bytes(&padded)
    }
}

impl Ord for Felt252 {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..4).rev() {
            match self.limbs[i].cmp(&other.limbs[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Felt252 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Default for Felt252 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Felt252 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

/// Modular inverse over an arbitrary modulus via the extended Euclidean
/// algorithm. Returns None when no inverse exists.
pub(crate) fn mod_inverse(a: &BigUint, modulus: &BigUint) -> Option<BigUint> {
    if a.is_zero() || modulus.is_zero() {
        return None;
    }

    let modulus_int = BigInt::from(modulus.clone());
    let mut old_r = BigInt::from(a % modulus);
    let mut r = modulus_int.clone();
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if old_r != BigInt::one() {
        return None;
    }

    let mut inv = old_s % &modulus_int;
    if inv.is_negative() {
        inv += &modulus_int;
    }
    inv.to_biguint()
}
