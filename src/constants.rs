// Stark Curve Parameters and the Pedersen Constant Point Table
//
// Curve: y² = x³ + αx + β (mod P), α = 1
// Field prime: P = 2^251 + 17 * 2^192 + 1
//
// The Pedersen hash consumes a table of 506 points: index 0 is the shift
// point (the initial accumulator), index 1 is the ECDSA generator G, and
// indices 2..506 are the per-bit addends, 252 per hashed element. The table
// is the hash function's trusted setup: every point is validated to lie on
// the curve before the table is frozen.

use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_traits::One;
use tracing::debug;

use crate::curve::ECPoint;
use crate::error::CryptoError;
use crate::felt::Felt252;

/// Stark field prime: P = 2^251 + 17 * 2^192 + 1
/// Hex: 0x0800000000000011000000000000000000000000000000000000000000000001
pub const STARK_PRIME: Felt252 = Felt252::from_raw([
    0x0000000000000001,
    0x0000000000000000,
    0x0000000000000000,
    0x0800000000000011,
]);

/// Curve coefficient α = 1
pub const STARK_ALPHA: u64 = 1;

/// Curve coefficient β
/// Hex: 0x06f21413efbe40de150e596d72f7a8c5609ad26c15c915c1f4cdfcb99cee9e89
pub const STARK_BETA: Felt252 = Felt252::from_raw([
    0xf4cdfcb99cee9e89,
    0x609ad26c15c915c1,
    0x150e596d72f7a8c5,
    0x06f21413efbe40de,
]);

/// Order of the curve's cyclic subgroup
/// Hex: 0x0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f
pub const CURVE_ORDER: Felt252 = Felt252::from_raw([
    0x1e66a241adc64d2f,
    0xb781126dcae7b232,
    0xffffffffffffffff,
    0x0800000000000010,
]);

/// Upper bound for ECDSA digests and signature components: 2^251
pub const MAX_ECDSA_VAL: Felt252 = Felt252::from_raw([0, 0, 0, 0x0800000000000000]);

/// Bits hashed per input element
pub const N_ELEMENT_BITS_HASH: usize = 252;

/// Bit width of the low chunk of a hashed element; the remaining 4 bits use
/// the next base point's doubling chain.
const LOW_PART_BITS: usize = 248;

/// Number of points in the constant table: shift point + generator +
/// 2 * 252 bit addends.
pub const CONSTANT_POINT_COUNT: usize = 506;

// Base points of the table, as (x, y) hex pairs. Indices 2..506 are the
// doubling chains 2^j * Pᵢ of the four hash points, 248 + 4 entries per
// hashed element.
const SHIFT_POINT_HEX: (&str, &str) = (
    "049ee3eba8c1600700ee1b87eb599f16716b0b1022947733551fde4050ca6804",
    "03ca0cfe4b3bc6ddf346d49d06ea0ed34e621062c0e056c1d0405d266e10268a",
);

const GENERATOR_HEX: (&str, &str) = (
    "01ef15c18599971b7beced415a40f0c7deacfd9b0d1819e03d723d8bc943cfca",
    "005668060aa49730b7be4801df46ec62de53ecd11abe43a32873000c36e8dc1f",
);

const HASH_POINTS_HEX: [(&str, &str); 4] = [
    (
        "0234287dcbaffe7f969c748655fca9e58fa8120b6d56eb0c1080d17957ebe47b",
        "03b056f100f96fb21e889527d41f4e39940135dd7a6c94cc6ed0268ee89e5615",
    ),
    (
        "04fa56f376c83db33f9dab2656558f3399099ec1de5e3018b7a6932dba8aa378",
        "03fa0984c931c9e38113e0c0e47e4401562761f92a7a23b45168f4e80ff5b54d",
    ),
    (
        "04ba4cc166be8dec764910f75b45f74b40c690c74709e90f3aa372f0bd2d6997",
        "0040301cf5c1751f4b971e46c4ede85fcac5c59a5ce5ae7c48151f27b24b219c",
    ),
    (
        "054302dcb0e6cc1c6e44cca8f61a63bb2ca65048d53fb325d36ff12c49a58202",
        "01b77b3e37d13504b348046268d8ae25ce98ad783c25561a879dcc77e99c2426",
    ),
];

lazy_static! {
    /// Field prime as BigUint (cached to avoid repeated parsing)
    pub static ref P_BIGUINT: BigUint = BigUint::from_bytes_be(&STARK_PRIME.to_be_bytes());

    /// Curve order N as BigUint
    pub static ref N_BIGUINT: BigUint = BigUint::from_bytes_be(&CURVE_ORDER.to_be_bytes());

    /// 2^251, the exclusive digest bound
    pub static ref MAX_ECDSA_BIGUINT: BigUint = BigUint::one() << 251;

    /// Exclusive bound for vault ids: 2^31
    pub static ref VAULT_ID_BOUND: BigUint = BigUint::one() << 31;

    /// Exclusive bound for amounts and fee limits: 2^63
    pub static ref AMOUNT_BOUND: BigUint = BigUint::one() << 63;

    /// Exclusive bound for nonces: 2^31
    pub static ref NONCE_BOUND: BigUint = BigUint::one() << 31;

    /// Exclusive bound for expiration timestamps: 2^22
    pub static ref EXPIRATION_BOUND: BigUint = BigUint::one() << 22;

    /// The frozen constant point table, derived once and shared read-only.
    pub static ref CONSTANT_POINTS: ConstantPointTable = {
        let table = ConstantPointTable::from_points(default_points())
            .expect("built-in constant point data is valid");
        debug!("initialized {} Pedersen constant points", CONSTANT_POINT_COUNT);
        table
    };
}

/// The immutable table of 506 precomputed curve points consumed by the
/// Pedersen hash. Initialized once, read-only thereafter; safe to share
/// across threads without locking.
pub struct ConstantPointTable {
    points: Vec<ECPoint>,
}

impl ConstantPointTable {
    /// Build a table from a full set of points, validating the count and
    /// that every point lies on the curve.
    pub fn from_points(points: Vec<ECPoint>) -> Result<Self, CryptoError> {
        if points.len() != CONSTANT_POINT_COUNT {
            return Err(CryptoError::InvalidTable(format!(
                "expected {} points, got {}",
                CONSTANT_POINT_COUNT,
                points.len()
            )));
        }
        for (i, point) in points.iter().enumerate() {
            if point.is_infinity() || !point.is_on_curve() {
                return Err(CryptoError::InvalidTable(format!(
                    "point {i} is not on the curve"
                )));
            }
        }
        Ok(ConstantPointTable { points })
    }

    /// Build a table from externally supplied (x, y) hex pairs, the form in
    /// which a data provider ships the points.
    pub fn from_hex_pairs(pairs: &[(&str, &str)]) -> Result<Self, CryptoError> {
        let mut points = Vec::with_capacity(pairs.len());
        for (i, (x, y)) in pairs.iter().enumerate() {
            let x = Felt252::from_hex(x)
                .ok_or_else(|| CryptoError::InvalidTable(format!("bad x hex at index {i}")))?;
            let y = Felt252::from_hex(y)
                .ok_or_else(|| CryptoError::InvalidTable(format!("bad y hex at index {i}")))?;
            points.push(ECPoint::new(x, y));
        }
        Self::from_points(points)
    }

    /// The shift point S, the Pedersen accumulator's initial value.
    pub fn shift_point(&self) -> &ECPoint {
        &self.points[0]
    }

    /// The ECDSA generator G.
    pub fn generator(&self) -> &ECPoint {
        &self.points[1]
    }

    /// The addend for bit `bit` of hashed element `element`.
    /// Table index: 2 + element * 252 + bit.
    pub fn bit_point(&self, element: usize, bit: usize) -> &ECPoint {
        debug_assert!(element < 2 && bit < N_ELEMENT_BITS_HASH);
        &self.points[2 + element * N_ELEMENT_BITS_HASH + bit]
    }

    /// Raw index of the addend for bit `bit` of element `element`.
    pub fn bit_point_index(element: usize, bit: usize) -> usize {
        2 + element * N_ELEMENT_BITS_HASH + bit
    }
}

/// The canonical 506 points: shift point, generator, then for each of the
/// four published hash base points its doubling chain (248 entries for the
/// low chunk, 4 for the high chunk). Bit-identical to the table shipped as
/// raw hex pairs by the upstream data provider.
fn default_points() -> Vec<ECPoint> {
    let parse = |(x, y): (&str, &str)| -> ECPoint {
        ECPoint::new(
            Felt252::from_hex(x).expect("valid base point hex"),
            Felt252::from_hex(y).expect("valid base point hex"),
        )
    };

    let mut points = Vec::with_capacity(CONSTANT_POINT_COUNT);
    points.push(parse(SHIFT_POINT_HEX));
    points.push(parse(GENERATOR_HEX));

    let chain_lengths = [LOW_PART_BITS, N_ELEMENT_BITS_HASH - LOW_PART_BITS];
    for (base_index, &hex) in HASH_POINTS_HEX.iter().enumerate() {
        let mut current = parse(hex);
        for _ in 0..chain_lengths[base_index % 2] {
            points.push(current);
            current = current.double();
        }
    }

    points
}
