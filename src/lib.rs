//! # StarkEx Client Crypto
//!
//! Client-side cryptographic core for a layer-2 exchange protocol over the
//! Stark curve. Three capabilities:
//!
//! - the Pedersen hash built from 506 precomputed curve points,
//! - canonical serialization and hashing of limit-order and transfer
//!   instructions (with optional fee and condition variants),
//! - ECDSA signing and verification of the resulting digests, including the
//!   one-nibble digest length fix-up expected by byte-aligned ECDSA
//!   libraries.
//!
//! The crate is purely functional at its API boundary: the only shared
//! state is the constant point table, initialized once and read-only
//! thereafter. It holds no keys and performs no I/O; signing consumes an
//! opaque [`DigestSigner`] capability that supplies its own randomness.
//!
//! All hash digests are exchanged as minimal lowercase hex without a `0x`
//! prefix; typed field elements (tokens, public keys, conditions) arrive
//! `0x`-prefixed; amounts arrive as base-10 strings to preserve their full
//! 63-bit range.

pub mod constants; // Curve parameters and the 506-point Pedersen table
pub mod curve;     // Affine short-Weierstrass point arithmetic
pub mod ecdsa;     // Sign/verify with digest length adjustment
pub mod error;
pub mod felt;      // 252-bit Stark field element
pub mod guards;    // Range guards and boundary parsers
pub mod messages;  // Instruction hashers (orders and transfers)
pub mod pedersen;  // The Pedersen hash itself

mod packing; // Bit-exact instruction word layouts

// Re-export the public surface
pub use constants::{ConstantPointTable, CONSTANT_POINTS};
pub use curve::ECPoint;
pub use ecdsa::{
    fix_msg_hash_len, sign, truncate_to_n, verify, DigestSigner, DigestVerifier, EcSignature,
    VerifyingKey,
};
pub use error::CryptoError;
pub use felt::Felt252;
pub use messages::{
    get_limit_order_msg_hash, get_limit_order_msg_hash_with_fee, get_transfer_msg_hash,
    get_transfer_msg_hash_with_fee, InstructionType,
};
pub use pedersen::{pedersen, pedersen_hash};
