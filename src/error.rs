// Error types for the StarkEx client crypto core
//
// Every failure is raised synchronously at the call boundary; no operation
// retries or partially succeeds.

use thiserror::Error;

/// Cryptographic error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Hex strings expected to be prefixed with 0x.")]
    MissingHexPrefix,

    #[error("Invalid hex string for {name}.")]
    InvalidHex { name: &'static str },

    #[error("Invalid decimal string for {name}.")]
    InvalidDecimal { name: &'static str },

    /// A typed field is outside its declared range. The message text is part
    /// of the wire-level contract with existing consumers.
    #[error("Message not signable, invalid {name} length.")]
    InvalidRange { name: &'static str },

    #[error("Invalid Pedersen input: {0}")]
    InvalidHashInput(String),

    /// The running accumulator shares its x-coordinate with the constant
    /// point about to be added. Indicates a corrupted point table, not a
    /// caller error.
    #[error("Pedersen accumulator collides with constant point {index}")]
    PointCollision { index: usize },

    #[error("Message hash exceeds the ECDSA digest bound")]
    DigestOutOfRange,

    #[error("Signature component out of range: {component}")]
    SignatureOutOfRange { component: &'static str },

    #[error("Invalid message hash length: {len} hex digits")]
    InvalidDigestLength { len: usize },

    #[error("Constant point table rejected: {0}")]
    InvalidTable(String),

    #[error("Point is not on the Stark curve")]
    InvalidPoint,
}
