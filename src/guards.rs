// Input Guards
//
// Every typed field of every public entry point passes through these before
// packing, hashing, or signing. Field names in failures are the wire-level
// names consumers already match on.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::constants::P_BIGUINT;
use crate::error::CryptoError;
use crate::felt::Felt252;

/// Assert lo <= x < hi.
pub fn assert_in_range(
    x: &BigUint,
    lo: &BigUint,
    hi: &BigUint,
    name: &'static str,
) -> Result<(), CryptoError> {
    if x < lo || x >= hi {
        return Err(CryptoError::InvalidRange { name });
    }
    Ok(())
}

/// Parse a `0x`-prefixed field element and check it lies in [0, P).
pub fn parse_prefixed_felt(s: &str, name: &'static str) -> Result<Felt252, CryptoError> {
    if !s.starts_with("0x") && !s.starts_with("0X") {
        return Err(CryptoError::MissingHexPrefix);
    }
    let value = Felt252::from_hex(s).ok_or(CryptoError::InvalidHex { name })?;
    assert_in_range(&value.to_biguint(), &BigUint::zero(), &P_BIGUINT, name)?;
    Ok(value)
}

/// Parse a base-10 quantity string (amounts and fee limits arrive as decimal
/// strings to preserve the full 63-bit range) and check it against `bound`.
pub fn parse_decimal_quantity(
    s: &str,
    bound: &BigUint,
    name: &'static str,
) -> Result<BigUint, CryptoError> {
    if s.is_empty() {
        return Err(CryptoError::InvalidDecimal { name });
    }
    let value =
        BigUint::parse_bytes(s.as_bytes(), 10).ok_or(CryptoError::InvalidDecimal { name })?;
    assert_in_range(&value, &BigUint::zero(), bound, name)?;
    Ok(value)
}

/// Check an integer field against an exclusive power-of-two bound.
pub fn assert_integer_in_range(
    x: u64,
    bound: &BigUint,
    name: &'static str,
) -> Result<BigUint, CryptoError> {
    let value = BigUint::from(x);
    assert_in_range(&value, &BigUint::zero(), bound, name)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::VAULT_ID_BOUND;
    use num_bigint::BigUint;
    use num_traits::Zero;

    #[test]
    fn test_range_boundaries() {
        let lo = BigUint::from(1u32);
        let hi = BigUint::from(10u32);

        assert!(assert_in_range(&BigUint::from(1u32), &lo, &hi, "x").is_ok());
        assert!(assert_in_range(&BigUint::from(9u32), &lo, &hi, "x").is_ok());
        assert_eq!(
            assert_in_range(&BigUint::from(10u32), &lo, &hi, "x"),
            Err(CryptoError::InvalidRange { name: "x" })
        );
        assert_eq!(
            assert_in_range(&BigUint::zero(), &lo, &hi, "x"),
            Err(CryptoError::InvalidRange { name: "x" })
        );
    }

    #[test]
    fn test_range_failure_message() {
        let err = assert_integer_in_range(1 << 31, &VAULT_ID_BOUND, "vaultSell").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Message not signable, invalid vaultSell length."
        );
    }

    #[test]
    fn test_prefixed_felt_requires_prefix() {
        assert_eq!(
            parse_prefixed_felt("1234", "token"),
            Err(CryptoError::MissingHexPrefix)
        );
        assert!(parse_prefixed_felt("0x1234", "token").is_ok());
    }

    #[test]
    fn test_prefixed_felt_rejects_field_overflow() {
        // P itself is out of range
        let p_hex = "0x800000000000011000000000000000000000000000000000000000000000001";
        assert_eq!(
            parse_prefixed_felt(p_hex, "token"),
            Err(CryptoError::InvalidRange { name: "token" })
        );
    }

    #[test]
    fn test_decimal_quantity() {
        let bound = BigUint::from(1u128 << 63);

        let max_ok = (1u128 << 63) - 1;
        assert_eq!(
            parse_decimal_quantity(&max_ok.to_string(), &bound, "amount").unwrap(),
            BigUint::from(max_ok)
        );
        assert_eq!(
            parse_decimal_quantity(&(1u128 << 63).to_string(), &bound, "amount"),
            Err(CryptoError::InvalidRange { name: "amount" })
        );
        assert_eq!(
            parse_decimal_quantity("12a4", &bound, "amount"),
            Err(CryptoError::InvalidDecimal { name: "amount" })
        );
        assert_eq!(
            parse_decimal_quantity("", &bound, "amount"),
            Err(CryptoError::InvalidDecimal { name: "amount" })
        );
    }
}
