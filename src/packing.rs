// Instruction Word Packing
//
// Packs typed instruction fields into big integers by left-shift-and-add.
// Bit widths are exact: a misplaced bit changes the digest, so each layout
// is written as one shift chain in MSB-to-LSB field order. Every packed
// word fits under 2^251 and feeds the Pedersen hash as a field element.

use num_bigint::BigUint;

use crate::felt::Felt252;

/// Base word shared by plain orders and transfers (251 bits):
/// type · vault0 (31) · vault1 (31) · amount0 (63) · amount1 (63) ·
/// nonce (31) · expiration (22).
pub(crate) fn pack_base_word(
    instruction_type: u64,
    vault0: &BigUint,
    vault1: &BigUint,
    amount0: &BigUint,
    amount1: &BigUint,
    nonce: &BigUint,
    expiration_timestamp: &BigUint,
) -> Felt252 {
    let mut word = BigUint::from(instruction_type);
    word = (word << 31) + vault0;
    word = (word << 31) + vault1;
    word = (word << 63) + amount0;
    word = (word << 63) + amount1;
    word = (word << 31) + nonce;
    word = (word << 22) + expiration_timestamp;

    debug_assert!(word.bits() <= 251);
    Felt252::from_biguint(&word)
}

/// First word of the fee-bearing layouts (224 bits):
/// a (64) · b (64) · c (64) · nonce (32). Fields are padded to 64/32-bit
/// lanes for uniform packing even where the semantic range is narrower.
pub(crate) fn pack_fee_word_one(
    a: &BigUint,
    b: &BigUint,
    c: &BigUint,
    nonce: &BigUint,
) -> Felt252 {
    let mut word = a.clone();
    word = (word << 64) + b;
    word = (word << 64) + c;
    word = (word << 32) + nonce;

    debug_assert!(word.bits() <= 251);
    Felt252::from_biguint(&word)
}

/// Second word of the fee-bearing limit order:
/// type · feeVaultId (64) · vaultSell (64) · vaultBuy (64) ·
/// expiration (32) · zero padding (17).
pub(crate) fn pack_order_fee_word_two(
    instruction_type: u64,
    fee_vault_id: &BigUint,
    vault_sell: &BigUint,
    vault_buy: &BigUint,
    expiration_timestamp: &BigUint,
) -> Felt252 {
    let mut word = BigUint::from(instruction_type);
    word = (word << 64) + fee_vault_id;
    word = (word << 64) + vault_sell;
    word = (word << 64) + vault_buy;
    word = (word << 32) + expiration_timestamp;
    word <<= 17;

    debug_assert!(word.bits() <= 251);
    Felt252::from_biguint(&word)
}

/// Second word of the fee-bearing transfer:
/// type · amount (64) · feeLimit (64) · expiration (32) · zero padding (81).
pub(crate) fn pack_transfer_fee_word_two(
    instruction_type: u64,
    amount: &BigUint,
    fee_limit: &BigUint,
    expiration_timestamp: &BigUint,
) -> Felt252 {
    let mut word = BigUint::from(instruction_type);
    word = (word << 64) + amount;
    word = (word << 64) + fee_limit;
    word = (word << 32) + expiration_timestamp;
    word <<= 81;

    debug_assert!(word.bits() <= 251);
    Felt252::from_biguint(&word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::{One, Zero};

    fn big(x: u64) -> BigUint {
        BigUint::from(x)
    }

    fn mask(bits: u64) -> BigUint {
        (BigUint::one() << bits) - BigUint::one()
    }

    #[test]
    fn test_base_word_field_positions() {
        let word = pack_base_word(
            3,
            &big(21),
            &big(27),
            &big(2154549703648910716),
            &big(1470242115489520459),
            &big(0),
            &big(438953),
        )
        .to_biguint();

        assert_eq!(&word >> (31 + 31 + 63 + 63 + 31 + 22), big(3));
        assert_eq!((&word >> (31 + 63 + 63 + 31 + 22)) & mask(31), big(21));
        assert_eq!((&word >> (63 + 63 + 31 + 22)) & mask(31), big(27));
        assert_eq!(
            (&word >> (63 + 31 + 22)) & mask(63),
            big(2154549703648910716)
        );
        assert_eq!((&word >> (31 + 22)) & mask(63), big(1470242115489520459));
        assert_eq!((&word >> 22) & mask(31), big(0));
        assert_eq!(&word & mask(22), big(438953));
    }

    #[test]
    fn test_base_word_maximal_fields_fit() {
        let word = pack_base_word(
            5,
            &mask(31),
            &mask(31),
            &mask(63),
            &mask(63),
            &mask(31),
            &mask(22),
        )
        .to_biguint();
        assert!(word.bits() <= 251);
    }

    #[test]
    fn test_fee_word_one_positions() {
        let word = pack_fee_word_one(&big(100), &big(200), &big(300), &big(7)).to_biguint();

        assert_eq!(&word >> (64 + 64 + 32), big(100));
        assert_eq!((&word >> (64 + 32)) & mask(64), big(200));
        assert_eq!((&word >> 32) & mask(64), big(300));
        assert_eq!(&word & mask(32), big(7));
    }

    #[test]
    fn test_order_fee_word_two_padding() {
        let word =
            pack_order_fee_word_two(3, &big(10), &big(20), &big(30), &big(40)).to_biguint();

        // Low 17 bits are zero padding
        assert_eq!(&word & mask(17), BigUint::zero());
        assert_eq!((&word >> 17) & mask(32), big(40));
        assert_eq!((&word >> (17 + 32)) & mask(64), big(30));
        assert_eq!((&word >> (17 + 32 + 64)) & mask(64), big(20));
        assert_eq!((&word >> (17 + 32 + 64 + 64)) & mask(64), big(10));
        assert_eq!(&word >> (17 + 32 + 64 + 64 + 64), big(3));
    }

    #[test]
    fn test_transfer_fee_word_two_padding() {
        let word = pack_transfer_fee_word_two(4, &big(11), &big(22), &big(33)).to_biguint();

        assert_eq!(&word & mask(81), BigUint::zero());
        assert_eq!((&word >> 81) & mask(32), big(33));
        assert_eq!((&word >> (81 + 32)) & mask(64), big(22));
        assert_eq!((&word >> (81 + 32 + 64)) & mask(64), big(11));
        assert_eq!(&word >> (81 + 32 + 64 + 64), big(4));
    }
}
