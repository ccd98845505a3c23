// Instruction Message Hashers
//
// Serializes limit orders and transfers into their canonical digests: guard
// every field, pack into one or two wide words, then fold through a fixed
// tree of Pedersen hashes whose shape depends on the presence of a fee and
// a condition. The digest must match the on-chain verifier bit for bit.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::constants::{
    AMOUNT_BOUND, EXPIRATION_BOUND, MAX_ECDSA_BIGUINT, NONCE_BOUND, VAULT_ID_BOUND,
};
use crate::error::CryptoError;
use crate::felt::Felt252;
use crate::guards::{assert_integer_in_range, parse_decimal_quantity, parse_prefixed_felt};
use crate::packing::{
    pack_base_word, pack_fee_word_one, pack_order_fee_word_two, pack_transfer_fee_word_two,
};
use crate::pedersen::pedersen_hash;

/// Tag distinguishing the supported instruction shapes. The discriminant is
/// the integer packed into the instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstructionType {
    LimitOrder = 0,
    Transfer = 1,
    ConditionalTransfer = 2,
    LimitOrderWithFee = 3,
    TransferWithFee = 4,
    ConditionalTransferWithFee = 5,
}

impl InstructionType {
    /// Dispatch for transfers: the tag depends on the fee and condition.
    pub fn for_transfer(has_condition: bool, has_fee: bool) -> Self {
        match (has_condition, has_fee) {
            (false, false) => InstructionType::Transfer,
            (true, false) => InstructionType::ConditionalTransfer,
            (false, true) => InstructionType::TransferWithFee,
            (true, true) => InstructionType::ConditionalTransferWithFee,
        }
    }

    /// Dispatch for limit orders.
    pub fn for_limit_order(has_fee: bool) -> Self {
        if has_fee {
            InstructionType::LimitOrderWithFee
        } else {
            InstructionType::LimitOrder
        }
    }

    /// The integer tag packed into the instruction word.
    pub fn tag(self) -> u64 {
        self as u64
    }
}

/// Final digest check: the hash must fit the ECDSA digest bound 2^251.
/// The Pedersen output is already a field element, but the stricter bound
/// is rechecked before the digest leaves the hasher.
fn finalize_digest(digest: Felt252) -> Result<String, CryptoError> {
    if digest.to_biguint() >= *MAX_ECDSA_BIGUINT {
        return Err(CryptoError::DigestOutOfRange);
    }
    Ok(digest.to_hex())
}

/// Digest of a limit order without fee (instruction type 0):
/// H = P( P(tokenSell, tokenBuy), packedWord ).
#[allow(clippy::too_many_arguments)]
pub fn get_limit_order_msg_hash(
    vault_sell: u64,
    vault_buy: u64,
    amount_sell: &str,
    amount_buy: &str,
    token_sell: &str,
    token_buy: &str,
    nonce: u64,
    expiration_timestamp: u64,
) -> Result<String, CryptoError> {
    let vault_sell = assert_integer_in_range(vault_sell, &VAULT_ID_BOUND, "vaultSell")?;
    let vault_buy = assert_integer_in_range(vault_buy, &VAULT_ID_BOUND, "vaultBuy")?;
    let amount_sell = parse_decimal_quantity(amount_sell, &AMOUNT_BOUND, "amountSell")?;
    let amount_buy = parse_decimal_quantity(amount_buy, &AMOUNT_BOUND, "amountBuy")?;
    let token_sell = parse_prefixed_felt(token_sell, "tokenSell")?;
    let token_buy = parse_prefixed_felt(token_buy, "tokenBuy")?;
    let nonce = assert_integer_in_range(nonce, &NONCE_BOUND, "nonce")?;
    let expiration =
        assert_integer_in_range(expiration_timestamp, &EXPIRATION_BOUND, "expirationTimestamp")?;

    let packed = pack_base_word(
        InstructionType::for_limit_order(false).tag(),
        &vault_sell,
        &vault_buy,
        &amount_sell,
        &amount_buy,
        &nonce,
        &expiration,
    );

    let token_pair = pedersen_hash(&[token_sell, token_buy])?;
    let digest = pedersen_hash(&[token_pair, packed])?;
    finalize_digest(digest)
}

/// Digest of a limit order with fee (instruction type 3):
/// tmp = P( P(tokenSell, tokenBuy), feeToken );
/// H = P( P(tmp, word1), word2 ).
#[allow(clippy::too_many_arguments)]
pub fn get_limit_order_msg_hash_with_fee(
    vault_sell: u64,
    vault_buy: u64,
    amount_sell: &str,
    amount_buy: &str,
    token_sell: &str,
    token_buy: &str,
    nonce: u64,
    expiration_timestamp: u64,
    fee_token: &str,
    fee_vault_id: u64,
    fee_limit: &str,
) -> Result<String, CryptoError> {
    let vault_sell = assert_integer_in_range(vault_sell, &VAULT_ID_BOUND, "vaultSell")?;
    let vault_buy = assert_integer_in_range(vault_buy, &VAULT_ID_BOUND, "vaultBuy")?;
    let amount_sell = parse_decimal_quantity(amount_sell, &AMOUNT_BOUND, "amountSell")?;
    let amount_buy = parse_decimal_quantity(amount_buy, &AMOUNT_BOUND, "amountBuy")?;
    let token_sell = parse_prefixed_felt(token_sell, "tokenSell")?;
    let token_buy = parse_prefixed_felt(token_buy, "tokenBuy")?;
    let nonce = assert_integer_in_range(nonce, &NONCE_BOUND, "nonce")?;
    let expiration =
        assert_integer_in_range(expiration_timestamp, &EXPIRATION_BOUND, "expirationTimestamp")?;
    let fee_token = parse_prefixed_felt(fee_token, "feeToken")?;
    let fee_vault_id = assert_integer_in_range(fee_vault_id, &VAULT_ID_BOUND, "feeVaultId")?;
    let fee_limit = parse_decimal_quantity(fee_limit, &AMOUNT_BOUND, "feeLimit")?;

    let word1 = pack_fee_word_one(&amount_sell, &amount_buy, &fee_limit, &nonce);
    let word2 = pack_order_fee_word_two(
        InstructionType::for_limit_order(true).tag(),
        &fee_vault_id,
        &vault_sell,
        &vault_buy,
        &expiration,
    );

    let token_pair = pedersen_hash(&[token_sell, token_buy])?;
    let tmp = pedersen_hash(&[token_pair, fee_token])?;
    let digest = pedersen_hash(&[pedersen_hash(&[tmp, word1])?, word2])?;
    finalize_digest(digest)
}

/// Digest of a transfer without fee (instruction type 1, or 2 when a
/// condition is attached):
/// H = P( P(token, receiverKey), packedWord )          — unconditional
/// H = P( P( P(token, receiverKey), condition ), packedWord ) — conditional
#[allow(clippy::too_many_arguments)]
pub fn get_transfer_msg_hash(
    amount: &str,
    nonce: u64,
    sender_vault_id: u64,
    token: &str,
    receiver_vault_id: u64,
    receiver_public_key: &str,
    expiration_timestamp: u64,
    condition: Option<&str>,
) -> Result<String, CryptoError> {
    let amount = parse_decimal_quantity(amount, &AMOUNT_BOUND, "amount")?;
    let nonce = assert_integer_in_range(nonce, &NONCE_BOUND, "nonce")?;
    let sender_vault_id =
        assert_integer_in_range(sender_vault_id, &VAULT_ID_BOUND, "senderVaultId")?;
    let token = parse_prefixed_felt(token, "token")?;
    let receiver_vault_id =
        assert_integer_in_range(receiver_vault_id, &VAULT_ID_BOUND, "receiverVaultId")?;
    let receiver_public_key = parse_prefixed_felt(receiver_public_key, "receiverPublicKey")?;
    let expiration =
        assert_integer_in_range(expiration_timestamp, &EXPIRATION_BOUND, "expirationTimestamp")?;
    let condition = condition
        .map(|c| parse_prefixed_felt(c, "condition"))
        .transpose()?;

    let instruction_type = InstructionType::for_transfer(condition.is_some(), false);
    // The second amount lane is unused by transfers and packs as zero.
    let packed = pack_base_word(
        instruction_type.tag(),
        &sender_vault_id,
        &receiver_vault_id,
        &amount,
        &BigUint::zero(),
        &nonce,
        &expiration,
    );

    let mut node = pedersen_hash(&[token, receiver_public_key])?;
    if let Some(condition) = condition {
        node = pedersen_hash(&[node, condition])?;
    }
    let digest = pedersen_hash(&[node, packed])?;
    finalize_digest(digest)
}

/// Digest of a transfer with fee (instruction type 4, or 5 when a condition
/// is attached):
/// tmp = P( P(token, feeToken), receiverKey );
/// H = P( P(tmp, word1), word2 )                       — unconditional
/// H = P( P( P(tmp, condition), word1 ), word2 )       — conditional
#[allow(clippy::too_many_arguments)]
pub fn get_transfer_msg_hash_with_fee(
    amount: &str,
    nonce: u64,
    sender_vault_id: u64,
    token: &str,
    receiver_vault_id: u64,
    receiver_public_key: &str,
    expiration_timestamp: u64,
    condition: Option<&str>,
    fee_token: &str,
    fee_vault_id: u64,
    fee_limit: &str,
) -> Result<String, CryptoError> {
    let amount = parse_decimal_quantity(amount, &AMOUNT_BOUND, "amount")?;
    let nonce = assert_integer_in_range(nonce, &NONCE_BOUND, "nonce")?;
    let sender_vault_id =
        assert_integer_in_range(sender_vault_id, &VAULT_ID_BOUND, "senderVaultId")?;
    let token = parse_prefixed_felt(token, "token")?;
    let receiver_vault_id =
        assert_integer_in_range(receiver_vault_id, &VAULT_ID_BOUND, "receiverVaultId")?;
    let receiver_public_key = parse_prefixed_felt(receiver_public_key, "receiverPublicKey")?;
    let expiration =
        assert_integer_in_range(expiration_timestamp, &EXPIRATION_BOUND, "expirationTimestamp")?;
    // Condition parses as hex here exactly like the no-fee path.
    let condition = condition
        .map(|c| parse_prefixed_felt(c, "condition"))
        .transpose()?;
    let fee_token = parse_prefixed_felt(fee_token, "feeToken")?;
    let fee_vault_id = assert_integer_in_range(fee_vault_id, &VAULT_ID_BOUND, "feeVaultId")?;
    let fee_limit = parse_decimal_quantity(fee_limit, &AMOUNT_BOUND, "feeLimit")?;

    let instruction_type = InstructionType::for_transfer(condition.is_some(), true);
    let word1 = pack_fee_word_one(&sender_vault_id, &receiver_vault_id, &fee_vault_id, &nonce);
    let word2 =
        pack_transfer_fee_word_two(instruction_type.tag(), &amount, &fee_limit, &expiration);

    let token_fee_pair = pedersen_hash(&[token, fee_token])?;
    let mut node = pedersen_hash(&[token_fee_pair, receiver_public_key])?;
    if let Some(condition) = condition {
        node = pedersen_hash(&[node, condition])?;
    }
    let digest = pedersen_hash(&[pedersen_hash(&[node, word1])?, word2])?;
    finalize_digest(digest)
}
