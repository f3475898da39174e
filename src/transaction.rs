//! Transaction validation, canonical serialization and coinbase construction

use crate::config::BuildConfig;
use crate::constants::*;
use crate::error::Result;
use crate::types::*;

/// CheckTransaction: 𝒯𝒳 → {valid, invalid}
///
/// A transaction tx = (v, ins, outs) is valid if and only if:
/// 1. v, ins and outs are all present
/// 2. |ins| > 0 ∧ |outs| > 0
/// 3. ins[0] carries the output it spends
/// 4. ins[0].prevout.value ≥ outs[0].value
/// 5. fee = ins[0].prevout.value - outs[0].value ≤ outs[0].value / 10
///
/// Only the first input and first output take part in the fee check.
pub fn check_transaction(tx: &Transaction) -> ValidationResult {
    // 1. Required fields
    let (Some(_), Some(inputs), Some(outputs)) = (&tx.version, &tx.vin, &tx.vout) else {
        return ValidationResult::Invalid("Missing version, vin or vout".to_string());
    };

    // 2. Non-empty inputs and outputs
    let (Some(first_input), Some(first_output)) = (inputs.first(), outputs.first()) else {
        return ValidationResult::Invalid("Empty inputs or outputs".to_string());
    };

    // 3. Spent output must be known
    let Some(prevout) = &first_input.prevout else {
        return ValidationResult::Invalid("First input has no prevout".to_string());
    };

    // 4. Non-negative fee
    if prevout.value < first_output.value {
        return ValidationResult::Invalid(format!(
            "Negative fee: input {} < output {}",
            prevout.value, first_output.value
        ));
    }

    // 5. Fee at most 10% of the first output
    let fee = prevout.value - first_output.value;
    if fee as u128 * MAX_FEE_RATIO_DENOMINATOR as u128 > first_output.value as u128 {
        return ValidationResult::Invalid(format!(
            "Fee {} exceeds 10% of output {}",
            fee, first_output.value
        ));
    }

    ValidationResult::Valid
}

/// Pure accept/reject form of [`check_transaction`]
pub fn validate_transaction(tx: &Transaction) -> bool {
    check_transaction(tx).is_valid()
}

/// Fee from the first input and first output, negative when the output
/// exceeds the input. `None` when either side is missing.
pub fn calculate_fee(tx: &Transaction) -> Option<i128> {
    let input = tx.vin.as_ref()?.first()?.prevout.as_ref()?.value;
    let output = tx.vout.as_ref()?.first()?.value;
    Some(input as i128 - output as i128)
}

/// Canonical serialized form: compact JSON record terminated by a newline
pub fn serialize_transaction(tx: &Transaction) -> Result<String> {
    let mut record = serde_json::to_string(tx)?;
    record.push('\n');
    Ok(record)
}

/// Size of a transaction in bytes, as counted against the block budget
pub fn calculate_transaction_size(tx: &Transaction) -> Result<usize> {
    Ok(serialize_transaction(tx)?.len())
}

/// Create the coinbase transaction paying the configured block reward
pub fn create_coinbase_transaction(config: &BuildConfig) -> Transaction {
    Transaction {
        txid: Some(config.coinbase_txid.clone()),
        version: Some(HEADER_VERSION),
        locktime: None,
        vin: Some(vec![]),
        vout: Some(vec![TransactionOutput {
            scriptpubkey: Some(config.coinbase_scriptpubkey.clone()),
            scriptpubkey_type: None,
            value: config.block_reward,
            ..Default::default()
        }]),
        ..Default::default()
    }
}

/// Check if transaction is the coinbase: no inputs and exactly one output
pub fn is_coinbase(tx: &Transaction) -> bool {
    matches!(&tx.vin, Some(inputs) if inputs.is_empty())
        && matches!(&tx.vout, Some(outputs) if outputs.len() == 1)
}
