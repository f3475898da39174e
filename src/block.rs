//! Block assembly: header construction and size-bounded transaction selection

use crate::config::BuildConfig;
use crate::error::Result;
use crate::transaction::calculate_transaction_size;
use crate::types::*;
use log::{debug, warn};

/// SelectTransactions: 𝒯𝒳 × 𝒯𝒳* × ℕ → 𝒯𝒳*
///
/// First-fit selection in pool order:
/// 1. Include the coinbase first; its size is the running total
/// 2. For each candidate tx, in order:
///    - If total + |tx| ≤ budget: include tx, total += |tx|
///    - Otherwise skip tx (no reordering, no revisiting)
/// 3. Return the selected block
///
/// Candidates are expected to be validated already. A coinbase larger than
/// the budget is still included, and then no candidate fits.
pub fn select_transactions(
    coinbase: Transaction,
    candidates: &[Transaction],
    max_block_size: usize,
) -> Result<SelectedBlock> {
    // 1. Coinbase is unconditional; its size seeds the running total
    let mut total_size = calculate_transaction_size(&coinbase)?;
    if total_size > max_block_size {
        warn!(
            "Coinbase of {} bytes exceeds max block size {}; no other transactions fit",
            total_size, max_block_size
        );
    }

    let mut transactions = Vec::with_capacity(candidates.len() + 1);
    transactions.push(coinbase);
    let mut skipped = 0;

    // 2. Walk candidates once
    for tx in candidates {
        let tx_size = calculate_transaction_size(tx)?;
        if total_size + tx_size <= max_block_size {
            transactions.push(tx.clone());
            total_size += tx_size;
        } else {
            debug!(
                "Skipping transaction {}: {} bytes would exceed budget ({} of {} used)",
                tx.txid.as_deref().unwrap_or("<no txid>"),
                tx_size,
                total_size,
                max_block_size
            );
            skipped += 1;
        }
    }

    Ok(SelectedBlock {
        transactions,
        total_size,
        skipped,
    })
}

/// Construct the header to be mined, with nonce 0
pub fn construct_block_header(config: &BuildConfig) -> BlockHeader {
    BlockHeader {
        version: config.header_version,
        previous_block_hash: config.previous_block_hash.clone(),
        merkle_root_hash: config.merkle_root_hash.clone(),
        timestamp: config.timestamp,
        difficulty_target: config.difficulty_target.clone(),
        nonce: 0,
    }
}
