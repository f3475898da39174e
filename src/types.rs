//! Core types for block assembly and mining

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Hash type: 256-bit digest
pub type Hash = [u8; 32];

/// Natural number type
pub type Natural = u64;

/// Integer type
pub type Integer = i64;

/// Amount in base units
pub type Amount = u64;

/// Extra record fields carried through unchanged (witness, scriptsig, ...)
pub type ExtraFields = Map<String, Value>;

/// Transaction output: value and spend condition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scriptpubkey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scriptpubkey_type: Option<String>,
    pub value: Amount,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Transaction input: reference to the output it spends
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vout: Option<Natural>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prevout: Option<TransactionOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<Natural>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Transaction record as read from the mempool.
///
/// `version`, `vin` and `vout` are optional so that a record missing one of
/// them still decodes and is rejected by validation rather than by the decoder.
/// Fields not named here are kept in `extra`, so the canonical form (and the
/// size charged against the block budget) covers the whole record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Integer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locktime: Option<Natural>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<Vec<TransactionInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vout: Option<Vec<TransactionOutput>>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Block header. Only `nonce` changes while a header is being mined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: Integer,
    pub previous_block_hash: String,
    pub merkle_root_hash: String,
    pub timestamp: Natural,
    pub difficulty_target: String,
    pub nonce: Natural,
}

/// Transactions chosen for a block: coinbase first, then pool transactions
/// in their original order. `total_size` never exceeds the size budget
/// unless the coinbase alone is larger than it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedBlock {
    pub(crate) transactions: Vec<Transaction>,
    pub total_size: usize,
    pub skipped: usize,
}

impl SelectedBlock {
    /// All transactions, coinbase first
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn coinbase(&self) -> &Transaction {
        &self.transactions[0]
    }

    /// Included transactions, coinbase excluded
    pub fn included(&self) -> &[Transaction] {
        &self.transactions[1..]
    }
}

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Winning nonce and the hex digest it produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub nonce: Natural,
    pub hash: String,
}

/// Outcome of a nonce search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MiningResult {
    Found(Solution),
    Aborted { attempts: Natural },
    Exhausted,
}

/// Header, digest and contents of a successfully mined block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinedBlock {
    pub header: BlockHeader,
    pub hash: String,
    pub block: SelectedBlock,
}
