//! # Block-Builder
//!
//! Minimal proof-of-work block builder: admits transactions from a pending
//! pool, packs them into a size-bounded block behind a coinbase, and searches
//! for a header nonce whose digest falls below a difficulty target.
//!
//! ## Pipeline
//!
//! - Mempool loading (best-effort: unreadable files are skipped, mistyped records are rejected)
//! - Transaction validation (required fields, first-input/first-output fee check)
//! - Block assembly (first-fit selection under a byte budget, coinbase first)
//! - Mining (deterministic header encoding, SHA-256, numeric target comparison)
//! - Result artifact (header lines, coinbase record, included txids)
//!
//! The merkle root and the difficulty target are supplied through
//! [`BuildConfig`]; neither is computed here.
//!
//! ## Usage
//!
//! ```rust
//! use block_builder::BlockBuilder;
//! use block_builder::config::BuildConfig;
//! use block_builder::mining::StopSignal;
//!
//! let mut config = BuildConfig::default();
//! config.difficulty_target = "f".repeat(64);
//!
//! let builder = BlockBuilder::new(config).unwrap();
//! let mined = builder.build(&[], &StopSignal::new()).unwrap();
//! assert_eq!(mined.block.transactions().len(), 1); // coinbase only
//! ```

pub mod types;
pub mod constants;
pub mod config;
pub mod transaction;
pub mod block;
pub mod pow;
pub mod mining;
pub mod mempool;
pub mod output;
pub mod error;

// Re-export commonly used types
pub use types::*;
pub use config::BuildConfig;
pub use error::{BuilderError, Result};

use log::{debug, info};
use mining::StopSignal;
use pow::Target;
use std::path::PathBuf;

/// Block builder bound to one configuration
///
/// # Examples
///
/// ```
/// use block_builder::{BlockBuilder, BuildConfig, Transaction, TransactionInput, TransactionOutput};
///
/// let builder = BlockBuilder::new(BuildConfig::default()).unwrap();
///
/// let tx = Transaction {
///     txid: Some("a1".to_string()),
///     version: Some(1),
///     locktime: Some(0),
///     vin: Some(vec![TransactionInput {
///         txid: Some("prev".to_string()),
///         vout: Some(0),
///         prevout: Some(TransactionOutput {
///             scriptpubkey: None,
///             scriptpubkey_type: None,
///             value: 100,
///             ..Default::default()
///         }),
///         sequence: None,
///         ..Default::default()
///     }]),
///     vout: Some(vec![TransactionOutput {
///         scriptpubkey: None,
///         scriptpubkey_type: None,
///         value: 95,
///         ..Default::default()
///     }]),
///     ..Default::default()
/// };
///
/// assert!(builder.validate_transaction(&tx).is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    config: BuildConfig,
    target: Target,
}

impl BlockBuilder {
    /// Create a builder, rejecting an invalid configuration
    pub fn new(config: BuildConfig) -> Result<Self> {
        let target = config.validate()?;
        Ok(Self { config, target })
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Validate a transaction for inclusion
    pub fn validate_transaction(&self, tx: &Transaction) -> ValidationResult {
        transaction::check_transaction(tx)
    }

    /// Validate `candidates` and pack the valid ones behind the coinbase.
    /// Returns the block and the number of rejected candidates.
    pub fn assemble_block(&self, candidates: &[Transaction]) -> Result<(SelectedBlock, usize)> {
        let mut rejected = 0;
        let valid: Vec<Transaction> = candidates
            .iter()
            .filter(|tx| match self.validate_transaction(tx) {
                ValidationResult::Valid => true,
                ValidationResult::Invalid(reason) => {
                    debug!(
                        "Rejected transaction {}: {}",
                        tx.txid.as_deref().unwrap_or("<no txid>"),
                        reason
                    );
                    rejected += 1;
                    false
                }
            })
            .cloned()
            .collect();

        let coinbase = transaction::create_coinbase_transaction(&self.config);
        let block = block::select_transactions(coinbase, &valid, self.config.max_block_size)?;
        info!(
            "Assembled block: {} transactions, {} bytes, {} rejected, {} skipped for size",
            block.included().len(),
            block.total_size,
            rejected,
            block.skipped
        );
        Ok((block, rejected))
    }

    /// Search for a nonce for `header`, using the configured thread count
    pub fn mine(&self, header: &mut BlockHeader, stop: &StopSignal) -> Result<MiningResult> {
        mining::mine_header_parallel(header, &self.target, stop, self.config.threads)
    }

    /// Mine the header for an assembled block.
    ///
    /// An aborted or exhausted search is an error.
    pub fn mine_block(&self, block: SelectedBlock, stop: &StopSignal) -> Result<MinedBlock> {
        let mut header = block::construct_block_header(&self.config);
        match self.mine(&mut header, stop)? {
            MiningResult::Found(solution) => Ok(MinedBlock {
                header,
                hash: solution.hash,
                block,
            }),
            MiningResult::Aborted { attempts } => Err(BuilderError::MiningAborted { attempts }),
            MiningResult::Exhausted => Err(BuilderError::MiningExhausted),
        }
    }

    /// Assemble a block from `candidates` and mine its header
    pub fn build(&self, candidates: &[Transaction], stop: &StopSignal) -> Result<MinedBlock> {
        let (block, _) = self.assemble_block(candidates)?;
        self.mine_block(block, stop)
    }
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mined: MinedBlock,
    pub loaded: usize,
    pub skipped_files: Vec<PathBuf>,

    /// Records rejected by the validator or with mistyped fields
    pub rejected: usize,
}

/// Load the mempool, build and mine a block, and write the result artifact
pub fn run(config: BuildConfig) -> Result<RunReport> {
    let builder = BlockBuilder::new(config)?;
    let config = builder.config();

    let load = mempool::load_mempool(&config.mempool_dir)?;
    let stop = match config.timeout() {
        Some(timeout) => StopSignal::with_timeout(timeout),
        None => StopSignal::new(),
    };

    let (block, rejected) = builder.assemble_block(&load.transactions)?;
    let mined = builder.mine_block(block, &stop)?;

    output::write_results_file(
        &config.output_file,
        &mined.header,
        mined.block.coinbase(),
        mined.block.included(),
    )?;

    Ok(RunReport {
        mined,
        loaded: load.transactions.len(),
        skipped_files: load.skipped,
        rejected: rejected + load.malformed.len(),
    })
}
