//! Run-time configuration for block building

use crate::constants::*;
use crate::error::{BuilderError, Result};
use crate::pow::Target;
use crate::types::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Parameters of a block building run.
///
/// Every field has a default, so a configuration file only needs to name
/// the values it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory of pending transaction records
    pub mempool_dir: PathBuf,

    /// Output artifact path
    pub output_file: PathBuf,

    pub header_version: Integer,
    pub previous_block_hash: String,

    /// Supplied externally, never computed from the selected transactions
    pub merkle_root_hash: String,
    pub timestamp: Natural,

    /// 64 hex digits, compared numerically against header digests
    pub difficulty_target: String,

    /// Size budget in bytes, coinbase included
    pub max_block_size: usize,

    /// Coinbase reward in base units
    pub block_reward: Amount,
    pub coinbase_txid: String,
    pub coinbase_scriptpubkey: String,

    /// Mining worker threads (1 = sequential search)
    pub threads: usize,

    /// Abort mining after this many seconds (unbounded when absent)
    pub timeout_secs: Option<u64>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            mempool_dir: PathBuf::from(DEFAULT_MEMPOOL_DIR),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            header_version: HEADER_VERSION,
            previous_block_hash: DEFAULT_PREVIOUS_BLOCK_HASH.to_string(),
            merkle_root_hash: DEFAULT_MERKLE_ROOT_HASH.to_string(),
            timestamp: DEFAULT_TIMESTAMP,
            difficulty_target: DEFAULT_DIFFICULTY_TARGET.to_string(),
            max_block_size: MAX_BLOCK_SIZE,
            block_reward: BLOCK_REWARD,
            coinbase_txid: COINBASE_TXID.to_string(),
            coinbase_scriptpubkey: COINBASE_SCRIPTPUBKEY.to_string(),
            threads: 1,
            timeout_secs: None,
        }
    }
}

impl BuildConfig {
    /// Load a JSON configuration file; absent keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| {
            BuilderError::InvalidConfig(format!("{}: {}", path.display(), e))
        })
    }

    /// Check the configuration and return the parsed difficulty target
    pub fn validate(&self) -> Result<Target> {
        if self.max_block_size == 0 {
            return Err(BuilderError::InvalidConfig(
                "max_block_size must be greater than zero".to_string(),
            ));
        }
        if self.threads == 0 {
            return Err(BuilderError::InvalidConfig(
                "threads must be at least 1".to_string(),
            ));
        }
        Target::from_hex(&self.difficulty_target)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
