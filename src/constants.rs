//! Default parameters for block building and mining

/// Directory scanned for pending transaction records
pub const DEFAULT_MEMPOOL_DIR: &str = "mempool";

/// File the mined block summary is written to
pub const DEFAULT_OUTPUT_FILE: &str = "output.txt";

/// Extension of transaction record files inside the mempool directory
pub const TRANSACTION_FILE_EXTENSION: &str = "json";

/// Difficulty target: digest must be numerically below this value
pub const DEFAULT_DIFFICULTY_TARGET: &str =
    "0000ffff00000000000000000000000000000000000000000000000000000000";

/// Maximum block size in bytes
pub const MAX_BLOCK_SIZE: usize = 1_000_000;

/// Base units per coin
pub const UNITS_PER_COIN: u64 = 100_000_000;

/// Block reward: 6.25 coins in base units
pub const BLOCK_REWARD: u64 = 625 * UNITS_PER_COIN / 100;

/// Header version written into every constructed header
pub const HEADER_VERSION: i64 = 1;

/// Previous block hash used when none is configured
pub const DEFAULT_PREVIOUS_BLOCK_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Merkle root used when none is configured (supplied externally, never computed)
pub const DEFAULT_MERKLE_ROOT_HASH: &str = "1a2b3c4d5e6f7g8h9i0j";

/// Header timestamp used when none is configured
pub const DEFAULT_TIMESTAMP: u64 = 1_631_450_725;

/// Identifier of the coinbase transaction
pub const COINBASE_TXID: &str = "coinbase_txid";

/// Spend condition of the coinbase output
pub const COINBASE_SCRIPTPUBKEY: &str = "coinbase_scriptpubkey";

/// Maximum fee as a fraction of the first output: fee * 10 <= value
pub const MAX_FEE_RATIO_DENOMINATOR: u64 = 10;

/// Length of a hex-encoded 256-bit digest or target
pub const HASH_HEX_LEN: usize = 64;

/// Nonce attempts between deadline checks in the mining loop
pub const DEADLINE_CHECK_INTERVAL: u64 = 1024;
