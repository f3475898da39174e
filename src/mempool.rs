//! Mempool loading: best-effort ingestion of transaction records from a directory

use crate::constants::TRANSACTION_FILE_EXTENSION;
use crate::error::Result;
use crate::types::*;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Transactions read from a mempool directory, in file-name order
#[derive(Debug, Clone, Default)]
pub struct MempoolLoad {
    pub transactions: Vec<Transaction>,

    /// Files that could not be read or are not JSON at all
    pub skipped: Vec<PathBuf>,

    /// Well-formed JSON whose fields have the wrong types; these count as
    /// validation rejections rather than unreadable files
    pub malformed: Vec<PathBuf>,
}

/// Outcome of reading one record file
enum Record {
    Transaction(Transaction),
    Malformed(String),
}

/// Read every `*.json` record in `dir`.
///
/// Records are ordered by file name so that repeated runs see the same pool
/// order. A file that cannot be read or is not JSON is logged and skipped. A
/// JSON record with wrongly typed fields is listed in `malformed`. Only
/// failure to list the directory itself is an error.
pub fn load_mempool(dir: impl AsRef<Path>) -> Result<MempoolLoad> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file()
            && path.extension().and_then(|ext| ext.to_str()) == Some(TRANSACTION_FILE_EXTENSION)
        {
            paths.push(path);
        }
    }
    paths.sort();

    let mut load = MempoolLoad::default();
    for path in paths {
        match read_record(&path) {
            Ok(Record::Transaction(tx)) => {
                debug!("Loaded {}", path.display());
                load.transactions.push(tx);
            }
            Ok(Record::Malformed(reason)) => {
                info!("Rejecting {}: {}", path.display(), reason);
                load.malformed.push(path);
            }
            Err(reason) => {
                warn!("Skipping {}: {}", path.display(), reason);
                load.skipped.push(path);
            }
        }
    }

    info!(
        "Loaded {} transactions from {} ({} skipped, {} malformed)",
        load.transactions.len(),
        dir.display(),
        load.skipped.len(),
        load.malformed.len()
    );
    Ok(load)
}

/// Decode a single transaction record
pub fn parse_transaction(record: &str) -> Result<Transaction> {
    Ok(serde_json::from_str(record)?)
}

/// Read a record file. I/O failures and invalid JSON are errors; valid JSON
/// that does not decode as a transaction is `Record::Malformed`.
fn read_record(path: &Path) -> Result<Record> {
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    Ok(match serde_json::from_value(value) {
        Ok(tx) => Record::Transaction(tx),
        Err(e) => Record::Malformed(e.to_string()),
    })
}
