//! Result artifact: header lines, coinbase record, included transaction ids

use crate::error::Result;
use crate::pow::serialize_header;
use crate::transaction::serialize_transaction;
use crate::types::*;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the mined block summary:
/// 1. One `key:value` line per header field
/// 2. The coinbase canonical record
/// 3. One txid per included transaction, in block order
///
/// Included transactions without a txid are not listed.
pub fn write_results<W: Write>(
    writer: &mut W,
    header: &BlockHeader,
    coinbase: &Transaction,
    included: &[Transaction],
) -> Result<()> {
    writer.write_all(&serialize_header(header))?;
    writer.write_all(serialize_transaction(coinbase)?.as_bytes())?;
    for txid in included.iter().filter_map(|tx| tx.txid.as_deref()) {
        writeln!(writer, "{}", txid)?;
    }
    Ok(())
}

/// Create (or truncate) `path` and write the block summary to it
pub fn write_results_file(
    path: impl AsRef<Path>,
    header: &BlockHeader,
    coinbase: &Transaction,
    included: &[Transaction],
) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_results(&mut writer, header, coinbase, included)?;
    writer.flush()?;
    info!("Wrote {} transaction ids to {}", included.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::construct_block_header;
    use crate::config::BuildConfig;
    use crate::transaction::create_coinbase_transaction;

    fn tx(txid: Option<&str>) -> Transaction {
        Transaction {
            txid: txid.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_write_results_layout() {
        let config = BuildConfig::default();
        let mut header = construct_block_header(&config);
        header.nonce = 31;
        let coinbase = create_coinbase_transaction(&config);
        let included = vec![tx(Some("a1")), tx(None), tx(Some("b2"))];

        let mut out = Vec::new();
        write_results(&mut out, &header, &coinbase, &included).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "version:1");
        assert_eq!(lines[5], "nonce:31");
        assert_eq!(format!("{}\n", lines[6]), serialize_transaction(&coinbase).unwrap());
        assert_eq!(&lines[7..], &["a1", "b2"]);
    }

    #[test]
    fn test_write_results_file_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuildConfig::default();
        let result = write_results_file(
            dir.path().join("missing").join("output.txt"),
            &construct_block_header(&config),
            &create_coinbase_transaction(&config),
            &[],
        );
        assert!(result.is_err());
    }
}
