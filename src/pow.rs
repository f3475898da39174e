//! Header encoding, header digest and the hash-versus-target rule

use crate::constants::*;
use crate::error::{BuilderError, Result};
use crate::types::*;
use sha2::{Digest, Sha256};
use std::fmt;

/// Encode a header as `key:value\n` lines in fixed field order:
/// version, previous_block_hash, merkle_root_hash, timestamp,
/// difficulty_target, nonce.
///
/// The nonce line is always last, so headers differing only in nonce share
/// every preceding byte.
pub fn serialize_header(header: &BlockHeader) -> Vec<u8> {
    let mut data = serialize_header_prefix(header);
    data.extend_from_slice(&serialize_nonce(header.nonce));
    data
}

/// The final encoded line, carrying the nonce
pub(crate) fn serialize_nonce(nonce: Natural) -> Vec<u8> {
    format!("nonce:{}\n", nonce).into_bytes()
}

/// Every encoded line except the nonce line
pub(crate) fn serialize_header_prefix(header: &BlockHeader) -> Vec<u8> {
    format!(
        "version:{}\nprevious_block_hash:{}\nmerkle_root_hash:{}\ntimestamp:{}\ndifficulty_target:{}\n",
        header.version,
        header.previous_block_hash,
        header.merkle_root_hash,
        header.timestamp,
        header.difficulty_target,
    )
    .into_bytes()
}

/// SHA-256 of the encoded header
pub fn header_hash(header: &BlockHeader) -> Hash {
    sha256_hash(&serialize_header(header))
}

/// Lowercase hex of the header digest
pub fn header_hash_hex(header: &BlockHeader) -> String {
    hex::encode(header_hash(header))
}

pub(crate) fn sha256_hash(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// Difficulty target as a 256-bit big-endian unsigned integer.
///
/// Parsed from exactly 64 hex digits in either case. Digests are compared
/// numerically, which for lowercase 64-digit targets gives the same order as
/// comparing the hex strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Target(Hash);

impl Target {
    pub fn from_hex(target: &str) -> Result<Self> {
        if target.len() != HASH_HEX_LEN {
            return Err(BuilderError::InvalidTarget(format!(
                "expected {} hex digits, got {}",
                HASH_HEX_LEN,
                target.len()
            )));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(target, &mut bytes)
            .map_err(|e| BuilderError::InvalidTarget(format!("{}: {}", target, e)))?;
        Ok(Target(bytes))
    }

    pub fn from_bytes(bytes: Hash) -> Self {
        Target(bytes)
    }

    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    /// A digest wins iff it is strictly below the target
    pub fn is_met_by(&self, hash: &Hash) -> bool {
        hash < &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// CheckProofOfWork: ℋ × 𝒯 → {true, false}
///
/// SHA256(encode(header)) < target
pub fn check_proof_of_work(header: &BlockHeader, target: &Target) -> bool {
    target.is_met_by(&header_hash(header))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_header(nonce: Natural) -> BlockHeader {
        BlockHeader {
            version: 1,
            previous_block_hash: DEFAULT_PREVIOUS_BLOCK_HASH.to_string(),
            merkle_root_hash: DEFAULT_MERKLE_ROOT_HASH.to_string(),
            timestamp: DEFAULT_TIMESTAMP,
            difficulty_target: DEFAULT_DIFFICULTY_TARGET.to_string(),
            nonce,
        }
    }

    #[test]
    fn test_serialize_header_format() {
        let encoded = String::from_utf8(serialize_header(&create_header(42))).unwrap();
        let expected = format!(
            "version:1\nprevious_block_hash:{}\nmerkle_root_hash:1a2b3c4d5e6f7g8h9i0j\ntimestamp:1631450725\ndifficulty_target:{}\nnonce:42\n",
            DEFAULT_PREVIOUS_BLOCK_HASH, DEFAULT_DIFFICULTY_TARGET
        );
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_serialize_header_deterministic() {
        let header = create_header(7);
        assert_eq!(serialize_header(&header), serialize_header(&header.clone()));
        assert_eq!(header_hash(&header), header_hash(&header));
    }

    #[test]
    fn test_nonce_change_only_touches_nonce_line() {
        let a = String::from_utf8(serialize_header(&create_header(1))).unwrap();
        let b = String::from_utf8(serialize_header(&create_header(123456))).unwrap();

        let lines_a: Vec<&str> = a.lines().collect();
        let lines_b: Vec<&str> = b.lines().collect();
        assert_eq!(lines_a.len(), 6);
        assert_eq!(&lines_a[..5], &lines_b[..5]);
        assert_eq!(lines_a[5], "nonce:1");
        assert_eq!(lines_b[5], "nonce:123456");
    }

    #[test]
    fn test_header_hash_hex_is_sha256_of_encoding() {
        let header = create_header(0);
        let expected = hex::encode(Sha256::digest(serialize_header(&header)));
        let hash = header_hash_hex(&header);
        assert_eq!(hash, expected);
        assert_eq!(hash.len(), HASH_HEX_LEN);
    }

    #[test]
    fn test_target_parsing() {
        let target = Target::from_hex(DEFAULT_DIFFICULTY_TARGET).unwrap();
        assert_eq!(target.to_string(), DEFAULT_DIFFICULTY_TARGET);
        assert_eq!(&target.as_bytes()[..4], &[0x00, 0x00, 0xff, 0xff]);

        assert!(Target::from_hex("0000ffff").is_err());
        assert!(Target::from_hex(&"g".repeat(64)).is_err());
        assert!(Target::from_hex(&"0".repeat(65)).is_err());
    }

    #[test]
    fn test_target_comparison_is_numeric() {
        let lower = Target::from_hex(&"ab".repeat(32)).unwrap();
        let upper = Target::from_hex(&"AB".repeat(32)).unwrap();
        // Uppercase would sort before any lowercase digest as a string
        assert_eq!(lower, upper);

        let mut hash = [0xab; 32];
        assert!(!upper.is_met_by(&hash));
        hash[31] = 0xaa;
        assert!(upper.is_met_by(&hash));
    }

    #[test]
    fn test_target_is_strict_upper_bound() {
        let target = Target::from_bytes([0x10; 32]);
        assert!(!target.is_met_by(&[0x10; 32]));
        assert!(target.is_met_by(&[0x0f; 32]));

        let mut leading_zero = [0xff; 32];
        leading_zero[0] = 0x0f;
        assert!(target.is_met_by(&leading_zero));
    }

    #[test]
    fn test_check_proof_of_work_extremes() {
        let header = create_header(0);
        assert!(check_proof_of_work(&header, &Target::from_bytes([0xff; 32])));
        assert!(!check_proof_of_work(&header, &Target::from_bytes([0x00; 32])));
    }
}
