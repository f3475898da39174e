//! Mining through the public API, bounded by easy targets or cancellation

use block_builder::*;
use block_builder::mining::{mine_header, mine_header_parallel, StopSignal};
use block_builder::pow::{check_proof_of_work, header_hash_hex, Target};
use std::time::Duration;

fn create_header(config: &BuildConfig) -> BlockHeader {
    block_builder::block::construct_block_header(config)
}

#[test]
fn test_easy_target_completes_quickly() {
    let config = BuildConfig::default();
    let mut header = create_header(&config);
    let target = Target::from_hex(&format!("7f{}", "f".repeat(62))).unwrap();

    let result = mine_header(&mut header, &target, &StopSignal::new(), Some(1_000));
    let MiningResult::Found(solution) = result else {
        panic!("expected a solution within 1000 attempts");
    };
    assert!(solution.hash < target.to_string());
    assert_eq!(solution.hash, header_hash_hex(&header));
    assert!(check_proof_of_work(&header, &target));
}

#[test]
fn test_impossible_target_cancelled() {
    let config = BuildConfig::default();
    let mut header = create_header(&config);
    let target = Target::from_hex(&"0".repeat(64)).unwrap();
    let stop = StopSignal::with_timeout(Duration::from_millis(20));

    let result = mine_header(&mut header, &target, &stop, None);
    assert!(matches!(result, MiningResult::Aborted { .. }));
}

#[test]
fn test_builder_reports_abort_as_error() {
    let mut config = BuildConfig::default();
    config.difficulty_target = "0".repeat(64);
    config.threads = 2;
    let builder = BlockBuilder::new(config).unwrap();

    let stop = StopSignal::new();
    stop.stop();
    let result = builder.build(&[], &stop);
    assert!(matches!(result, Err(BuilderError::MiningAborted { attempts: 0 })));
}

#[test]
fn test_parallel_search_is_deterministic() {
    let mut config = BuildConfig::default();
    config.difficulty_target = format!("0f{}", "f".repeat(62));
    let target = Target::from_hex(&config.difficulty_target).unwrap();

    let mut sequential = create_header(&config);
    let expected = mine_header(&mut sequential, &target, &StopSignal::new(), None);

    for _ in 0..3 {
        let mut header = create_header(&config);
        let result = mine_header_parallel(&mut header, &target, &StopSignal::new(), 4).unwrap();
        assert_eq!(result, expected);
        assert_eq!(header.nonce, sequential.nonce);
    }
}

#[test]
fn test_uppercase_target_equivalent() {
    let mut lower = BuildConfig::default();
    lower.difficulty_target = format!("0abc{}", "d".repeat(60));
    let mut upper = lower.clone();
    upper.difficulty_target = lower.difficulty_target.to_uppercase();

    let lower = BlockBuilder::new(lower).unwrap();
    let upper = BlockBuilder::new(upper).unwrap();
    assert_eq!(lower.target(), upper.target());
}

#[test]
fn test_invalid_target_rejected_by_builder() {
    let mut config = BuildConfig::default();
    config.difficulty_target = "0000ffff".to_string();
    assert!(matches!(BlockBuilder::new(config), Err(BuilderError::InvalidTarget(_))));
}
