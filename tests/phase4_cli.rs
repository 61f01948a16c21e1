//! Phase 4 tests: CLI commands and the `edsar` binary.

mod common;

use std::path::Path;
use std::process::{Command, Output};

use tempfile::{tempdir, NamedTempFile};

use eds_archive::cli::commands::{
    cmd_init_config, cmd_roots, cmd_write, exit_code, load_square, split_shares,
};
use eds_archive::{ArchiveConfig, EdsError, ErrorKind, Phase};

use common::{make_square, original_shares, parse_archive, TEST_SHARE_SIZE};

fn test_config() -> ArchiveConfig {
    ArchiveConfig {
        share_size: TEST_SHARE_SIZE,
        ..ArchiveConfig::default()
    }
}

/// Write the original shares of a `k × k` square to a temp file.
fn ods_file(k: usize, seed: u64) -> NamedTempFile {
    let tmp = NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), original_shares(k, seed).concat()).unwrap();
    tmp
}

fn run_edsar(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_edsar"))
        .args(args)
        .output()
        .expect("Failed to run edsar")
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ==================== Share Splitting Tests ====================

#[test]
fn test_split_shares_in_order() {
    let data: Vec<u8> = (0..48).collect();
    let shares = split_shares(&data, 16).unwrap();
    assert_eq!(shares.len(), 3);
    assert_eq!(shares[0], (0..16).collect::<Vec<u8>>());
    assert_eq!(shares[2], (32..48).collect::<Vec<u8>>());
}

#[test]
fn test_split_shares_zero_size() {
    let err = split_shares(&[1, 2, 3], 0).unwrap_err();
    assert!(matches!(err, EdsError::ShareTooSmall(0)));
    assert_eq!(exit_code(&err), 2);
}

#[test]
fn test_split_shares_trailing_partial_share() {
    let err = split_shares(&[0u8; 40], 16).unwrap_err();
    assert!(matches!(
        err,
        EdsError::ShareSize {
            index: 2,
            expected: 16,
            got: 8
        }
    ));
}

#[test]
fn test_split_shares_empty_input() {
    assert!(split_shares(&[], 16).unwrap().is_empty());
}

// ==================== Loading Tests ====================

#[test]
fn test_load_square_extends_original() {
    let input = ods_file(2, 7);
    let eds = load_square(input.path(), &test_config()).unwrap();
    assert_eq!(eds.width(), 4);
    assert_eq!(eds.share_size(), TEST_SHARE_SIZE);
    assert_eq!(eds.flattened_original(), original_shares(2, 7));
    assert_eq!(eds, make_square(2, 7));
}

#[test]
fn test_load_square_empty_file() {
    let input = NamedTempFile::new().unwrap();
    let err = load_square(input.path(), &test_config()).unwrap_err();
    assert!(matches!(err, EdsError::EmptySquare));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(exit_code(&err), 2);
}

#[test]
fn test_load_square_not_square() {
    let input = NamedTempFile::new().unwrap();
    std::fs::write(input.path(), vec![0u8; 3 * TEST_SHARE_SIZE]).unwrap();
    let err = load_square(input.path(), &test_config()).unwrap_err();
    assert!(matches!(err, EdsError::NotSquare(3)));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_load_square_missing_file() {
    let dir = tempdir().unwrap();
    let err = load_square(&dir.path().join("absent.bin"), &test_config()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(exit_code(&err), 1);
}

// ==================== Command Tests ====================

#[test]
fn test_cmd_write_produces_archive() {
    let input = ods_file(2, 3);
    let dir = tempdir().unwrap();
    let output = dir.path().join("square.car");

    cmd_write(input.path(), &output, &test_config(), false).unwrap();

    let data = std::fs::read(&output).unwrap();
    let archive = parse_archive(&data);
    assert_eq!(archive.header.version, 1);
    assert_eq!(archive.header.roots.len(), 8);
    assert_eq!(archive.leaves(16).len(), 16);
    assert!(!archive.proofs(16).is_empty());

    let eds = make_square(2, 3);
    let expected = eds_archive::roots_to_cids(&eds.commit().unwrap()).unwrap();
    assert_eq!(archive.header.roots, expected);
}

#[test]
fn test_cmd_write_rejects_bad_input_without_output() {
    let input = NamedTempFile::new().unwrap();
    std::fs::write(input.path(), vec![0u8; 3 * TEST_SHARE_SIZE]).unwrap();
    let dir = tempdir().unwrap();
    let output = dir.path().join("square.car");

    let err = cmd_write(input.path(), &output, &test_config(), true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(!output.exists());
}

#[test]
fn test_cmd_roots_succeeds() {
    let input = ods_file(2, 11);
    cmd_roots(input.path(), &test_config(), false).unwrap();
    cmd_roots(input.path(), &test_config(), true).unwrap();
}

#[test]
fn test_cmd_init_config_writes_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("edsar.toml");
    cmd_init_config(&path).unwrap();
    assert_eq!(ArchiveConfig::load(&path).unwrap(), ArchiveConfig::default());
}

// ==================== Exit Code Tests ====================

#[test]
fn test_exit_codes_follow_error_kind() {
    let io = EdsError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
    assert_eq!(exit_code(&io), 1);
    assert_eq!(exit_code(&EdsError::EmptySquare), 2);
    assert_eq!(exit_code(&EdsError::NamespaceOrder), 2);
    assert_eq!(exit_code(&EdsError::BlockNotFound("x".into())), 4);
    assert_eq!(exit_code(&EdsError::InvalidDigest(3)), 4);
    assert_eq!(exit_code(&EdsError::Cancelled), 5);
    assert_eq!(exit_code(&EdsError::DeadlineExceeded), 5);
    assert_eq!(exit_code(&EdsError::Config("bad".into())), 1);
}

#[test]
fn test_exit_code_sees_through_phase() {
    let err = EdsError::BatchCommitted.in_phase(Phase::Proofs);
    assert_eq!(exit_code(&err), 4);
}

// ==================== Binary Tests ====================

#[test]
fn test_binary_roots_json() {
    let input = ods_file(1, 5);
    let size = TEST_SHARE_SIZE.to_string();
    let output = run_edsar(&[
        "--format",
        "json",
        "--share-size",
        &size,
        "roots",
        path_str(input.path()),
    ]);
    assert!(output.status.success(), "edsar roots failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["row_roots"].as_array().unwrap().len(), 2);
    assert_eq!(json["col_roots"].as_array().unwrap().len(), 2);
    assert_eq!(json["digest"].as_str().unwrap().len(), 64);
}

#[test]
fn test_binary_write_and_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("edsar.toml");
    let output = run_edsar(&["init-config", path_str(&config)]);
    assert!(output.status.success());

    let mut cfg = ArchiveConfig::load(&config).unwrap();
    cfg.share_size = TEST_SHARE_SIZE;
    cfg.save(&config).unwrap();

    let input = ods_file(2, 9);
    let car = dir.path().join("square.car");
    let output = run_edsar(&[
        "--config",
        path_str(&config),
        "write",
        path_str(input.path()),
        path_str(&car),
    ]);
    assert!(output.status.success(), "edsar write failed: {:?}", output);
    let archive = parse_archive(&std::fs::read(&car).unwrap());
    assert_eq!(archive.header.roots.len(), 8);
}

#[test]
fn test_binary_empty_input_exits_with_validation_code() {
    let input = NamedTempFile::new().unwrap();
    let dir = tempdir().unwrap();
    let car = dir.path().join("square.car");
    let output = run_edsar(&["write", path_str(input.path()), path_str(&car)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(!car.exists());
}
