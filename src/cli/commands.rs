//! CLI command implementations.

use std::path::Path;

use crate::cancel::CancelToken;
use crate::config::ArchiveConfig;
use crate::format::{roots_to_cids, EdsWriter};
use crate::square::{Commitments, ErasuredTreeConstructor, ExtendedDataSquare};
use crate::types::{EdsError, EdsResult, ErrorKind};

/// Process exit code for a failed command.
pub fn exit_code(err: &EdsError) -> i32 {
    match err.kind() {
        ErrorKind::Io => 1,
        ErrorKind::Validation | ErrorKind::Reconstruction => 2,
        ErrorKind::Cache | ErrorKind::IdentifierDerivation => 4,
        ErrorKind::Cancelled => 5,
    }
}

/// Split `data` into shares of `share_size` bytes.
pub fn split_shares(data: &[u8], share_size: usize) -> EdsResult<Vec<Vec<u8>>> {
    if share_size == 0 {
        return Err(EdsError::ShareTooSmall(0));
    }
    let remainder = data.len() % share_size;
    if remainder != 0 {
        return Err(EdsError::ShareSize {
            index: data.len() / share_size,
            expected: share_size,
            got: remainder,
        });
    }
    Ok(data.chunks(share_size).map(<[u8]>::to_vec).collect())
}

/// Read an original square from a file of concatenated shares and extend it.
pub fn load_square(path: &Path, config: &ArchiveConfig) -> EdsResult<ExtendedDataSquare> {
    let data = std::fs::read(path)?;
    let shares = split_shares(&data, config.share_size)?;
    ExtendedDataSquare::compute(
        shares,
        config.codec.build(),
        std::sync::Arc::new(ErasuredTreeConstructor::new()),
    )
}

/// Extend an original square and write it as an archive.
pub fn cmd_write(input: &Path, output: &Path, config: &ArchiveConfig, json: bool) -> EdsResult<()> {
    let eds = load_square(input, config)?;
    let writer = EdsWriter::new(config.writer.clone());
    let summary = writer.write_to_file(&eds, output, &CancelToken::new())?;

    if json {
        let info = serde_json::json!({
            "file": output.display().to_string(),
            "width": eds.width(),
            "share_size": eds.share_size(),
            "roots": summary.roots,
            "leaves": summary.leaves,
            "inner_nodes": summary.proofs,
            "bytes": summary.bytes_written,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&info).unwrap_or_default()
        );
    } else {
        println!("Wrote {}", output.display());
        println!("Width: {}", eds.width());
        println!("Share size: {}", eds.share_size());
        println!("Roots: {}", summary.roots);
        println!("Leaves: {}", summary.leaves);
        println!("Inner nodes: {}", summary.proofs);
        println!("Bytes: {}", summary.bytes_written);
    }
    Ok(())
}

/// Print the root CIDs of an original square without writing an archive.
pub fn cmd_roots(input: &Path, config: &ArchiveConfig, json: bool) -> EdsResult<()> {
    let eds = load_square(input, config)?;
    let commitments = eds.commit()?;
    print_roots(&commitments, json)
}

fn print_roots(commitments: &Commitments, json: bool) -> EdsResult<()> {
    let cids = roots_to_cids(commitments)?;
    let (rows, cols) = cids.split_at(commitments.row_roots().len());
    let digest = hex::encode(commitments.digest());

    if json {
        let info = serde_json::json!({
            "digest": digest,
            "row_roots": rows.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            "col_roots": cols.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&info).unwrap_or_default()
        );
    } else {
        println!("Digest: {}", digest);
        for (i, cid) in rows.iter().enumerate() {
            println!("row {:>4}: {}", i, cid);
        }
        for (i, cid) in cols.iter().enumerate() {
            println!("col {:>4}: {}", i, cid);
        }
    }
    Ok(())
}

/// Write a default configuration file.
pub fn cmd_init_config(path: &Path) -> EdsResult<()> {
    ArchiveConfig::default().save(path)?;
    println!("Created {}", path.display());
    Ok(())
}
