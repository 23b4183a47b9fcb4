// File -> detected encoding -> rows

use std::path::Path;

use crate::encoding::{detect_best_encoding, CandidateEncoding, DecodePolicy, Detection};
use crate::error::IoError;
use crate::rows::{split_rows, Row, RowSplit};

/// Rows read from one input file, with the encoding that produced them.
#[derive(Debug, Clone, Default)]
pub struct LoadedTable {
    pub rows: Vec<Row>,
    /// `None` when no candidate could decode the file.
    pub encoding: Option<CandidateEncoding>,
    pub score: Option<i64>,
}

impl LoadedTable {
    pub fn from_bytes(
        bytes: &[u8],
        candidates: &[CandidateEncoding],
        policy: DecodePolicy,
        split: RowSplit,
    ) -> Self {
        match detect_best_encoding(bytes, candidates, policy) {
            Detection::Decoded(decoded) => Self {
                rows: split_rows(&decoded.text, split),
                encoding: Some(decoded.encoding),
                score: Some(decoded.score),
            },
            // No usable encoding means no data, not a failure
            Detection::Unusable => Self::default(),
        }
    }
}

/// Read `path`, pick its encoding and split it into rows.
pub fn read_rows(
    path: &Path,
    candidates: &[CandidateEncoding],
    policy: DecodePolicy,
    split: RowSplit,
) -> Result<LoadedTable, IoError> {
    let bytes = std::fs::read(path).map_err(|e| IoError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    log::info!("reading {} ({} bytes)", path.display(), bytes.len());

    let table = LoadedTable::from_bytes(&bytes, candidates, policy, split);
    log::info!("{}: {} rows", path.display(), table.rows.len());
    Ok(table)
}
