// Input folder inventory: which manifests and which order report are present

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::IoError;

const ORDER_REPORT_DIGITS: usize = 17;

/// Order reports are named as exactly 17 ASCII digits plus `.txt`.
pub fn is_order_report_name(name: &str) -> bool {
    name.strip_suffix(".txt").is_some_and(|stem| {
        stem.len() == ORDER_REPORT_DIGITS && stem.bytes().all(|b| b.is_ascii_digit())
    })
}

/// First order report in `dir`, by file name order.
pub fn find_order_report(dir: &Path) -> Result<Option<PathBuf>, IoError> {
    let mut names = list_file_names(dir)?;
    names.sort();
    Ok(names
        .into_iter()
        .find(|n| is_order_report_name(n))
        .map(|n| dir.join(n)))
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InputInventory {
    pub present: Vec<String>,
    pub missing: Vec<String>,
    pub order_report: Option<PathBuf>,
}

impl InputInventory {
    pub fn all_present(&self) -> bool {
        self.missing.is_empty() && self.order_report.is_some()
    }

    /// Human-readable list of everything missing, order report included.
    pub fn missing_description(&self) -> Vec<String> {
        let mut out = self.missing.clone();
        if self.order_report.is_none() {
            out.push(format!("order report ({ORDER_REPORT_DIGITS}-digit .txt file name)"));
        }
        out
    }
}

/// Check `dir` for each manifest in `required` and for an order report.
pub fn check_inputs(dir: &Path, required: &[&str]) -> Result<InputInventory, IoError> {
    let names = list_file_names(dir)?;
    let mut inventory = InputInventory::default();

    for &name in required {
        if names.iter().any(|n| n == name) {
            inventory.present.push(name.to_string());
        } else {
            inventory.missing.push(name.to_string());
        }
    }
    inventory.order_report = find_order_report(dir)?;

    Ok(inventory)
}

fn list_file_names(dir: &Path) -> Result<Vec<String>, IoError> {
    let discover_err = |e: std::io::Error| IoError::Discover {
        dir: dir.to_path_buf(),
        message: e.to_string(),
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(discover_err)? {
        let entry = entry.map_err(discover_err)?;
        if entry.file_type().map_err(discover_err)?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}
