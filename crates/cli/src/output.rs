//! Result sinks for `shipmatch run`.

use std::io::Write;
use std::path::{Path, PathBuf};

use shipmatch_recon::{BatchResult, OutputFormat, OutputRecord};

use crate::exit_codes::EXIT_RUNTIME;
use crate::CliError;

pub const CSV_HEADER: [&str; 7] = [
    "order-id",
    "order-item-id",
    "quantity",
    "ship-date",
    "type",
    "carrier-name",
    "tracking-number",
];

/// Where a batch result goes. Chosen once, before the batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Json(PathBuf),
    Csv(PathBuf),
    /// Row table on stderr. Used when no file writer is selected.
    Log,
}

impl Sink {
    pub fn resolve(format: OutputFormat, path: Option<PathBuf>) -> Self {
        match (format, path) {
            (OutputFormat::Json, Some(p)) => Sink::Json(p),
            (OutputFormat::Csv, Some(p)) => Sink::Csv(p),
            (OutputFormat::Log, _) => Sink::Log,
            (format, None) => {
                log::info!("{format} output selected without a path; falling back to log output");
                Sink::Log
            }
        }
    }

    pub fn write(&self, result: &BatchResult) -> Result<(), CliError> {
        match self {
            Sink::Json(path) => {
                let json = to_json(result)?;
                write_file(path, json.as_bytes())?;
                eprintln!("wrote {}", path.display());
            }
            Sink::Csv(path) => {
                let mut buf = Vec::new();
                write_csv(&mut buf, &result.records)?;
                write_file(path, &buf)?;
                eprintln!("wrote {}", path.display());
            }
            Sink::Log => log_table(&mut std::io::stderr(), &result.records)
                .map_err(|e| runtime_err(format!("cannot write log output: {e}")))?,
        }
        Ok(())
    }
}

fn runtime_err(msg: impl Into<String>) -> CliError {
    CliError { code: EXIT_RUNTIME, message: msg.into(), hint: None }
}

pub fn to_json(result: &BatchResult) -> Result<String, CliError> {
    serde_json::to_string_pretty(result)
        .map_err(|e| runtime_err(format!("JSON serialization error: {e}")))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| runtime_err(format!("cannot create {}: {e}", parent.display())))?;
    }
    std::fs::write(path, bytes)
        .map_err(|e| runtime_err(format!("cannot write {}: {e}", path.display())))
}

fn csv_fields(r: &OutputRecord) -> [String; 7] {
    [
        r.order_id.clone(),
        r.order_item_id.clone(),
        r.quantity.clone(),
        r.shipping_date.format("%Y-%m-%d").to_string(),
        r.type_tag.to_string(),
        r.result.carrier.clone(),
        r.result.tracking_number.clone(),
    ]
}

pub fn write_csv<W: Write>(out: W, records: &[OutputRecord]) -> Result<(), CliError> {
    let mut wtr = csv::Writer::from_writer(out);
    let csv_err = |e: csv::Error| runtime_err(format!("CSV write error: {e}"));

    wtr.write_record(CSV_HEADER).map_err(csv_err)?;
    for r in records {
        wtr.write_record(csv_fields(r)).map_err(csv_err)?;
    }
    wtr.flush().map_err(|e| runtime_err(format!("CSV write error: {e}")))
}

/// Tab-separated rows, header first. Unmatched orders show empty carrier cells.
pub fn log_table<W: Write>(out: &mut W, records: &[OutputRecord]) -> std::io::Result<()> {
    writeln!(out, "{}", CSV_HEADER.join("\t"))?;
    for r in records {
        writeln!(out, "{}", csv_fields(r).join("\t"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shipmatch_recon::model::OUTPUT_TYPE_TAG;
    use shipmatch_recon::{CarrierSource, ReconciliationResult};

    fn records() -> Vec<OutputRecord> {
        let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        vec![
            OutputRecord {
                order_id: "249-1".into(),
                order_item_id: "111".into(),
                quantity: "2".into(),
                shipping_date: date,
                type_tag: OUTPUT_TYPE_TAG,
                result: ReconciliationResult::matched(CarrierSource::Fukuyama, "F-1".into()),
            },
            OutputRecord {
                order_id: "249-2".into(),
                order_item_id: "222".into(),
                quantity: "1".into(),
                shipping_date: date,
                type_tag: OUTPUT_TYPE_TAG,
                result: ReconciliationResult::not_found(),
            },
        ]
    }

    #[test]
    fn csv_header_and_rows() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &records()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "order-id,order-item-id,quantity,ship-date,type,carrier-name,tracking-number");
        assert_eq!(lines[1], "249-1,111,2,2026-10-15,Other,福山通運,F-1");
        assert_eq!(lines[2], "249-2,222,1,2026-10-15,Other,,");
    }

    #[test]
    fn log_table_is_tab_separated() {
        let mut buf = Vec::new();
        log_table(&mut buf, &records()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(1).unwrap().ends_with("\t福山通運\tF-1"));
    }

    #[test]
    fn sink_falls_back_to_log_without_path() {
        assert_eq!(Sink::resolve(OutputFormat::Json, None), Sink::Log);
        assert_eq!(Sink::resolve(OutputFormat::Csv, None), Sink::Log);
        assert_eq!(Sink::resolve(OutputFormat::Log, Some("x.json".into())), Sink::Log);
        assert_eq!(
            Sink::resolve(OutputFormat::Csv, Some("out.csv".into())),
            Sink::Csv("out.csv".into())
        );
    }

    #[test]
    fn write_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/nested/result.csv");
        write_file(&path, b"x").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"x");
    }
}
