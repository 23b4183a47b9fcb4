//! `shipmatch run` / `shipmatch validate`: config-driven batch reconciliation.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use shipmatch_io::{check_inputs, read_rows, CandidateEncoding, DecodePolicy, InputInventory, Row, RowSplit};
use shipmatch_recon::{BatchOrchestrator, CarrierSources, OutputFormat, ReconConfig};

use crate::exit_codes::{EXIT_INVALID_CONFIG, EXIT_MISSING_INPUTS, EXIT_RUNTIME, EXIT_UNMATCHED, EXIT_USAGE};
use crate::output::{self, Sink};
use crate::CliError;

fn run_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

/// Parsed config plus the directory its relative paths resolve against.
struct LoadedConfig {
    config: ReconConfig,
    base_dir: PathBuf,
}

impl LoadedConfig {
    fn load(config_path: &Path) -> Result<Self, CliError> {
        let config_str = std::fs::read_to_string(config_path).map_err(|e| {
            run_err(EXIT_USAGE, format!("cannot read config {}: {e}", config_path.display()))
        })?;
        let config = ReconConfig::from_toml(&config_str)
            .map_err(|e| run_err(EXIT_INVALID_CONFIG, e.to_string()))?;
        let base_dir = config_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        Ok(Self { config, base_dir })
    }

    fn input_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.inputs.dir)
    }

    fn inventory(&self) -> Result<InputInventory, CliError> {
        let dir = self.input_dir();
        let mut inventory = check_inputs(&dir, &self.config.inputs.manifest_names())
            .map_err(|e| run_err(EXIT_MISSING_INPUTS, e.to_string()))?;

        // An explicitly named order report replaces discovery
        if let Some(name) = &self.config.inputs.order_file {
            let path = dir.join(name);
            inventory.order_report = path.is_file().then_some(path);
        }
        Ok(inventory)
    }

    fn candidates(&self) -> Result<Vec<CandidateEncoding>, CliError> {
        self.config
            .encoding
            .candidates()
            .map_err(|e| run_err(EXIT_INVALID_CONFIG, e.to_string()))
    }
}

pub struct RunOptions {
    pub json: bool,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub date: Option<NaiveDate>,
    pub fail_on_unmatched: bool,
}

pub fn cmd_run(config_path: PathBuf, opts: RunOptions) -> Result<(), CliError> {
    let loaded = LoadedConfig::load(&config_path)?;
    let config = &loaded.config;

    let processing_date = opts.date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let format = opts.format.unwrap_or(config.output.format);
    let path = opts.output.or_else(|| {
        config
            .output
            .resolved_path(processing_date)
            .map(|p| loaded.base_dir.join(p))
    });
    let sink = Sink::resolve(format, path);

    let inventory = loaded.inventory()?;
    let order_report = inventory.order_report.clone().ok_or_else(|| {
        run_err(
            EXIT_MISSING_INPUTS,
            format!("no order report found in {}", loaded.input_dir().display()),
        )
        .with_hint("order reports are named with 17 digits, e.g. 12345678901234567.txt")
    })?;
    for name in &inventory.missing {
        log::warn!("manifest {name} not found; treating it as empty");
    }

    let candidates = loaded.candidates()?;
    let policy = config.encoding.decode_policy();
    let dir = loaded.input_dir();
    let manifest = |name: &str| -> Result<Vec<Row>, CliError> {
        if inventory.missing.iter().any(|m| m == name) {
            return Ok(Vec::new());
        }
        load_rows(&dir.join(name), &candidates, policy, RowSplit::TabOrComma)
    };

    let sources = CarrierSources {
        sagawa: manifest(&config.inputs.sagawa)?,
        shoshin: manifest(&config.inputs.shoshin)?,
        fukuyama: manifest(&config.inputs.fukuyama)?,
    };
    let order_rows = load_rows(&order_report, &candidates, policy, RowSplit::TabOnly)?;

    let result = BatchOrchestrator::from_config(config, processing_date).run(&order_rows, &sources);

    sink.write(&result)?;
    if opts.json {
        println!("{}", output::to_json(&result)?);
    }

    let s = &result.summary;
    eprintln!(
        "{}: {} orders processed: {} matched, {} unmatched, {} skipped",
        config.name, s.processed, s.matched, s.unmatched, s.skipped_rows,
    );

    if opts.fail_on_unmatched && s.unmatched > 0 {
        return Err(run_err(
            EXIT_UNMATCHED,
            format!("{} order(s) without a carrier match", s.unmatched),
        ));
    }
    Ok(())
}

fn load_rows(
    path: &Path,
    candidates: &[CandidateEncoding],
    policy: DecodePolicy,
    split: RowSplit,
) -> Result<Vec<Row>, CliError> {
    let table = read_rows(path, candidates, policy, split)
        .map_err(|e| run_err(EXIT_RUNTIME, e.to_string()))?;
    match table.encoding {
        Some(enc) => log::info!("{}: decoded as {enc}", path.display()),
        None => log::warn!("{}: no candidate encoding could decode the file", path.display()),
    }
    Ok(table.rows)
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let loaded = LoadedConfig::load(&config_path)?;
    let config = &loaded.config;
    let candidates = loaded.candidates()?;
    let labels: Vec<&str> = candidates.iter().map(|c| c.label()).collect();

    eprintln!(
        "valid: '{}' with {} encoding candidate(s) [{}], {} legal suffix(es), output {}",
        config.name,
        candidates.len(),
        labels.join(", "),
        config.matching.legal_suffixes.len(),
        config.output.format,
    );

    let inventory = loaded.inventory()?;
    for name in &inventory.present {
        eprintln!("  found    {name}");
    }
    if let Some(report) = &inventory.order_report {
        eprintln!("  found    {}", report.display());
    }

    if inventory.all_present() {
        return Ok(());
    }
    let missing = inventory.missing_description();
    for name in &missing {
        eprintln!("  missing  {name}");
    }
    Err(run_err(
        EXIT_MISSING_INPUTS,
        format!("{} required input(s) missing in {}", missing.len(), loaded.input_dir().display()),
    ))
}
