//! `shipmatch detect` / `shipmatch match`: single-input diagnostics.

use std::path::{Path, PathBuf};

use serde::Serialize;
use shipmatch_io::encoding::CandidateOutcome;
use shipmatch_io::{detect_with_report, CandidateEncoding, DecodePolicy};
use shipmatch_recon::{normalize, MatchRules, ReconConfig};

use crate::exit_codes::{EXIT_INVALID_CONFIG, EXIT_RUNTIME, EXIT_USAGE};
use crate::CliError;

fn usage_err(msg: impl Into<String>) -> CliError {
    CliError { code: EXIT_USAGE, message: msg.into(), hint: None }
}

// ============================================================================
// detect
// ============================================================================

#[derive(Serialize)]
struct DetectOutput<'a> {
    file: String,
    bytes: usize,
    candidates: &'a [CandidateOutcome],
    winner: Option<Winner>,
}

#[derive(Serialize)]
struct Winner {
    encoding: CandidateEncoding,
    score: i64,
    lines: usize,
}

fn parse_labels(labels: &[String]) -> Result<Vec<CandidateEncoding>, CliError> {
    if labels.is_empty() {
        return Ok(CandidateEncoding::DEFAULT.to_vec());
    }
    labels
        .iter()
        .map(|l| {
            CandidateEncoding::from_label(l).map_err(|e| {
                usage_err(e.to_string()).with_hint("supported: UTF-8, Shift_JIS, EUC-JP, ISO-2022-JP")
            })
        })
        .collect()
}

pub fn cmd_detect(file: PathBuf, labels: Vec<String>, strict: bool, json: bool) -> Result<(), CliError> {
    let candidates = parse_labels(&labels)?;
    let bytes = std::fs::read(&file)
        .map_err(|e| usage_err(format!("cannot read {}: {e}", file.display())))?;
    let policy = if strict { DecodePolicy::Strict } else { DecodePolicy::Lenient };

    let report = detect_with_report(&bytes, &candidates, policy);
    let winner = report.best.as_ref().map(|d| Winner {
        encoding: d.encoding,
        score: d.score,
        lines: d.text.lines().filter(|l| !l.trim().is_empty()).count(),
    });

    if json {
        let out = DetectOutput {
            file: file.display().to_string(),
            bytes: bytes.len(),
            candidates: &report.outcomes,
            winner,
        };
        let s = serde_json::to_string_pretty(&out)
            .map_err(|e| CliError { code: EXIT_RUNTIME, message: format!("JSON serialization error: {e}"), hint: None })?;
        println!("{s}");
        return Ok(());
    }

    print_detect(&file, &report.outcomes, winner.as_ref());
    Ok(())
}

fn print_detect(file: &Path, outcomes: &[CandidateOutcome], winner: Option<&Winner>) {
    println!("{}", file.display());
    for outcome in outcomes {
        match outcome {
            CandidateOutcome::Scored { encoding, score } => {
                println!("  {:<12} {score:>8}", encoding.label());
            }
            CandidateOutcome::Failed { encoding, reason } => {
                println!("  {:<12} {:>8}  ({reason})", encoding.label(), "failed");
            }
        }
    }
    match winner {
        Some(w) => println!("winner: {} (score {}, {} lines)", w.encoding, w.score, w.lines),
        None => println!("winner: none (no candidate could decode the file)"),
    }
}

// ============================================================================
// match
// ============================================================================

#[derive(Serialize)]
struct MatchOutput {
    a: NameKey,
    b: NameKey,
    matched: bool,
}

#[derive(Serialize)]
struct NameKey {
    input: String,
    key: String,
}

fn rules_from(config: Option<&Path>) -> Result<MatchRules, CliError> {
    let Some(path) = config else {
        return Ok(MatchRules::default());
    };
    let config_str = std::fs::read_to_string(path)
        .map_err(|e| usage_err(format!("cannot read config {}: {e}", path.display())))?;
    let config = ReconConfig::from_toml(&config_str).map_err(|e| CliError {
        code: EXIT_INVALID_CONFIG,
        message: e.to_string(),
        hint: None,
    })?;
    Ok(config.matching.rules())
}

pub fn cmd_match(name_a: String, name_b: String, config: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let rules = rules_from(config.as_deref())?;
    let matched = rules.matches(&name_a, &name_b);
    let out = MatchOutput {
        a: NameKey { key: normalize(&name_a), input: name_a },
        b: NameKey { key: normalize(&name_b), input: name_b },
        matched,
    };

    if json {
        let s = serde_json::to_string_pretty(&out)
            .map_err(|e| CliError { code: EXIT_RUNTIME, message: format!("JSON serialization error: {e}"), hint: None })?;
        println!("{s}");
    } else {
        println!("a: {} -> {}", out.a.input, out.a.key);
        println!("b: {} -> {}", out.b.input, out.b.key);
        println!("{}", if out.matched { "match" } else { "no match" });
    }
    Ok(())
}
