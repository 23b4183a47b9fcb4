use serde::Deserialize;
use shipmatch_io::{CandidateEncoding, DecodePolicy};

use crate::error::ReconError;
use crate::matcher::{MatchRules, DEFAULT_LEGAL_SUFFIXES, DEFAULT_PHRASE_SWAP};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    pub name: String,
    pub inputs: InputsConfig,
    #[serde(default)]
    pub encoding: EncodingConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Input folder and the file names expected in it.
///
/// `dir` is resolved by the caller, relative to the config file. When
/// `order_file` is omitted the order report is discovered by name pattern.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputsConfig {
    #[serde(default = "default_dir")]
    pub dir: String,
    #[serde(default)]
    pub order_file: Option<String>,
    pub sagawa: String,
    pub shoshin: String,
    pub fukuyama: String,
}

fn default_dir() -> String {
    ".".into()
}

impl InputsConfig {
    /// Manifest names in scan priority order.
    pub fn manifest_names(&self) -> [&str; 3] {
        [self.sagawa.as_str(), self.shoshin.as_str(), self.fukuyama.as_str()]
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncodingConfig {
    #[serde(default = "default_candidates")]
    pub candidates: Vec<String>,
    #[serde(default)]
    pub strict: bool,
}

fn default_candidates() -> Vec<String> {
    CandidateEncoding::DEFAULT.iter().map(|c| c.label().to_string()).collect()
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
            strict: false,
        }
    }
}

impl EncodingConfig {
    /// Candidate encodings in configured order.
    pub fn candidates(&self) -> Result<Vec<CandidateEncoding>, ReconError> {
        self.candidates
            .iter()
            .map(|label| {
                CandidateEncoding::from_label(label)
                    .map_err(|e| ReconError::ConfigValidation(format!("encoding.candidates: {e}")))
            })
            .collect()
    }

    pub fn decode_policy(&self) -> DecodePolicy {
        if self.strict {
            DecodePolicy::Strict
        } else {
            DecodePolicy::Lenient
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfig {
    #[serde(default = "default_legal_suffixes")]
    pub legal_suffixes: Vec<String>,
    /// Each entry is `[latin, native]`.
    #[serde(default = "default_phrase_swaps")]
    pub phrase_swaps: Vec<Vec<String>>,
}

fn default_legal_suffixes() -> Vec<String> {
    DEFAULT_LEGAL_SUFFIXES.iter().map(|s| s.to_string()).collect()
}

fn default_phrase_swaps() -> Vec<Vec<String>> {
    vec![vec![
        DEFAULT_PHRASE_SWAP.0.to_string(),
        DEFAULT_PHRASE_SWAP.1.to_string(),
    ]]
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            legal_suffixes: default_legal_suffixes(),
            phrase_swaps: default_phrase_swaps(),
        }
    }
}

impl MatchingConfig {
    /// Rules built from this section. Assumes `validate` has passed.
    pub fn rules(&self) -> MatchRules {
        let swaps = self
            .phrase_swaps
            .iter()
            .filter_map(|pair| match pair.as_slice() {
                [latin, native] => Some((latin.clone(), native.clone())),
                _ => None,
            })
            .collect();
        MatchRules::new(self.legal_suffixes.clone(), swaps)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    /// Table on stderr, no file written.
    Log,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Log => write!(f, "log"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// `{date}` expands to the processing date as YYYYMMDD.
    #[serde(default)]
    pub path: Option<String>,
}

impl OutputConfig {
    pub fn resolved_path(&self, processing_date: chrono::NaiveDate) -> Option<String> {
        let stamp = processing_date.format("%Y%m%d").to_string();
        self.path.as_ref().map(|p| p.replace("{date}", &stamp))
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let inputs = [
            ("inputs.sagawa", &self.inputs.sagawa),
            ("inputs.shoshin", &self.inputs.shoshin),
            ("inputs.fukuyama", &self.inputs.fukuyama),
        ];
        for (key, value) in inputs {
            if value.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!("{key} must not be empty")));
            }
        }
        if let Some(order_file) = &self.inputs.order_file {
            if order_file.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "inputs.order_file must not be empty when set".into(),
                ));
            }
        }

        if self.encoding.candidates.is_empty() {
            return Err(ReconError::ConfigValidation(
                "encoding.candidates must list at least one encoding".into(),
            ));
        }
        self.encoding.candidates()?;

        if let Some(i) = self.matching.legal_suffixes.iter().position(|s| s.trim().is_empty()) {
            return Err(ReconError::ConfigValidation(format!(
                "matching.legal_suffixes[{i}] is empty"
            )));
        }

        for (i, pair) in self.matching.phrase_swaps.iter().enumerate() {
            if pair.len() != 2 {
                return Err(ReconError::ConfigValidation(format!(
                    "matching.phrase_swaps[{i}] must have exactly 2 sides, got {}",
                    pair.len()
                )));
            }
            if pair.iter().any(|side| side.trim().is_empty()) {
                return Err(ReconError::ConfigValidation(format!(
                    "matching.phrase_swaps[{i}] has an empty side"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
