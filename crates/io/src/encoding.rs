//! Heuristic encoding detection for Japanese carrier manifests and order reports.
//!
//! Every candidate decodes the same bytes; the decoded text is scored for how
//! plausible it is as Japanese. Highest score wins, first candidate wins ties.

use std::fmt;

use encoding_rs::{Encoding, EUC_JP, ISO_2022_JP, SHIFT_JIS, UTF_8};
use serde::Serialize;

use crate::error::IoError;
use crate::rows::is_blank;

/// Words expected somewhere in a correctly decoded manifest.
pub const DOMAIN_VOCABULARY: [&str; 7] = ["佐川", "昭新", "福山", "配送", "出荷", "通知", "業者"];

const TARGET_SCRIPT_BONUS: i64 = 10;
const BROKEN_CHAR_PENALTY: i64 = 5;
const VOCABULARY_BONUS: i64 = 50;
const GARBLED_TEXT_PENALTY: i64 = 100;

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CandidateEncoding {
    #[serde(rename = "UTF-8")]
    Utf8,
    #[serde(rename = "Shift_JIS")]
    ShiftJis,
    #[serde(rename = "EUC-JP")]
    EucJp,
    #[serde(rename = "ISO-2022-JP")]
    Iso2022Jp,
}

impl CandidateEncoding {
    /// Default candidate order. Order only breaks exact score ties.
    pub const DEFAULT: [CandidateEncoding; 4] =
        [Self::Utf8, Self::ShiftJis, Self::EucJp, Self::Iso2022Jp];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::ShiftJis => "Shift_JIS",
            Self::EucJp => "EUC-JP",
            Self::Iso2022Jp => "ISO-2022-JP",
        }
    }

    /// Case-insensitive lookup over the four supported labels only.
    pub fn from_label(label: &str) -> Result<Self, IoError> {
        Self::DEFAULT
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label.trim()))
            .ok_or_else(|| IoError::UnknownEncoding(label.to_string()))
    }

    fn encoding(&self) -> &'static Encoding {
        match self {
            Self::Utf8 => UTF_8,
            Self::ShiftJis => SHIFT_JIS,
            Self::EucJp => EUC_JP,
            Self::Iso2022Jp => ISO_2022_JP,
        }
    }
}

impl fmt::Display for CandidateEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How malformed byte sequences are treated while decoding a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Substitute U+FFFD and keep going; the scorer penalises the result.
    #[default]
    Lenient,
    /// Any malformed sequence is a decode failure for that candidate.
    Strict,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedText {
    pub text: String,
    pub encoding: CandidateEncoding,
    pub score: i64,
}

/// Outcome of detection. `Unusable` means no candidate decoded the bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    Decoded(DecodedText),
    Unusable,
}

impl Detection {
    pub fn decoded(&self) -> Option<&DecodedText> {
        match self {
            Self::Decoded(d) => Some(d),
            Self::Unusable => None,
        }
    }

    /// Decoded text, or empty text when unusable.
    pub fn into_text(self) -> String {
        match self {
            Self::Decoded(d) => d.text,
            Self::Unusable => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateOutcome {
    Scored { encoding: CandidateEncoding, score: i64 },
    Failed { encoding: CandidateEncoding, reason: String },
}

/// Per-candidate scores plus the winner, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodingReport {
    pub outcomes: Vec<CandidateOutcome>,
    pub best: Option<DecodedText>,
}

impl EncodingReport {
    pub fn into_detection(self) -> Detection {
        match self.best {
            Some(d) => Detection::Decoded(d),
            None => Detection::Unusable,
        }
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Pick the most plausible decoding of `bytes` among `candidates`.
pub fn detect_best_encoding(
    bytes: &[u8],
    candidates: &[CandidateEncoding],
    policy: DecodePolicy,
) -> Detection {
    detect_with_report(bytes, candidates, policy).into_detection()
}

/// Decode with every candidate, recording each score and the winner.
pub fn detect_with_report(
    bytes: &[u8],
    candidates: &[CandidateEncoding],
    policy: DecodePolicy,
) -> EncodingReport {
    let mut outcomes = Vec::with_capacity(candidates.len());
    let mut best: Option<DecodedText> = None;

    for &candidate in candidates {
        let text = match decode(bytes, candidate, policy) {
            Ok(text) => text,
            Err(reason) => {
                log::debug!("{candidate}: decode failed: {reason}");
                outcomes.push(CandidateOutcome::Failed { encoding: candidate, reason });
                continue;
            }
        };

        let score = score_plausibility(&text);
        log::debug!("{candidate}: plausibility score {score}");
        outcomes.push(CandidateOutcome::Scored { encoding: candidate, score });

        // Strictly greater: first-seen candidate keeps exact ties
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(DecodedText { text, encoding: candidate, score });
        }
    }

    match &best {
        Some(b) => log::info!(
            "selected {} (score {}, {} chars)",
            b.encoding,
            b.score,
            b.text.chars().count()
        ),
        None => log::warn!("no candidate encoding could decode the input"),
    }

    EncodingReport { outcomes, best }
}

fn decode(bytes: &[u8], candidate: CandidateEncoding, policy: DecodePolicy) -> Result<String, String> {
    // No BOM sniffing: each candidate decodes the bytes as itself
    let (text, had_errors) = candidate.encoding().decode_without_bom_handling(bytes);
    if had_errors && policy == DecodePolicy::Strict {
        return Err(format!("malformed {} byte sequence", candidate.label()));
    }
    Ok(text.into_owned())
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Hiragana, katakana and the CJK unified ideograph block.
fn is_target_script(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{4E00}'..='\u{9FAF}')
}

fn is_extended_control(c: char) -> bool {
    matches!(c, '\u{00A0}'..='\u{00FF}')
}

fn is_garbled(c: char) -> bool {
    !c.is_ascii() && !is_target_script(c) && !is_blank(c)
}

/// Integer plausibility of `text` as Japanese. May be negative.
///
/// The three penalty passes are independent: a character that is both
/// extended-control and garbled is penalised twice.
pub fn score_plausibility(text: &str) -> i64 {
    let mut length = 0i64;
    let mut target = 0i64;
    let mut replacement = 0i64;
    let mut extended = 0i64;
    let mut garbled = 0i64;

    for c in text.chars() {
        length += 1;
        if is_target_script(c) {
            target += 1;
        }
        if c == '\u{FFFD}' {
            replacement += 1;
        }
        if is_extended_control(c) {
            extended += 1;
        }
        if is_garbled(c) {
            garbled += 1;
        }
    }

    let mut score = target * TARGET_SCRIPT_BONUS;
    score -= (replacement + extended + garbled) * BROKEN_CHAR_PENALTY;

    // Once per distinct word, however often it repeats
    score += DOMAIN_VOCABULARY
        .iter()
        .filter(|word| text.contains(*word))
        .count() as i64
        * VOCABULARY_BONUS;

    // More than 10% garbled
    if garbled * 10 > length {
        score -= GARBLED_TEXT_PENALTY;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_counts_script_and_vocabulary() {
        // 4 target chars, 2 vocabulary words
        assert_eq!(score_plausibility("佐川配送"), 4 * 10 + 2 * 50);
        assert_eq!(score_plausibility("abc, 123"), 0);
        assert_eq!(score_plausibility(""), 0);
    }

    #[test]
    fn repeated_vocabulary_counts_once() {
        assert_eq!(score_plausibility("佐川佐川"), 4 * 10 + 50);
    }

    #[test]
    fn replacement_char_penalised_twice() {
        // U+FFFD is both a replacement char and garbled; 1 of 1 chars garbled
        assert_eq!(score_plausibility("\u{FFFD}"), -5 - 5 - 100);
    }

    #[test]
    fn extended_control_penalised_twice() {
        // 'é' is extended-control and garbled; 1 of 12 chars stays under 10%
        assert_eq!(score_plausibility("caf\u{e9} au lait"), -10);
    }

    #[test]
    fn garbled_threshold_is_strictly_greater() {
        // 1 garbled of 10 chars is exactly 10%: no flat penalty
        assert_eq!(score_plausibility("abcdefghi\u{0100}"), -5);
        // 1 garbled of 9 chars exceeds 10%
        assert_eq!(score_plausibility("abcdefgh\u{0100}"), -105);
    }

    #[test]
    fn ideographic_space_and_bom_are_not_garbled() {
        assert_eq!(score_plausibility("\u{FEFF}山田\u{3000}太郎"), 40);
    }

    #[test]
    fn next_line_control_is_garbled() {
        // 1 garbled of 11 chars stays under 10%
        assert_eq!(score_plausibility("abcdefghij\u{85}"), -5);
    }

    #[test]
    fn utf8_wins_when_only_it_carries_vocabulary() {
        let bytes = "佐川急便,配送,出荷\n".as_bytes();
        let detection = detect_best_encoding(bytes, &CandidateEncoding::DEFAULT, DecodePolicy::Lenient);
        let decoded = detection.decoded().unwrap();
        assert_eq!(decoded.encoding, CandidateEncoding::Utf8);
        assert_eq!(decoded.text, "佐川急便,配送,出荷\n");
    }

    #[test]
    fn shift_jis_detected() {
        let (bytes, _, _) = SHIFT_JIS.encode("福山通運,出荷通知\n山田太郎\n");
        let detection = detect_best_encoding(&bytes, &CandidateEncoding::DEFAULT, DecodePolicy::Lenient);
        let decoded = detection.decoded().unwrap();
        assert_eq!(decoded.encoding, CandidateEncoding::ShiftJis);
        assert!(decoded.text.contains("山田太郎"));
    }

    #[test]
    fn euc_jp_detected() {
        let (bytes, _, _) = EUC_JP.encode("昭新紙業,配送業者\n");
        let detection = detect_best_encoding(&bytes, &CandidateEncoding::DEFAULT, DecodePolicy::Lenient);
        assert_eq!(detection.decoded().unwrap().encoding, CandidateEncoding::EucJp);
    }

    #[test]
    fn ascii_ties_go_to_first_candidate() {
        let bytes = b"order-id\tbuyer\n1\tabc\n";
        let candidates = [CandidateEncoding::ShiftJis, CandidateEncoding::Utf8];
        let detection = detect_best_encoding(bytes, &candidates, DecodePolicy::Lenient);
        assert_eq!(detection.decoded().unwrap().encoding, CandidateEncoding::ShiftJis);
    }

    #[test]
    fn negative_scores_still_win() {
        let bytes = [0xFFu8, 0xFE, 0xFD];
        let detection = detect_best_encoding(&bytes, &[CandidateEncoding::Utf8], DecodePolicy::Lenient);
        let decoded = detection.decoded().unwrap();
        assert!(decoded.score < 0);
    }

    #[test]
    fn strict_policy_skips_malformed_candidates() {
        let (bytes, _, _) = SHIFT_JIS.encode("佐川急便");
        let report = detect_with_report(
            &bytes,
            &[CandidateEncoding::Utf8, CandidateEncoding::ShiftJis],
            DecodePolicy::Strict,
        );
        assert!(matches!(report.outcomes[0], CandidateOutcome::Failed { .. }));
        assert_eq!(report.best.as_ref().unwrap().encoding, CandidateEncoding::ShiftJis);
    }

    #[test]
    fn unusable_when_nothing_decodes() {
        let bytes = [0xFFu8, 0xFF];
        let detection = detect_best_encoding(&bytes, &[CandidateEncoding::Utf8], DecodePolicy::Strict);
        assert_eq!(detection, Detection::Unusable);
        assert_eq!(detection.into_text(), "");

        let empty = detect_best_encoding(b"abc", &[], DecodePolicy::Lenient);
        assert_eq!(empty, Detection::Unusable);
    }

    #[test]
    fn detection_is_deterministic() {
        let (bytes, _, _) = SHIFT_JIS.encode("佐川,ﾃｽﾄ,テスト");
        let a = detect_best_encoding(&bytes, &CandidateEncoding::DEFAULT, DecodePolicy::Lenient);
        let b = detect_best_encoding(&bytes, &CandidateEncoding::DEFAULT, DecodePolicy::Lenient);
        assert_eq!(a, b);
    }

    #[test]
    fn label_lookup() {
        assert_eq!(CandidateEncoding::from_label("shift_jis").unwrap(), CandidateEncoding::ShiftJis);
        assert_eq!(CandidateEncoding::from_label(" EUC-JP ").unwrap(), CandidateEncoding::EucJp);
        let err = CandidateEncoding::from_label("windows-1252").unwrap_err();
        assert!(err.to_string().contains("windows-1252"));
    }
}
