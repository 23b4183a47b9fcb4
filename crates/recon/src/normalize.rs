//! Name normalization into comparison keys.
//!
//! Keys fold full-width/half-width variants, drop whitespace, middle dots and
//! every dash or prolonged-sound mark, and lowercase Latin text. They are
//! used for equality and containment checks only, never for display.

use shipmatch_io::is_blank;
use unicode_normalization::UnicodeNormalization;

/// Full-width symbols folded to ASCII by the fixed `-0xFEE0` offset.
const FULLWIDTH_SYMBOLS: &str = "！＠＃＄％＾＆＊（）＿＋－＝｛｝｜：＂；＇＜＞？，．／";

const FULLWIDTH_OFFSET: u32 = 0xFEE0;

fn is_fullwidth_foldable(c: char) -> bool {
    matches!(c, 'Ａ'..='Ｚ' | 'ａ'..='ｚ' | '０'..='９') || FULLWIDTH_SYMBOLS.contains(c)
}

/// Prolonged sound marks, ASCII hyphen-minus and the general punctuation dashes.
fn is_dash(c: char) -> bool {
    matches!(
        c,
        'ー' | 'ｰ' | '゠' | '-' | '\u{2010}'..='\u{2015}' | '\u{2212}'
    )
}

/// Per-character stages, applied in order to each character.
fn fold_char(c: char) -> Option<char> {
    let c = if c == '．' { '.' } else { c };
    if matches!(c, '\u{3000}' | '・' | '･') {
        return None;
    }
    let c = if is_fullwidth_foldable(c) {
        char::from_u32(c as u32 - FULLWIDTH_OFFSET).unwrap_or(c)
    } else {
        c
    };
    if is_dash(c) {
        return None;
    }
    Some(c)
}

/// Canonical comparison key for `text`. Empty input gives an empty key.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let folded: String = text.nfkc().filter(|&c| !is_blank(c)).collect();
    let stripped: String = folded.to_lowercase().chars().filter_map(fold_char).collect();

    // Removals can leave a combining mark next to a new base; compose again
    let key: String = stripped.nfc().collect();
    key.trim_matches(is_blank).to_string()
}
