use crate::normalize::normalize;

/// Legal-entity terms stripped when building name variants.
pub const DEFAULT_LEGAL_SUFFIXES: [&str; 3] = ["株式会社", "有限会社", "合同会社"];

/// Latin phrase and its katakana rendering, swapped in both directions.
pub const DEFAULT_PHRASE_SWAP: (&str, &str) = ("online store", "オンラインストア");

/// Variant rules for fuzzy name matching.
///
/// The default rules are intentionally small: abbreviated forms such as
/// `(株)` are not folded into `株式会社`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRules {
    legal_suffixes: Vec<String>,
    phrase_swaps: Vec<(String, String)>,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self::new(
            DEFAULT_LEGAL_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            vec![(DEFAULT_PHRASE_SWAP.0.to_string(), DEFAULT_PHRASE_SWAP.1.to_string())],
        )
    }
}

impl MatchRules {
    /// Suffixes and phrases are normalized like names so they line up with keys.
    /// Entries that normalize to nothing are ignored.
    pub fn new(legal_suffixes: Vec<String>, phrase_swaps: Vec<(String, String)>) -> Self {
        Self {
            legal_suffixes: legal_suffixes
                .iter()
                .map(|s| normalize(s))
                .filter(|s| !s.is_empty())
                .collect(),
            phrase_swaps: phrase_swaps
                .iter()
                .map(|(latin, native)| (normalize(latin), normalize(native)))
                .filter(|(latin, native)| !latin.is_empty() && !native.is_empty())
                .collect(),
        }
    }

    pub fn legal_suffixes(&self) -> &[String] {
        &self.legal_suffixes
    }

    pub fn phrase_swaps(&self) -> &[(String, String)] {
        &self.phrase_swaps
    }

    /// Rewrites of an already-normalized key, the key itself first.
    /// A rewrite may be empty, and an empty rewrite is contained in every name.
    pub fn variants(&self, key: &str) -> Vec<String> {
        let mut out = Vec::with_capacity(2 + self.legal_suffixes.len() + 2 * self.phrase_swaps.len());
        out.push(key.to_string());
        for suffix in &self.legal_suffixes {
            out.push(key.replace(suffix.as_str(), ""));
        }
        out.push(key.replace('.', ""));
        for (latin, native) in &self.phrase_swaps {
            out.push(key.replace(latin.as_str(), native));
            out.push(key.replace(native.as_str(), latin));
        }
        out
    }

    /// Permissive name comparison: equality, containment either way, then
    /// equality or containment between any pair of variants.
    ///
    /// Only an empty input is rejected. A key or variant that comes out
    /// empty (a lone middle dot, a bare legal suffix once stripped) is
    /// contained in every other name and matches it.
    pub fn matches(&self, name_a: &str, name_b: &str) -> bool {
        if name_a.is_empty() || name_b.is_empty() {
            return false;
        }
        let key_a = normalize(name_a);
        let key_b = normalize(name_b);

        if key_a == key_b || contains_either(&key_a, &key_b) {
            return true;
        }

        let variants_a = self.variants(&key_a);
        let variants_b = self.variants(&key_b);
        variants_a
            .iter()
            .any(|va| variants_b.iter().any(|vb| va == vb || contains_either(va, vb)))
    }
}

fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// [`MatchRules::matches`] with the default rules.
pub fn fuzzy_match(name_a: &str, name_b: &str) -> bool {
    MatchRules::default().matches(name_a, name_b)
}
