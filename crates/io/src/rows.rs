// Line/field splitting for decoded manifests and order reports

/// One parsed line: cells with quotes stripped and whitespace trimmed.
pub type Row = Vec<String>;

/// Whitespace as the manifest tooling understood it: Unicode White_Space
/// plus the BOM, minus NEXT LINE (U+0085), which that tooling never treated
/// as blank.
pub fn is_blank(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}'
}

/// Field separator policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowSplit {
    /// Tab first; comma only when the tab split yields a single field.
    #[default]
    TabOrComma,
    /// Tab only. Order reports are tab-delimited and may contain commas in names.
    TabOnly,
}

/// Split decoded text on `\n` into rows. Whitespace-only lines are dropped.
pub fn split_rows(text: &str, split: RowSplit) -> Vec<Row> {
    text.split('\n')
        .filter(|line| !line.trim_matches(is_blank).is_empty())
        .map(|line| split_line(line, split))
        .collect()
}

/// Split a single line into cleaned cells.
pub fn split_line(line: &str, split: RowSplit) -> Row {
    let mut fields: Vec<&str> = line.split('\t').collect();
    if fields.len() == 1 && split == RowSplit::TabOrComma {
        fields = line.split(',').collect();
    }
    fields.into_iter().map(clean_cell).collect()
}

/// Drop one leading and one trailing quote (either kind), then trim.
fn clean_cell(cell: &str) -> String {
    let cell = cell.strip_prefix(['"', '\'']).unwrap_or(cell);
    let cell = cell.strip_suffix(['"', '\'']).unwrap_or(cell);
    cell.trim_matches(is_blank).to_string()
}
