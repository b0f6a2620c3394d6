//! Cell-level coercion rules. Nothing here fails: malformed input degrades to
//! the field default so one bad cell never aborts a row.

pub(crate) const DEFAULT_BEDROOMS: u32 = 0;
pub(crate) const DEFAULT_BATHROOMS: u32 = 1;
pub(crate) const DEFAULT_PARKING: u32 = 0;

const LIST_DELIMITER: char = ';';
const CURRENCY_SYMBOLS: [char; 5] = ['$', '€', '£', '¥', '₹'];

/// Canonical form used for header lookups: zero-width marks removed,
/// whitespace collapsed, lowercase.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Strips a leading currency symbol or code and thousands separators, then
/// reads the leading amount. Trailing notes such as `"(2 units)"` are ignored.
/// `"N/A"` and other unparsable prices become `0.0` ("unknown price").
pub(crate) fn parse_currency(value: &str) -> f64 {
    let without_separators = value.replace(',', "");
    let amount = without_separators.trim_start_matches(|ch: char| {
        ch.is_whitespace() || ch.is_ascii_uppercase() || CURRENCY_SYMBOLS.contains(&ch)
    });

    leading_number(amount).unwrap_or(0.0)
}

/// Reads the leading number of a measurement such as `"89"`, `"1,204 sqm"`
/// or `"89m2"`; unit suffixes are ignored.
pub(crate) fn parse_measure(value: &str) -> f64 {
    leading_number(&value.replace(',', "")).unwrap_or(0.0)
}

/// Reads the leading integer of a count cell, so `"2 Bed"` and `"2+1"` both
/// give 2. Spreadsheet exports frequently render integers as `"2.0"`.
pub(crate) fn parse_count(value: Option<&str>, default: u32) -> u32 {
    match value.and_then(leading_number) {
        Some(number) if number <= f64::from(u32::MAX) => number.trunc() as u32,
        _ => default,
    }
}

fn leading_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let end = trimmed
        .char_indices()
        .find(|(_, ch)| !(ch.is_ascii_digit() || *ch == '.'))
        .map(|(index, _)| index)
        .unwrap_or(trimmed.len());

    trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((cut, _)) => value[..cut].to_string(),
        None => value.to_string(),
    }
}

pub(crate) fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
