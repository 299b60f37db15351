//! Decimal Input Normalization

/// Normalize user-entered decimal text so it can be parsed.
///
/// Surrounding whitespace is removed and a comma decimal separator is
/// replaced by a dot, so both `2,5` and `2.5` read as two and a half.
pub fn normalize_decimal_separator(raw: &str) -> String {
    raw.trim().replace(',', ".")
}
