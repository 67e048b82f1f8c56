// SPDX-License-Identifier: GPL-3.0-or-later

//! Parsing of human-formatted ticket prices such as `"1 500 ₽"` or `"Бесплатно"`.

use super::CURRENCY_SIGN;

/// Labels that mean the event costs nothing.
const FREE_LABELS: &[&str] = &["бесплатно", "free"];

/// Parse a display price into a whole amount.
///
/// Whitespace (including non-breaking thousands separators) and the currency
/// sign are stripped, then the leading run of digits is read. Anything that
/// does not start with a number, a negative amount, or a value too large to
/// represent is treated as free.
pub fn parse_price(raw: &str) -> u64 {
    let trimmed = raw.trim();
    if is_free_label(trimmed) {
        return 0;
    }

    let compact: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .replace(CURRENCY_SIGN, "");

    let digits = compact.strip_prefix('+').unwrap_or(&compact);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end].parse().unwrap_or(0)
}

fn is_free_label(s: &str) -> bool {
    s.is_empty()
        || s == format!("0 {CURRENCY_SIGN}")
        || FREE_LABELS.iter().any(|label| s.to_lowercase() == *label)
}
