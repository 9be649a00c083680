//! Currency code helpers.

/// Normalizes a currency code for lookups: trims whitespace and upper-cases it.
pub fn normalize_currency_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// ISO 4217 style check: exactly three ASCII letters after normalization.
pub fn is_valid_currency_code(code: &str) -> bool {
    let normalized = normalize_currency_code(code);
    normalized.len() == 3 && normalized.chars().all(|c| c.is_ascii_uppercase())
}
