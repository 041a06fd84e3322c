//! Identifier sanitization utilities.
//!
//! Every table, column, measure and report name that ends up inside generated
//! code or a generated file name passes through [`sanitize_identifier`].
//!
//! # Rules
//!
//! - Surrounding whitespace is removed
//! - Any character outside `[0-9A-Za-z_]` becomes `_`
//! - A leading digit gets an `_` prefix
//! - An empty result becomes `unnamed`

use once_cell::sync::Lazy;
use regex::Regex;

/// Replacement used when a name sanitizes to nothing.
pub const EMPTY_IDENTIFIER: &str = "unnamed";

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9A-Za-z_]").expect("Invalid regex"));

/// Sanitize a name into a code-safe identifier.
///
/// Idempotent: `sanitize_identifier(&sanitize_identifier(x)) == sanitize_identifier(x)`.
///
/// # Examples
///
/// ```
/// use bi_migration_sdk::validation::input::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("Sales Data"), "Sales_Data");
/// assert_eq!(sanitize_identifier("[Amount]"), "_Amount_");
/// assert_eq!(sanitize_identifier("2024 Orders"), "_2024_Orders");
/// assert_eq!(sanitize_identifier("   "), "unnamed");
/// ```
pub fn sanitize_identifier(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return EMPTY_IDENTIFIER.to_string();
    }

    let mut sanitized = UNSAFE_CHARS.replace_all(trimmed, "_").into_owned();
    if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        sanitized.insert(0, '_');
    }
    sanitized
}

/// Sanitize an optional name, treating `None` like an empty string.
pub fn sanitize_optional(name: Option<&str>) -> String {
    sanitize_identifier(name.unwrap_or_default())
}

/// Replace control characters (newlines included) with spaces, so the text
/// stays on one line inside a generated `//` comment.
pub fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// True when `name` is already a sanitized identifier.
pub fn is_safe_identifier(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        " ",
        "Sales",
        "Sales Data",
        "[Sales].[Amount]",
        "1st Quarter",
        "123",
        "_already_safe",
        "Umsatz €",
        "Кириллица",
        "tab\there",
        "__",
        "9",
    ];

    #[test]
    fn test_sanitize_examples() {
        assert_eq!(sanitize_identifier("Sales"), "Sales");
        assert_eq!(sanitize_identifier("  Sales Data "), "Sales_Data");
        assert_eq!(sanitize_identifier("123"), "_123");
        assert_eq!(sanitize_identifier("1st Quarter"), "_1st_Quarter");
        assert_eq!(sanitize_identifier("Umsatz €"), "Umsatz__");
        assert_eq!(sanitize_identifier(""), EMPTY_IDENTIFIER);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for sample in SAMPLES {
            let once = sanitize_identifier(sample);
            assert_eq!(sanitize_identifier(&once), once, "input {:?}", sample);
        }
    }

    #[test]
    fn test_sanitized_output_is_safe() {
        for sample in SAMPLES {
            let out = sanitize_identifier(sample);
            assert!(is_safe_identifier(&out), "{:?} -> {:?}", sample, out);
        }
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("Profit Ratio"), "Profit Ratio");
        assert_eq!(single_line("Net\nSales\r\tQ1"), "Net Sales  Q1");
    }

    #[test]
    fn test_sanitize_optional() {
        assert_eq!(sanitize_optional(None), EMPTY_IDENTIFIER);
        assert_eq!(sanitize_optional(Some("Total Sales")), "Total_Sales");
    }
}
