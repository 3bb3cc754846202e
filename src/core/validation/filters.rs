//! Reusable input filters
//!
//! These filters turn raw form strings into typed values. A value that cannot
//! be parsed yields `None` rather than an error; the validators decide whether
//! that is acceptable for the field.

/// Filter: parse an integer id, `None` when blank or not a number
pub fn try_parse_int(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Filter: parse a decimal number, `None` when blank or not a number
pub fn try_parse_double(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// Filter: format a salary the way the form displays it
pub fn format_decimal(value: f64) -> String {
    format!("{:.2}", value)
}
