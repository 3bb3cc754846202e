//! Reusable field validators
//!
//! These validators are used by the form bindings to check raw input

/// Message shown for a required field left blank
pub const EMPTY_FIELD: &str = "Field can't be empty";

/// Message shown for a value that is not a number
pub const INVALID_NUMBER: &str = "Invalid number";

/// Validator: value must contain something other than whitespace
pub fn not_blank() -> impl Fn(&str) -> Result<(), String> + Send + Sync + Clone {
    |value: &str| {
        if value.trim().is_empty() {
            Err(EMPTY_FIELD.to_string())
        } else {
            Ok(())
        }
    }
}

/// Validator: value must not exceed `max` characters
pub fn max_length(max: usize) -> impl Fn(&str) -> Result<(), String> + Send + Sync + Clone {
    move |value: &str| {
        if value.chars().count() > max {
            Err(format!("Field can't exceed {} characters", max))
        } else {
            Ok(())
        }
    }
}

/// Validator: value must parse as a decimal number
pub fn decimal() -> impl Fn(&str) -> Result<(), String> + Send + Sync + Clone {
    |value: &str| match super::filters::try_parse_double(value) {
        Some(_) => Ok(()),
        None => Err(INVALID_NUMBER.to_string()),
    }
}

/// Validator: an optional value must be set
pub fn present<T>(value: Option<&T>) -> Result<(), String> {
    match value {
        Some(_) => Ok(()),
        None => Err(EMPTY_FIELD.to_string()),
    }
}
