//! Validation and filtering of raw form input
//!
//! Filters turn the strings typed into a form into typed values; validators
//! check a single raw value and return the message to show next to the field.
//! [`check`] runs a chain of validators for one field and records the first
//! failure, so every field is checked independently of the others.

pub mod filters;
pub mod validators;

use crate::core::error::ValidationError;
use crate::core::field::FieldKey;

/// A validator over one raw field value
pub type Rule<'a> = &'a dyn Fn(&str) -> Result<(), String>;

/// Run `rules` against `value`, recording the first failure under `field`.
///
/// Returns `true` when every rule passed.
pub fn check<F: FieldKey>(
    errors: &mut ValidationError,
    field: F,
    value: &str,
    rules: &[Rule<'_>],
) -> bool {
    for rule in rules {
        if let Err(message) = rule(value) {
            errors.add_error(field, message);
            return false;
        }
    }
    true
}
