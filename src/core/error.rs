//! Typed error handling for the registry
//!
//! Two kinds of failure exist:
//!
//! - [`ValidationError`]: user input was rejected; carries a field → message map
//! - [`PersistenceError`]: anything the storage layer raised, with its message
//!
//! Form saves return [`RegistryError`], which wraps one or the other.
//!
//! # Example
//!
//! ```rust,ignore
//! match form.save(input).await {
//!     Ok(department) => println!("Saved {:?}", department.id()),
//!     Err(RegistryError::Validation(e)) => {
//!         for (field, message) in e.errors() {
//!             println!("{}: {}", field, message);
//!         }
//!     }
//!     Err(err) => eprintln!("{}: {}", err.alert_title(), err),
//! }
//! ```

use crate::core::field::FieldKey;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// The error type returned by form sessions
#[derive(Debug)]
pub enum RegistryError {
    /// Input was rejected; nothing was persisted
    Validation(ValidationError),

    /// The storage layer failed; nothing was persisted
    Persistence(PersistenceError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Validation(e) => write!(f, "{}", e),
            RegistryError::Persistence(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Validation(e) => Some(e),
            RegistryError::Persistence(e) => Some(e),
        }
    }
}

/// Error payload handed to the presentation layer
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Field errors, when the input was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<IndexMap<String, String>>,
}

impl RegistryError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            RegistryError::Validation(_) => "VALIDATION_ERROR",
            RegistryError::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Title for the alert shown when a save fails
    pub fn alert_title(&self) -> &'static str {
        match self {
            RegistryError::Validation(_) => "Invalid input",
            RegistryError::Persistence(_) => "Error saving object",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            fields: match self {
                RegistryError::Validation(e) => Some(e.errors().clone()),
                RegistryError::Persistence(_) => None,
            },
        }
    }

    /// Check if this error carries field-level messages
    pub fn is_validation(&self) -> bool {
        matches!(self, RegistryError::Validation(_))
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Input rejected by a form binding.
///
/// Keys come from [`DepartmentField`](crate::core::field::DepartmentField) or
/// [`SellerField`](crate::core::field::SellerField) and keep the order in which
/// the rules were checked. Adding a second message for the same key replaces
/// the first one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationError {
    errors: IndexMap<String, String>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field
    pub fn add_error<F: FieldKey>(&mut self, field: F, message: impl Into<String>) {
        self.errors.insert(field.as_str().to_string(), message.into());
    }

    /// All field messages, in the order they were recorded
    pub fn errors(&self) -> &IndexMap<String, String> {
        &self.errors
    }

    /// Message recorded for a field
    pub fn get<F: FieldKey>(&self, field: F) -> Option<&str> {
        self.errors.get(field.as_str()).map(String::as_str)
    }

    pub fn contains<F: FieldKey>(&self, field: F) -> bool {
        self.errors.contains_key(field.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// `Ok(value)` when nothing was recorded, `Err(self)` otherwise
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation error")?;
        if !self.errors.is_empty() {
            let fields: Vec<String> = self
                .errors
                .iter()
                .map(|(field, message)| format!("{}: {}", field, message))
                .collect();
            write!(f, " ({})", fields.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for RegistryError {
    fn from(err: ValidationError) -> Self {
        RegistryError::Validation(err)
    }
}

// =============================================================================
// Persistence Errors
// =============================================================================

/// Any failure raised by a storage backend.
///
/// Driver errors (connectivity, constraint violations, malformed statements)
/// are not distinguished; the original message is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceError {
    message: String,
}

impl PersistenceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Zero rows changed where one was expected
    pub fn no_rows_affected() -> Self {
        Self::new("Unexpected error! No rows affected")
    }

    /// Delete targeted an id with no row
    pub fn id_does_not_exist() -> Self {
        Self::new("Id does not exist!")
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PersistenceError {}

#[cfg(feature = "sqlite")]
impl From<sqlx::Error> for PersistenceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => Self::new(db.message()),
            other => Self::new(other.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for PersistenceError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::new(format!("Storage lock poisoned: {}", err))
    }
}

impl From<PersistenceError> for RegistryError {
    fn from(err: PersistenceError) -> Self {
        RegistryError::Persistence(err)
    }
}
