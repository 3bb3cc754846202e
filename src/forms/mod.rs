//! Form binding: raw user input → validated entity → repository
//!
//! A [`FormBinding`] knows how to turn the raw values of one form into an
//! entity (collecting every field error) and how to fill the form back from
//! an entity. [`FormSession`] drives one editing session on top of it:
//!
//! ```text
//! Editing ──save()──▶ Validating ──▶ Saved              (listeners notified, closed)
//!    ▲                    │      └──▶ PersistenceFailed  (may save again)
//!    └── field errors ────┘
//! ```

pub mod department;
pub mod seller;
pub mod session;

pub use department::{DepartmentBinding, DepartmentForm, DepartmentInput};
pub use seller::{DepartmentChoices, SellerBinding, SellerForm, SellerInput};
pub use session::{FormSession, FormState};

use crate::core::entity::Entity;
use crate::core::error::ValidationError;
use crate::core::field::FieldKey;
use crate::core::validation::check;
use crate::core::validation::validators::{max_length, not_blank};

/// Mapping between one form's raw input and an entity type
pub trait FormBinding: Send + Sync + 'static {
    /// The entity this form edits
    type Entity: Entity;

    /// Raw values as typed into the form
    type Input: Clone + Send + Sync;

    /// Build a candidate entity, reporting every field that fails its rules
    fn bind(input: &Self::Input) -> Result<Self::Entity, ValidationError>;

    /// Fill the form from an entity
    fn input_for(entity: &Self::Entity) -> Self::Input;
}

/// Required text: not blank, and within the field's input length
pub(crate) fn required_text<F: FieldKey>(errors: &mut ValidationError, field: F, value: &str) {
    match field.max_length() {
        Some(max) => check(errors, field, value, &[&not_blank(), &max_length(max)]),
        None => check(errors, field, value, &[&not_blank()]),
    };
}
