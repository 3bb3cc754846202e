//! Department form

use crate::core::entity::{Department, Entity};
use crate::core::error::ValidationError;
use crate::core::field::DepartmentField;
use crate::core::validation::filters::try_parse_int;
use crate::forms::{FormBinding, FormSession, required_text};

/// Raw values of the department form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentInput {
    /// Id field; blank for a new department
    pub id: String,
    pub name: String,
}

impl DepartmentInput {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Binding between [`DepartmentInput`] and [`Department`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DepartmentBinding;

impl FormBinding for DepartmentBinding {
    type Entity = Department;
    type Input = DepartmentInput;

    fn bind(input: &DepartmentInput) -> Result<Department, ValidationError> {
        let mut errors = ValidationError::new();
        required_text(&mut errors, DepartmentField::Name, &input.name);

        let name = input.name.trim();
        let department = match try_parse_int(&input.id) {
            Some(id) => Department::with_id(id, name),
            None => Department::new(name),
        };
        errors.into_result(department)
    }

    fn input_for(department: &Department) -> DepartmentInput {
        DepartmentInput {
            id: department.id().map(|id| id.to_string()).unwrap_or_default(),
            name: department.name.clone(),
        }
    }
}

/// Editing session of one department
pub type DepartmentForm = FormSession<DepartmentBinding>;
