//! Form field keys and their input constraints
//!
//! Validation errors are reported as a map keyed by field name. The set of
//! keys is closed per entity type: these enums are the only producers of
//! those keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A field key that can appear in a [`ValidationError`](crate::core::error::ValidationError)
pub trait FieldKey: Copy + fmt::Debug {
    /// The key used in the error map (e.g., "name", "birthDate")
    fn as_str(&self) -> &'static str;

    /// Maximum accepted input length in characters, if the field has one
    fn max_length(&self) -> Option<usize> {
        None
    }
}

/// Fields of the department form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DepartmentField {
    Name,
}

impl DepartmentField {
    pub const ALL: &'static [DepartmentField] = &[DepartmentField::Name];
}

impl FieldKey for DepartmentField {
    fn as_str(&self) -> &'static str {
        match self {
            DepartmentField::Name => "name",
        }
    }

    fn max_length(&self) -> Option<usize> {
        match self {
            DepartmentField::Name => Some(30),
        }
    }
}

/// Fields of the seller form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SellerField {
    Name,
    Email,
    BirthDate,
    BaseSalary,
}

impl SellerField {
    pub const ALL: &'static [SellerField] = &[
        SellerField::Name,
        SellerField::Email,
        SellerField::BirthDate,
        SellerField::BaseSalary,
    ];
}

impl FieldKey for SellerField {
    fn as_str(&self) -> &'static str {
        match self {
            SellerField::Name => "name",
            SellerField::Email => "email",
            SellerField::BirthDate => "birthDate",
            SellerField::BaseSalary => "baseSalary",
        }
    }

    fn max_length(&self) -> Option<usize> {
        match self {
            SellerField::Name | SellerField::Email => Some(100),
            SellerField::BirthDate | SellerField::BaseSalary => None,
        }
    }
}

impl fmt::Display for DepartmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SellerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
