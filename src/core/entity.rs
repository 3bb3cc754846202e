//! Entity model: departments and the sellers that belong to them

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Base trait for all persisted records.
///
/// Every entity has:
/// - id: Storage-assigned identifier, absent until the first insert
/// - name: Human-readable name (also the ordering key for listings)
///
/// The identifier is written by the repositories right after a successful
/// insert and never changes afterwards.
pub trait Entity: Clone + Serialize + Send + Sync + 'static {
    /// The plural resource name (e.g., "departments", "sellers")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "department", "seller")
    fn resource_name_singular() -> &'static str;

    /// Get the storage identifier, if this entity has been persisted
    fn id(&self) -> Option<i64>;

    /// Get the name of this entity
    fn name(&self) -> &str;

    /// Check if the entity has been persisted
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}

/// A department sellers are attached to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Department {
    id: Option<i64>,
    pub name: String,
}

impl Department {
    /// Create a department that has not been persisted yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Create a department that refers to an existing row
    pub fn with_id(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }

    pub(crate) fn assign_id(&mut self, id: i64) {
        debug_assert!(self.id.is_none(), "department id assigned twice");
        self.id = Some(id);
    }
}

impl Entity for Department {
    fn resource_name() -> &'static str {
        "departments"
    }

    fn resource_name_singular() -> &'static str {
        "department"
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A seller record.
///
/// `department` is shared: sellers read back by one repository call that
/// belong to the same department point at the same `Arc<Department>`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    id: Option<i64>,
    pub name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub base_salary: f64,
    pub department: Option<Arc<Department>>,
}

impl Seller {
    /// Create a seller that has not been persisted yet
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        birth_date: NaiveDate,
        base_salary: f64,
        department: Option<Arc<Department>>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            birth_date,
            base_salary,
            department,
        }
    }

    /// Re-key a seller onto an existing row id
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Id of the attached department, if it has one
    pub fn department_id(&self) -> Option<i64> {
        self.department.as_ref().and_then(|d| d.id())
    }

    pub(crate) fn assign_id(&mut self, id: i64) {
        debug_assert!(self.id.is_none(), "seller id assigned twice");
        self.id = Some(id);
    }
}

impl Entity for Seller {
    fn resource_name() -> &'static str {
        "sellers"
    }

    fn resource_name_singular() -> &'static str {
        "seller"
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
