//! Core module containing the entity model, errors and repository traits

pub mod entity;
pub mod error;
pub mod events;
pub mod field;
pub mod service;
pub mod validation;

pub use entity::{Department, Entity, Seller};
pub use error::{PersistenceError, RegistryError, ValidationError};
pub use events::{DataChangeEvent, DataChangeListener, DataChangeListeners, EventBus, EventEnvelope};
pub use field::{DepartmentField, FieldKey, SellerField};
pub use service::{DepartmentRepository, PersistenceResult, Repository, SellerRepository};
