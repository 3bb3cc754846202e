//! # Sales Registry
//!
//! Department and seller records for a small data-entry application.
//!
//! ## Features
//!
//! - **Typed entities**: `Department` and `Seller`, ids assigned by storage on insert
//! - **Repositories**: insert/update/delete/find over SQLite (sqlx) or in memory
//! - **Join demultiplexing**: sellers of one department share one `Arc<Department>`
//! - **Form binding**: raw input validated field by field, then insert-or-update
//! - **Change listeners**: ordered synchronous callbacks plus a broadcast bus
//! - **Configuration-Based**: database settings loaded from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use registry::prelude::*;
//!
//! let pool = connect(&DatabaseConfig::default()).await?;
//! let departments = Arc::new(SqliteDepartmentRepository::new(pool.clone()));
//!
//! let mut form = DepartmentForm::new(Department::new(""), departments.clone());
//! form.subscribe_data_change_listener(Arc::new(|e: &EventEnvelope| {
//!     println!("{} {}", e.event.action(), e.event.entity_id());
//! }));
//!
//! let it = form.save(&DepartmentInput::new("", "IT")).await?;
//! assert_eq!(departments.find_by_id(it.id().unwrap()).await?, Some(it));
//! ```

pub mod config;
pub mod core;
pub mod forms;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        entity::{Department, Entity, Seller},
        error::{PersistenceError, RegistryError, ValidationError},
        events::{DataChangeEvent, DataChangeListener, DataChangeListeners, EventBus, EventEnvelope},
        field::{DepartmentField, FieldKey, SellerField},
        service::{DepartmentRepository, PersistenceResult, Repository, SellerRepository},
    };

    // === Forms ===
    pub use crate::forms::{
        DepartmentChoices, DepartmentForm, DepartmentInput, FormBinding, FormSession, FormState,
        SellerForm, SellerInput,
    };

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::{InMemoryDepartmentRepository, InMemorySellerRepository, InMemoryStore};
    #[cfg(feature = "sqlite")]
    pub use crate::storage::sqlite::{close, connect, ensure_schema};
    #[cfg(feature = "sqlite")]
    pub use crate::storage::{SqliteDepartmentRepository, SqliteSellerRepository};

    // === Config ===
    pub use crate::config::DatabaseConfig;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
    pub use std::sync::Arc;
}
