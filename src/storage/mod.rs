//! Storage backends implementing the repository traits

#[cfg(feature = "in-memory")]
pub mod in_memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "in-memory")]
pub use in_memory::{InMemoryDepartmentRepository, InMemorySellerRepository, InMemoryStore};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteDepartmentRepository, SqliteSellerRepository};
