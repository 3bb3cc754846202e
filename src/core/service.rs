//! Repository traits for department and seller records

use crate::core::entity::{Department, Entity, Seller};
use crate::core::error::PersistenceError;
use async_trait::async_trait;

/// Result type of every repository operation
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// CRUD operations for one entity type
///
/// Implementations trust their caller: required fields are checked by the
/// form bindings before anything reaches a repository. Any storage failure
/// comes back as a [`PersistenceError`].
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Persist a new entity and write the generated id onto it
    async fn insert(&self, entity: &mut T) -> PersistenceResult<()>;

    /// Overwrite the row matching the entity's id
    ///
    /// Succeeds without error when no row matches.
    async fn update(&self, entity: &T) -> PersistenceResult<()>;

    /// Delete a row; fails when no row has this id
    async fn delete_by_id(&self, id: i64) -> PersistenceResult<()>;

    /// Get an entity by id
    async fn find_by_id(&self, id: i64) -> PersistenceResult<Option<T>>;

    /// List all entities ordered by name ascending
    async fn find_all(&self) -> PersistenceResult<Vec<T>>;

    /// Insert when the entity has no id yet, update otherwise
    async fn save_or_update(&self, entity: &mut T) -> PersistenceResult<()> {
        if entity.is_persisted() {
            self.update(entity).await
        } else {
            self.insert(entity).await
        }
    }
}

/// Repository of departments
pub trait DepartmentRepository: Repository<Department> {}

impl<R: Repository<Department> + ?Sized> DepartmentRepository for R {}

/// Repository of sellers
///
/// Every read joins the seller's department. Sellers returned by one call that
/// share a department share one `Arc<Department>`.
#[async_trait]
pub trait SellerRepository: Repository<Seller> {
    /// List the sellers of a department, ordered by seller name
    async fn find_by_department(&self, department: &Department) -> PersistenceResult<Vec<Seller>>;
}

/// Id a seller's department must have before the seller can be written
pub(crate) fn required_department_id(seller: &Seller) -> PersistenceResult<i64> {
    seller
        .department_id()
        .ok_or_else(|| PersistenceError::new("Seller department must be persisted first"))
}

/// An entity must not have an id yet to be inserted
pub(crate) fn required_new<T: Entity>(entity: &T) -> PersistenceResult<()> {
    match entity.id() {
        Some(id) => Err(PersistenceError::new(format!(
            "Cannot insert a {} that already has id {}",
            T::resource_name_singular(),
            id
        ))),
        None => Ok(()),
    }
}

/// Id an entity must have before it can be updated
pub(crate) fn required_id<T: Entity>(entity: &T) -> PersistenceResult<i64> {
    entity.id().ok_or_else(|| {
        PersistenceError::new(format!(
            "Cannot update a {} that has no id",
            T::resource_name_singular()
        ))
    })
}
