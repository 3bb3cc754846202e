//! In-memory repositories for testing and development
//!
//! Departments and sellers live in one [`InMemoryStore`] so seller reads can
//! join their department and department deletes can honour the foreign key,
//! the same way the SQLite backend does.

use crate::core::entity::{Department, Entity, Seller};
use crate::core::error::PersistenceError;
use crate::core::service::{
    PersistenceResult, Repository, SellerRepository, required_department_id, required_id,
    required_new,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

const FOREIGN_KEY_FAILED: &str = "FOREIGN KEY constraint failed";

#[derive(Debug, Clone)]
struct SellerRow {
    name: String,
    email: String,
    birth_date: NaiveDate,
    base_salary: f64,
    department_id: i64,
}

#[derive(Debug, Default)]
struct Tables {
    departments: BTreeMap<i64, String>,
    sellers: BTreeMap<i64, SellerRow>,
    // Ids are never reused, like AUTOINCREMENT.
    last_department_id: i64,
    last_seller_id: i64,
}

/// Shared in-memory tables
///
/// Uses RwLock for thread-safe access. Cloning shares the same tables.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Department repository over these tables
    pub fn departments(&self) -> InMemoryDepartmentRepository {
        InMemoryDepartmentRepository {
            store: self.clone(),
        }
    }

    /// Seller repository over these tables
    pub fn sellers(&self) -> InMemorySellerRepository {
        InMemorySellerRepository {
            store: self.clone(),
        }
    }
}

/// In-memory department repository
#[derive(Clone, Debug, Default)]
pub struct InMemoryDepartmentRepository {
    store: InMemoryStore,
}

impl InMemoryDepartmentRepository {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Repository<Department> for InMemoryDepartmentRepository {
    async fn insert(&self, department: &mut Department) -> PersistenceResult<()> {
        required_new(department)?;
        let mut tables = self.store.tables.write()?;

        tables.last_department_id += 1;
        let id = tables.last_department_id;
        tables.departments.insert(id, department.name.clone());

        department.assign_id(id);
        tracing::debug!(id, "Department inserted");
        Ok(())
    }

    async fn update(&self, department: &Department) -> PersistenceResult<()> {
        let id = required_id(department)?;
        let mut tables = self.store.tables.write()?;

        match tables.departments.get_mut(&id) {
            Some(name) => {
                *name = department.name.clone();
                tracing::debug!(id, "Department updated");
            }
            None => tracing::warn!(id, "Department update matched no row"),
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> PersistenceResult<()> {
        let mut tables = self.store.tables.write()?;

        if !tables.departments.contains_key(&id) {
            return Err(PersistenceError::id_does_not_exist());
        }
        if tables.sellers.values().any(|s| s.department_id == id) {
            return Err(PersistenceError::new(FOREIGN_KEY_FAILED));
        }

        tables.departments.remove(&id);
        tracing::debug!(id, "Department deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> PersistenceResult<Option<Department>> {
        let tables = self.store.tables.read()?;

        Ok(tables
            .departments
            .get(&id)
            .map(|name| Department::with_id(id, name.clone())))
    }

    async fn find_all(&self) -> PersistenceResult<Vec<Department>> {
        let tables = self.store.tables.read()?;

        let mut departments: Vec<Department> = tables
            .departments
            .iter()
            .map(|(id, name)| Department::with_id(*id, name.clone()))
            .collect();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }
}

/// In-memory seller repository
#[derive(Clone, Debug, Default)]
pub struct InMemorySellerRepository {
    store: InMemoryStore,
}

impl InMemorySellerRepository {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }

    fn row_for(seller: &Seller, tables: &Tables) -> PersistenceResult<SellerRow> {
        let department_id = required_department_id(seller)?;
        if !tables.departments.contains_key(&department_id) {
            return Err(PersistenceError::new(FOREIGN_KEY_FAILED));
        }

        Ok(SellerRow {
            name: seller.name.clone(),
            email: seller.email.clone(),
            birth_date: seller.birth_date,
            base_salary: seller.base_salary,
            department_id,
        })
    }

    /// Join sellers to their departments, sharing one department instance
    /// per id within the returned list.
    fn join<'a>(
        tables: &Tables,
        rows: impl Iterator<Item = (&'a i64, &'a SellerRow)>,
    ) -> Vec<Seller> {
        let mut departments: HashMap<i64, Arc<Department>> = HashMap::new();
        let mut sellers = Vec::new();

        for (id, row) in rows {
            // Inner join: sellers without a department row are skipped.
            let Some(dep_name) = tables.departments.get(&row.department_id) else {
                continue;
            };
            let department = departments
                .entry(row.department_id)
                .or_insert_with(|| Arc::new(Department::with_id(row.department_id, dep_name.clone())))
                .clone();

            sellers.push(
                Seller::new(
                    row.name.clone(),
                    row.email.clone(),
                    row.birth_date,
                    row.base_salary,
                    Some(department),
                )
                .with_id(*id),
            );
        }

        sellers.sort_by(|a, b| a.name.cmp(&b.name));
        sellers
    }
}

#[async_trait]
impl Repository<Seller> for InMemorySellerRepository {
    async fn insert(&self, seller: &mut Seller) -> PersistenceResult<()> {
        required_new(seller)?;
        let mut tables = self.store.tables.write()?;
        let row = Self::row_for(seller, &tables)?;

        tables.last_seller_id += 1;
        let id = tables.last_seller_id;
        let department_id = row.department_id;
        tables.sellers.insert(id, row);

        seller.assign_id(id);
        tracing::debug!(id, department_id, "Seller inserted");
        Ok(())
    }

    async fn update(&self, seller: &Seller) -> PersistenceResult<()> {
        let id = required_id(seller)?;
        let mut tables = self.store.tables.write()?;
        let row = Self::row_for(seller, &tables)?;

        match tables.sellers.get_mut(&id) {
            Some(existing) => {
                *existing = row;
                tracing::debug!(id, "Seller updated");
            }
            None => tracing::warn!(id, "Seller update matched no row"),
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> PersistenceResult<()> {
        let mut tables = self.store.tables.write()?;

        if tables.sellers.remove(&id).is_none() {
            return Err(PersistenceError::id_does_not_exist());
        }

        tracing::debug!(id, "Seller deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> PersistenceResult<Option<Seller>> {
        let tables = self.store.tables.read()?;

        let rows = tables.sellers.get_key_value(&id).into_iter();
        Ok(Self::join(&tables, rows).into_iter().next())
    }

    async fn find_all(&self) -> PersistenceResult<Vec<Seller>> {
        let tables = self.store.tables.read()?;

        Ok(Self::join(&tables, tables.sellers.iter()))
    }
}

#[async_trait]
impl SellerRepository for InMemorySellerRepository {
    async fn find_by_department(&self, department: &Department) -> PersistenceResult<Vec<Seller>> {
        let Some(department_id) = department.id() else {
            return Ok(Vec::new());
        };
        let tables = self.store.tables.read()?;

        let rows = tables
            .sellers
            .iter()
            .filter(|(_, row)| row.department_id == department_id);
        Ok(Self::join(&tables, rows))
    }
}
