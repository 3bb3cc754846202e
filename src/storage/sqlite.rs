//! SQLite storage backend using sqlx.
//!
//! Provides `SqliteDepartmentRepository` and `SqliteSellerRepository`
//! backed by a single-connection `sqlx::SqlitePool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `sqlite` feature flag (on by default).
//!
//! # Schema
//!
//! ```sql
//! department(Id INTEGER PRIMARY KEY AUTOINCREMENT, Name TEXT)
//! seller(Id INTEGER PRIMARY KEY AUTOINCREMENT, Name TEXT, Email TEXT,
//!        BirthDate DATE, BaseSalary DOUBLE,
//!        DepartmentId INTEGER REFERENCES department(Id))
//! ```
//!
//! Seller reads join the department row; the department columns of each row
//! are resolved through a map local to the call, so sellers of the same
//! department share one `Arc<Department>`.

use crate::config::DatabaseConfig;
use crate::core::entity::{Department, Entity, Seller};
use crate::core::error::PersistenceError;
use crate::core::service::{
    PersistenceResult, Repository, SellerRepository, required_department_id, required_id,
    required_new,
};
use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Connection management
// ---------------------------------------------------------------------------

/// Open the database described by `config`.
///
/// The pool holds exactly one connection that is never reaped, so every
/// repository call runs on the same long-lived connection, one at a time.
/// The schema is created when `config.ensure_schema` is set.
pub async fn connect(config: &DatabaseConfig) -> PersistenceResult<SqlitePool> {
    config
        .validate()
        .map_err(|e| PersistenceError::new(e.to_string()))?;

    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(config.create_if_missing)
        .foreign_keys(config.foreign_keys)
        .busy_timeout(config.busy_timeout());

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    tracing::info!(url = %config.url, "Database connection opened");

    if config.ensure_schema {
        ensure_schema(&pool).await?;
    }

    Ok(pool)
}

/// Close the connection, waiting for the in-flight call to finish.
pub async fn close(pool: &SqlitePool) {
    pool.close().await;
    tracing::info!("Database connection closed");
}

/// Apply the required tables (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS department (
            Id INTEGER PRIMARY KEY AUTOINCREMENT,
            Name TEXT
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| PersistenceError::new(format!("Failed to create department table: {}", e)))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS seller (
            Id INTEGER PRIMARY KEY AUTOINCREMENT,
            Name TEXT,
            Email TEXT,
            BirthDate DATE,
            BaseSalary DOUBLE,
            DepartmentId INTEGER REFERENCES department(Id)
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| PersistenceError::new(format!("Failed to create seller table: {}", e)))?;

    tracing::info!("Database schema ready");
    Ok(())
}

// ---------------------------------------------------------------------------
// SqliteDepartmentRepository
// ---------------------------------------------------------------------------

/// Department repository backed by SQLite.
///
/// # Example
///
/// ```rust,ignore
/// let pool = registry::storage::sqlite::connect(&DatabaseConfig::default()).await?;
/// let departments = SqliteDepartmentRepository::new(pool);
///
/// let mut it = Department::new("IT");
/// departments.insert(&mut it).await?;
/// assert!(it.id().is_some());
/// ```
#[derive(Clone, Debug)]
pub struct SqliteDepartmentRepository {
    pool: SqlitePool,
}

impl SqliteDepartmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn department_from_row(row: &SqliteRow) -> Result<Department, sqlx::Error> {
        Ok(Department::with_id(
            row.try_get("Id")?,
            row.try_get::<String, _>("Name")?,
        ))
    }
}

#[async_trait]
impl Repository<Department> for SqliteDepartmentRepository {
    async fn insert(&self, department: &mut Department) -> PersistenceResult<()> {
        required_new(department)?;
        let result = sqlx::query("INSERT INTO department (Name) VALUES (?)")
            .bind(&department.name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::no_rows_affected());
        }

        department.assign_id(result.last_insert_rowid());
        tracing::debug!(id = ?department.id(), "Department inserted");
        Ok(())
    }

    async fn update(&self, department: &Department) -> PersistenceResult<()> {
        let id = required_id(department)?;

        let result = sqlx::query("UPDATE department SET Name = ? WHERE Id = ?")
            .bind(&department.name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::warn!(id, "Department update matched no row");
        } else {
            tracing::debug!(id, "Department updated");
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> PersistenceResult<()> {
        let result = sqlx::query("DELETE FROM department WHERE Id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::id_does_not_exist());
        }

        tracing::debug!(id, "Department deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> PersistenceResult<Option<Department>> {
        let row = sqlx::query("SELECT Id, Name FROM department WHERE Id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::department_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> PersistenceResult<Vec<Department>> {
        let rows = sqlx::query("SELECT Id, Name FROM department ORDER BY Name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| Self::department_from_row(row).map_err(PersistenceError::from))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SqliteSellerRepository
// ---------------------------------------------------------------------------

const SELLER_SELECT: &str = "SELECT seller.Id, seller.Name, seller.Email, seller.BirthDate, \
     seller.BaseSalary, seller.DepartmentId, department.Name AS DepName \
     FROM seller INNER JOIN department ON seller.DepartmentId = department.Id";

/// Departments already materialised by the current query, keyed by id
type DepartmentMap = HashMap<i64, Arc<Department>>;

/// Seller repository backed by SQLite.
#[derive(Clone, Debug)]
pub struct SqliteSellerRepository {
    pool: SqlitePool,
}

impl SqliteSellerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Resolve the department columns of a joined row, reusing the instance
    /// already built for this department id.
    fn department_from_row(
        row: &SqliteRow,
        departments: &mut DepartmentMap,
    ) -> Result<Arc<Department>, sqlx::Error> {
        let id: i64 = row.try_get("DepartmentId")?;
        if let Some(department) = departments.get(&id) {
            return Ok(Arc::clone(department));
        }

        let department = Arc::new(Department::with_id(
            id,
            row.try_get::<String, _>("DepName")?,
        ));
        departments.insert(id, Arc::clone(&department));
        Ok(department)
    }

    fn seller_from_row(
        row: &SqliteRow,
        departments: &mut DepartmentMap,
    ) -> Result<Seller, sqlx::Error> {
        let department = Self::department_from_row(row, departments)?;

        Ok(Seller::new(
            row.try_get::<String, _>("Name")?,
            row.try_get::<String, _>("Email")?,
            row.try_get("BirthDate")?,
            row.try_get("BaseSalary")?,
            Some(department),
        )
        .with_id(row.try_get("Id")?))
    }

    fn sellers_from_rows(rows: &[SqliteRow]) -> PersistenceResult<Vec<Seller>> {
        let mut departments = DepartmentMap::new();
        rows.iter()
            .map(|row| {
                Self::seller_from_row(row, &mut departments).map_err(PersistenceError::from)
            })
            .collect()
    }
}

#[async_trait]
impl Repository<Seller> for SqliteSellerRepository {
    async fn insert(&self, seller: &mut Seller) -> PersistenceResult<()> {
        required_new(seller)?;
        let department_id = required_department_id(seller)?;

        let result = sqlx::query(
            "INSERT INTO seller (Name, Email, BirthDate, BaseSalary, DepartmentId) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&seller.name)
        .bind(&seller.email)
        .bind(seller.birth_date)
        .bind(seller.base_salary)
        .bind(department_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::no_rows_affected());
        }

        seller.assign_id(result.last_insert_rowid());
        tracing::debug!(id = ?seller.id(), department_id, "Seller inserted");
        Ok(())
    }

    async fn update(&self, seller: &Seller) -> PersistenceResult<()> {
        let id = required_id(seller)?;
        let department_id = required_department_id(seller)?;

        let result = sqlx::query(
            "UPDATE seller \
             SET Name = ?, Email = ?, BirthDate = ?, BaseSalary = ?, DepartmentId = ? \
             WHERE Id = ?",
        )
        .bind(&seller.name)
        .bind(&seller.email)
        .bind(seller.birth_date)
        .bind(seller.base_salary)
        .bind(department_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::warn!(id, "Seller update matched no row");
        } else {
            tracing::debug!(id, "Seller updated");
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> PersistenceResult<()> {
        let result = sqlx::query("DELETE FROM seller WHERE Id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::id_does_not_exist());
        }

        tracing::debug!(id, "Seller deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> PersistenceResult<Option<Seller>> {
        let sql = format!("{} WHERE seller.Id = ?", SELLER_SELECT);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let mut departments = DepartmentMap::new();
                Ok(Some(Self::seller_from_row(&row, &mut departments)?))
            }
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> PersistenceResult<Vec<Seller>> {
        let sql = format!("{} ORDER BY seller.Name", SELLER_SELECT);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        Self::sellers_from_rows(&rows)
    }
}

#[async_trait]
impl SellerRepository for SqliteSellerRepository {
    async fn find_by_department(&self, department: &Department) -> PersistenceResult<Vec<Seller>> {
        let Some(department_id) = department.id() else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "{} WHERE seller.DepartmentId = ? ORDER BY seller.Name",
            SELLER_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(department_id)
            .fetch_all(&self.pool)
            .await?;

        Self::sellers_from_rows(&rows)
    }
}
