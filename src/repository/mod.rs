use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory};
use crate::domain::product::{NewProduct, Product};
use crate::repository::errors::RepositoryResult;

pub mod category;
pub mod errors;
pub mod product;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over category records.
pub trait CategoryReader {
    fn get_category_by_id(&self, category_id: i32) -> RepositoryResult<Option<Category>>;
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
}

/// Write operations over category records.
pub trait CategoryWriter {
    fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
    fn delete_category(&self, category_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over product records. Products are returned with
/// their category name resolved.
pub trait ProductReader {
    fn get_product_by_id(&self, product_id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self) -> RepositoryResult<Vec<Product>>;
}

/// Write operations over product records.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn set_product_quantity(&self, product_id: i32, quantity: i32) -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
}
