use serde::Serialize;

use crate::domain::product::{Product, StockDirection};
use crate::forms::products::{AddProductForm, AdjustStockForm, UploadProductsForm};
use crate::repository::{CategoryReader, ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult};

/// Creates a new product from the submitted form.
pub fn create_product<R>(repo: &R, form: AddProductForm) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    let new_product = form
        .into_new_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_product(&new_product).map_err(ServiceError::from)
}

/// Applies an add/subtract stock adjustment to a product.
///
/// Subtracting the full stock leaves the product at zero; records are only
/// ever removed by the explicit delete action.
pub fn adjust_stock<R>(repo: &R, product_id: i32, form: AdjustStockForm) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let adjustment = form
        .into_adjustment()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let product = repo
        .get_product_by_id(product_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let quantity = match adjustment.direction {
        StockDirection::Add => product.quantity.saturating_add(adjustment.amount),
        StockDirection::Subtract => {
            if adjustment.amount > product.quantity {
                return Err(ServiceError::InsufficientStock {
                    requested: adjustment.amount,
                    available: product.quantity,
                });
            }
            product.quantity - adjustment.amount
        }
    };

    repo.set_product_quantity(product_id, quantity)
        .map_err(ServiceError::from)
}

/// Deletes a product unconditionally.
pub fn remove_product<R>(repo: &R, product_id: i32) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    repo.delete_product(product_id).map_err(ServiceError::from)
}

/// Imports products from an uploaded CSV file. Returns the number of created
/// records. Rows are validated up front; nothing is inserted when any row is
/// rejected.
pub fn import_products<R>(repo: &R, form: &mut UploadProductsForm) -> ServiceResult<usize>
where
    R: ProductWriter + CategoryReader + ?Sized,
{
    let categories = repo.list_categories().map_err(ServiceError::from)?;

    let new_products = form
        .into_new_products(&categories)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let mut created = 0usize;
    for new_product in &new_products {
        repo.create_product(new_product).map_err(ServiceError::from)?;
        created += 1;
    }

    Ok(created)
}

/// View model exposed to the inventory index template.
#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    pub price_formatted: String,
    pub category_name: Option<String>,
    pub low_stock: bool,
}

impl ProductView {
    /// Build the render model, flagging products below `threshold`.
    pub fn from_product(product: Product, threshold: i32) -> Self {
        let Product {
            id,
            name,
            quantity,
            price_cents,
            category_name,
            ..
        } = product;

        Self {
            id,
            name,
            quantity,
            price_formatted: format!("{:.2}", price_cents as f64 / 100.0),
            category_name,
            low_stock: quantity < threshold,
        }
    }
}
