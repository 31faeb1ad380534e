use crate::domain::product::Product;

/// Returns the products with stock strictly below `threshold`, preserving the
/// order of the input list. Stateless; the threshold is always supplied by
/// the caller.
pub fn low_stock(products: &[Product], threshold: i32) -> Vec<&Product> {
    products
        .iter()
        .filter(|product| product.quantity < threshold)
        .collect()
}
