use serde::Deserialize;

use crate::DEFAULT_LOW_STOCK_THRESHOLD;
use crate::domain::category::Category;
use crate::repository::{CategoryReader, ProductReader};
use crate::services::products::ProductView;
use crate::services::{ServiceError, ServiceResult, alerts};

/// Query parameters accepted by the inventory index page.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    /// Low-stock threshold chosen with the page control.
    pub threshold: Option<i32>,
}

/// Data required to render the inventory index template.
pub struct IndexPageData {
    /// Products in store order, with display fields resolved.
    pub products: Vec<ProductView>,
    /// Low-stock subsequence of the product list, in the same order.
    pub alerts: Vec<ProductView>,
    /// Categories for the add-product select.
    pub categories: Vec<Category>,
    /// Threshold echoed back to the template control.
    pub threshold: i32,
}

/// Loads the inventory overview. Both lists are re-fetched in full on every
/// render; the alert view is recomputed from the fresh product list.
pub fn load_index_page<R>(repo: &R, query: IndexQuery) -> ServiceResult<IndexPageData>
where
    R: ProductReader + CategoryReader + ?Sized,
{
    let threshold = query.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);

    let products = repo.list_products().map_err(ServiceError::from)?;
    let categories = repo.list_categories().map_err(ServiceError::from)?;

    let alerts = alerts::low_stock(&products, threshold)
        .into_iter()
        .cloned()
        .map(|product| ProductView::from_product(product, threshold))
        .collect();

    let products = products
        .into_iter()
        .map(|product| ProductView::from_product(product, threshold))
        .collect();

    Ok(IndexPageData {
        products,
        alerts,
        categories,
        threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::product::Product;
    use crate::repository::errors::RepositoryResult;
    use crate::repository::mock::{MockCategoryReader, MockProductReader};
    use crate::domain::category::Category as DomainCategory;

    fn fixed_datetime() -> NaiveDateTime {
        match NaiveDate::from_ymd_opt(2024, 1, 1) {
            Some(date) => date.and_hms_opt(0, 0, 0).unwrap_or_default(),
            None => NaiveDateTime::default(),
        }
    }

    struct MockIndexRepo {
        pub products: MockProductReader,
        pub categories: MockCategoryReader,
    }

    impl ProductReader for MockIndexRepo {
        fn get_product_by_id(&self, product_id: i32) -> RepositoryResult<Option<Product>> {
            self.products.get_product_by_id(product_id)
        }

        fn list_products(&self) -> RepositoryResult<Vec<Product>> {
            self.products.list_products()
        }
    }

    impl CategoryReader for MockIndexRepo {
        fn get_category_by_id(
            &self,
            category_id: i32,
        ) -> RepositoryResult<Option<DomainCategory>> {
            self.categories.get_category_by_id(category_id)
        }

        fn list_categories(&self) -> RepositoryResult<Vec<DomainCategory>> {
            self.categories.list_categories()
        }
    }

    fn sample_product(id: i32, name: &str, quantity: i32) -> Product {
        Product {
            id,
            name: name.to_string(),
            quantity,
            price_cents: 1500,
            category_id: None,
            category_name: None,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    #[test]
    fn load_index_page_uses_default_threshold() {
        let mut repo = MockIndexRepo {
            products: MockProductReader::new(),
            categories: MockCategoryReader::new(),
        };

        repo.products.expect_list_products().times(1).returning(|| {
            Ok(vec![
                sample_product(1, "Młotek", 5),
                sample_product(2, "Deska", 50),
            ])
        });
        repo.categories
            .expect_list_categories()
            .times(1)
            .returning(|| Ok(Vec::new()));

        let data = load_index_page(&repo, IndexQuery::default()).expect("expected success");

        assert_eq!(data.threshold, DEFAULT_LOW_STOCK_THRESHOLD);
        assert_eq!(data.products.len(), 2);
        assert_eq!(data.alerts.len(), 1);
        assert_eq!(data.alerts[0].name, "Młotek");
        assert!(data.products[0].low_stock);
        assert!(!data.products[1].low_stock);
    }

    #[test]
    fn load_index_page_honors_threshold_parameter() {
        let mut repo = MockIndexRepo {
            products: MockProductReader::new(),
            categories: MockCategoryReader::new(),
        };

        repo.products.expect_list_products().times(1).returning(|| {
            Ok(vec![
                sample_product(1, "Młotek", 5),
                sample_product(2, "Deska", 50),
            ])
        });
        repo.categories
            .expect_list_categories()
            .times(1)
            .returning(|| Ok(Vec::new()));

        let query = IndexQuery { threshold: Some(60) };
        let data = load_index_page(&repo, query).expect("expected success");

        assert_eq!(data.threshold, 60);
        assert_eq!(data.alerts.len(), 2);
    }
}
