use mockall::mock;

use super::{CategoryReader, CategoryWriter, ProductReader, ProductWriter};
use crate::domain::{
    category::{Category, NewCategory},
    product::{NewProduct, Product},
};
use crate::repository::errors::RepositoryResult;

mock! {
    pub CategoryReader {}

    impl CategoryReader for CategoryReader {
        fn get_category_by_id(&self, category_id: i32) -> RepositoryResult<Option<Category>>;
        fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    }
}

mock! {
    pub CategoryWriter {}

    impl CategoryWriter for CategoryWriter {
        fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
        fn delete_category(&self, category_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, product_id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self) -> RepositoryResult<Vec<Product>>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn set_product_quantity(&self, product_id: i32, quantity: i32) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    }
}
