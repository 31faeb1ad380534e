use crate::domain::category::Category;
use crate::forms::categories::AddCategoryForm;
use crate::repository::{CategoryReader, CategoryWriter};
use crate::services::{ServiceError, ServiceResult};

/// Data required to render the categories index template.
pub struct CategoriesPageData {
    /// Categories in store order.
    pub categories: Vec<Category>,
}

/// Loads the categories overview page.
pub fn load_categories<R>(repo: &R) -> ServiceResult<CategoriesPageData>
where
    R: CategoryReader + ?Sized,
{
    let categories = repo.list_categories().map_err(ServiceError::from)?;

    Ok(CategoriesPageData { categories })
}

/// Creates a new category from the submitted form.
pub fn create_category<R>(repo: &R, form: AddCategoryForm) -> ServiceResult<Category>
where
    R: CategoryWriter + ?Sized,
{
    let new_category = form
        .into_new_category()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_category(&new_category)
        .map_err(ServiceError::from)
}

/// Deletes a category. Products referencing it keep a dangling link that
/// resolves to no name on the next listing.
pub fn remove_category<R>(repo: &R, category_id: i32) -> ServiceResult<()>
where
    R: CategoryWriter + ?Sized,
{
    repo.delete_category(category_id).map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::{MockCategoryReader, MockCategoryWriter};

    fn fixed_datetime() -> NaiveDateTime {
        match NaiveDate::from_ymd_opt(2024, 1, 1) {
            Some(date) => date.and_hms_opt(0, 0, 0).unwrap_or_default(),
            None => NaiveDateTime::default(),
        }
    }

    fn sample_category(id: i32, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            description: None,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    #[test]
    fn load_categories_returns_store_order() {
        let mut repo = MockCategoryReader::new();

        repo.expect_list_categories().times(1).returning(|| {
            Ok(vec![
                sample_category(1, "Narzędzia"),
                sample_category(2, "Elektronika"),
            ])
        });

        let data = load_categories(&repo).expect("expected success");

        assert_eq!(data.categories.len(), 2);
        assert_eq!(data.categories[0].name, "Narzędzia");
        assert_eq!(data.categories[1].name, "Elektronika");
    }

    #[test]
    fn create_category_validates_form() {
        let repo = MockCategoryWriter::new();
        let form = AddCategoryForm {
            name: "   ".to_string(),
            description: None,
        };

        let result = create_category(&repo, form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn create_category_persists_new_entry() {
        let mut repo = MockCategoryWriter::new();

        repo.expect_create_category()
            .times(1)
            .withf(|new_category| {
                assert_eq!(new_category.name, "Narzędzia");
                assert_eq!(new_category.description.as_deref(), Some("Ręczne i elektro"));
                true
            })
            .returning(|_| Ok(sample_category(10, "Narzędzia")));

        let form = AddCategoryForm {
            name: "  Narzędzia ".to_string(),
            description: Some(" Ręczne i elektro ".to_string()),
        };

        let created = create_category(&repo, form).expect("expected success");

        assert_eq!(created.id, 10);
        assert_eq!(created.name, "Narzędzia");
    }

    #[test]
    fn remove_category_deletes_entry() {
        let mut repo = MockCategoryWriter::new();

        repo.expect_delete_category()
            .times(1)
            .withf(|category_id| {
                assert_eq!(*category_id, 2);
                true
            })
            .returning(|_| Ok(()));

        let result = remove_category(&repo, 2);

        assert!(result.is_ok());
    }

    #[test]
    fn remove_category_reports_missing_entry() {
        let mut repo = MockCategoryWriter::new();

        repo.expect_delete_category()
            .times(1)
            .returning(|_| Err(RepositoryError::NotFound));

        let result = remove_category(&repo, 99);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
