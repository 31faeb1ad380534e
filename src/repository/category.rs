use diesel::prelude::*;

use crate::domain::category::{Category as DomainCategory, NewCategory as DomainNewCategory};
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository};

impl CategoryReader for DieselRepository {
    fn get_category_by_id(&self, category_id: i32) -> RepositoryResult<Option<DomainCategory>> {
        use crate::schema::kategorie;

        let mut conn = self.conn()?;

        let category = kategorie::table
            .filter(kategorie::id.eq(category_id))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(DomainCategory::from))
    }

    fn list_categories(&self) -> RepositoryResult<Vec<DomainCategory>> {
        use crate::schema::kategorie;

        let mut conn = self.conn()?;

        let categories = kategorie::table.load::<DbCategory>(&mut conn)?;

        Ok(categories.into_iter().map(DomainCategory::from).collect())
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(
        &self,
        new_category: &DomainNewCategory,
    ) -> RepositoryResult<DomainCategory> {
        use crate::schema::kategorie;

        let mut conn = self.conn()?;

        let insertable = DbNewCategory::from(new_category);

        let created = diesel::insert_into(kategorie::table)
            .values(&insertable)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_category(&self, category_id: i32) -> RepositoryResult<()> {
        use crate::schema::kategorie;

        let mut conn = self.conn()?;

        // Products referencing the category keep their link; it resolves to
        // nothing on the next read.
        let deleted = diesel::delete(kategorie::table.filter(kategorie::id.eq(category_id)))
            .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
