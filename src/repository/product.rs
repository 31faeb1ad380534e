use chrono::Local;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};
use crate::models::category::Category as DbCategory;
use crate::models::product::{NewProduct as DbNewProduct, Product as DbProduct};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ProductReader, ProductWriter};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, product_id: i32) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::{kategorie, produkty};

        let mut conn = self.conn()?;

        let row = produkty::table
            .left_join(kategorie::table)
            .filter(produkty::id.eq(product_id))
            .select((DbProduct::as_select(), Option::<DbCategory>::as_select()))
            .first::<(DbProduct, Option<DbCategory>)>(&mut conn)
            .optional()?;

        Ok(row.map(|(product, category)| product.into_domain(category)))
    }

    fn list_products(&self) -> RepositoryResult<Vec<DomainProduct>> {
        use crate::schema::{kategorie, produkty};

        let mut conn = self.conn()?;

        let rows = produkty::table
            .left_join(kategorie::table)
            .select((DbProduct::as_select(), Option::<DbCategory>::as_select()))
            .load::<(DbProduct, Option<DbCategory>)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(product, category)| product.into_domain(category))
            .collect())
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        use crate::schema::produkty;

        let mut conn = self.conn()?;

        let insertable = DbNewProduct::from(new_product);

        let created = diesel::insert_into(produkty::table)
            .values(&insertable)
            .get_result::<DbProduct>(&mut conn)?;

        resolve_category(&mut conn, created)
    }

    fn set_product_quantity(&self, product_id: i32, quantity: i32) -> RepositoryResult<DomainProduct> {
        use crate::schema::produkty;

        let mut conn = self.conn()?;

        let now = Local::now().naive_utc();

        let updated = diesel::update(produkty::table.filter(produkty::id.eq(product_id)))
            .set((produkty::liczba.eq(quantity), produkty::updated_at.eq(now)))
            .get_result::<DbProduct>(&mut conn)?;

        resolve_category(&mut conn, updated)
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        use crate::schema::produkty;

        let mut conn = self.conn()?;

        let deleted = diesel::delete(produkty::table.filter(produkty::id.eq(product_id)))
            .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

fn resolve_category(
    conn: &mut SqliteConnection,
    product: DbProduct,
) -> RepositoryResult<DomainProduct> {
    use crate::schema::kategorie;

    let category = match product.category_id {
        Some(category_id) => kategorie::table
            .filter(kategorie::id.eq(category_id))
            .first::<DbCategory>(conn)
            .optional()?,
        None => None,
    };

    Ok(product.into_domain(category))
}
