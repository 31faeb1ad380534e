use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};
use crate::models::category::Category as DbCategory;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::produkty)]
pub struct Product {
    pub id: i32,
    #[diesel(column_name = nazwa)]
    pub name: String,
    #[diesel(column_name = liczba)]
    pub quantity: i32,
    #[diesel(column_name = cena)]
    pub price_cents: i32,
    #[diesel(column_name = kategoria)]
    pub category_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::produkty)]
pub struct NewProduct<'a> {
    #[diesel(column_name = nazwa)]
    pub name: &'a str,
    #[diesel(column_name = liczba)]
    pub quantity: i32,
    #[diesel(column_name = cena)]
    pub price_cents: i32,
    #[diesel(column_name = kategoria)]
    pub category_id: Option<i32>,
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Combine a product row with its optionally joined category row.
    pub fn into_domain(self, category: Option<DbCategory>) -> DomainProduct {
        DomainProduct {
            id: self.id,
            name: self.name,
            quantity: self.quantity,
            price_cents: self.price_cents,
            category_id: self.category_id,
            category_name: category.map(|category| category.name),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            name: value.name.as_str(),
            quantity: value.quantity,
            price_cents: value.price_cents,
            category_id: value.category_id,
            updated_at: value.updated_at,
        }
    }
}
