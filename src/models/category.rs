use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{Category as DomainCategory, NewCategory as DomainNewCategory};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::kategorie)]
pub struct Category {
    pub id: i32,
    #[diesel(column_name = nazwa)]
    pub name: String,
    #[diesel(column_name = opis)]
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::kategorie)]
pub struct NewCategory<'a> {
    #[diesel(column_name = nazwa)]
    pub name: &'a str,
    #[diesel(column_name = opis)]
    pub description: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<Category> for DomainCategory {
    fn from(value: Category) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewCategory> for NewCategory<'a> {
    fn from(value: &'a DomainNewCategory) -> Self {
        Self {
            name: value.name.as_str(),
            description: value.description.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
