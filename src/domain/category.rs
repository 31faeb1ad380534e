use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Domain representation of a product category.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Category {
    /// Unique identifier of the category.
    pub id: i32,
    /// Human-readable name of the category.
    pub name: String,
    /// Optional description that expands upon the category name.
    pub description: Option<String>,
    /// Timestamp for when the category record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the category record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    /// Human-readable name of the category.
    pub name: String,
    /// Optional description that expands upon the category name.
    pub description: Option<String>,
    /// Timestamp captured when the category payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewCategory {
    /// Build a new category payload with the supplied name and current timestamp.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            updated_at: Local::now().naive_utc(),
        }
    }

    /// Attach a descriptive text to the category payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
