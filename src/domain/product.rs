use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Domain representation of a stocked product.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Units currently on stock. Never negative.
    pub quantity: i32,
    /// Price in grosze (hundredths of the display unit).
    pub price_cents: i32,
    /// Optional reference to the owning category.
    pub category_id: Option<i32>,
    /// Category name resolved at read time; `None` when the product has no
    /// category or the referenced category no longer exists.
    pub category_name: Option<String>,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Human-readable name of the product.
    pub name: String,
    /// Initial stock level.
    pub quantity: i32,
    /// Price in grosze.
    pub price_cents: i32,
    /// Optional reference to an existing category.
    pub category_id: Option<i32>,
    /// Timestamp captured when the product payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a new product payload with the supplied details and current timestamp.
    pub fn new(name: impl Into<String>, quantity: i32, price_cents: i32) -> Self {
        Self {
            name: name.into(),
            quantity,
            price_cents,
            category_id: None,
            updated_at: Local::now().naive_utc(),
        }
    }

    /// Attach a category reference to the product payload.
    pub fn with_category_id(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Direction of a stock adjustment as selected in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockDirection {
    Add,
    Subtract,
}

/// A validated stock adjustment: an unsigned magnitude plus a direction.
#[derive(Debug, Clone, Copy)]
pub struct StockAdjustment {
    /// Number of units to add or subtract. Always at least 1.
    pub amount: i32,
    /// Whether the amount is added to or subtracted from the current stock.
    pub direction: StockDirection,
}
