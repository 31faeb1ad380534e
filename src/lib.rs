pub mod db;
pub mod domain;
pub mod forms;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Stock level below which a product shows up in the alert section.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;
