use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub unit_price: Decimal,
    pub image: Option<String>,
    pub stock: i32,
    pub date_added: DateTime<Utc>,
    pub category_id: i64,
}

/// Product joined with its category name and review aggregates.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProductListing {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub unit_price: Decimal,
    pub image: Option<String>,
    pub stock: i32,
    pub date_added: DateTime<Utc>,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub average_rating: Option<f64>,
    pub review_count: i64,
}

/// Column values written by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductValues {
    pub title: String,
    pub description: String,
    pub unit_price: Decimal,
    pub image: Option<String>,
    pub stock: i32,
    pub category_id: i64,
}

/// Field changes applied identically to every product in a bulk update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkChanges {
    pub stock: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub category_id: Option<i64>,
}

impl BulkChanges {
    pub fn is_empty(&self) -> bool {
        self.stock.is_none() && self.unit_price.is_none() && self.category_id.is_none()
    }
}
