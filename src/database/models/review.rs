use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Review joined with its author (if any) and product title.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewListing {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub user_id: Option<i64>,
    pub user_email: Option<String>,
    pub user_first_name: Option<String>,
    pub user_last_name: Option<String>,
    pub product_id: i64,
    pub product_title: String,
}
