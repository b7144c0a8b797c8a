use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::query_builder::QueryBuilder;
use crate::filter::{Filter, FilterOp, Predicate, QuerySource, SqlParam, StockStatus};

const PRODUCTS: QuerySource = QuerySource {
    select: "p.id",
    from: "products p",
    key: "p.id",
    group_by: None,
};

/// Aggregate catalog figures for the dashboard landing page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_categories: i64,
    pub total_reviews: i64,
    pub products_with_stock: i64,
    pub products_out_of_stock: i64,
    pub average_rating: f64,
    pub recent_products: i64,
}

/// 00:00 UTC on the first day of the month containing `now`.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn dashboard(&self, now: DateTime<Utc>) -> Result<DashboardStats, DatabaseError> {
        let total_products = self.count_products(vec![]).await?;
        let products_with_stock = self
            .count_products(StockStatus::InStock.predicates())
            .await?;
        let products_out_of_stock = self
            .count_products(StockStatus::OutOfStock.predicates())
            .await?;
        let recent_products = self
            .count_products(vec![Predicate::field(
                "p.date_added",
                FilterOp::Gte,
                SqlParam::Timestamp(month_start(now)),
            )])
            .await?;

        let (total_categories,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        let (total_reviews, average_rating): (i64, Option<f64>) =
            sqlx::query_as("SELECT COUNT(*), AVG(rating)::float8 FROM reviews")
                .fetch_one(&self.pool)
                .await?;

        Ok(DashboardStats {
            total_products,
            total_categories,
            total_reviews,
            products_with_stock,
            products_out_of_stock,
            average_rating: average_rating.map(round_rating).unwrap_or(0.0),
            recent_products,
        })
    }

    async fn count_products(&self, predicates: Vec<Predicate>) -> Result<i64, DatabaseError> {
        let mut filter = Filter::new(PRODUCTS);
        filter.predicates(predicates);
        QueryBuilder::<(i64,)>::new(filter).count(&self.pool).await
    }
}

/// Two decimal places.
pub fn round_rating(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
