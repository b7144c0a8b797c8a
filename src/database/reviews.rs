use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::ReviewListing;
use crate::database::query_builder::QueryBuilder;
use crate::filter::Filter;

pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: Filter, debug_logging: bool) -> Result<Vec<ReviewListing>, DatabaseError> {
        QueryBuilder::<ReviewListing>::new(filter)
            .debug_logging(debug_logging)
            .select_all(&self.pool)
            .await
    }

    pub async fn count(&self, filter: Filter) -> Result<i64, DatabaseError> {
        QueryBuilder::<ReviewListing>::new(filter).count(&self.pool).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
