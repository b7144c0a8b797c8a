use sqlx::{postgres::PgArguments, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::models::{BulkChanges, Product, ProductListing, ProductValues};
use crate::database::query_builder::QueryBuilder;
use crate::filter::product::PRODUCT_SOURCE;
use crate::filter::{Filter, FilterOp, Predicate, SqlParam};

const PRODUCT_COLUMNS: &str =
    "id, title, description, unit_price, image, stock, date_added, category_id";

pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: Filter, debug_logging: bool) -> Result<Vec<ProductListing>, DatabaseError> {
        QueryBuilder::<ProductListing>::new(filter)
            .debug_logging(debug_logging)
            .select_all(&self.pool)
            .await
    }

    pub async fn count(&self, filter: Filter) -> Result<i64, DatabaseError> {
        QueryBuilder::<ProductListing>::new(filter).count(&self.pool).await
    }

    pub async fn find(&self, id: i64) -> Result<Option<Product>, DatabaseError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    /// Product with category name and review aggregates, or `NotFound`.
    pub async fn find_listing(&self, id: i64) -> Result<ProductListing, DatabaseError> {
        let mut filter = Filter::new(PRODUCT_SOURCE);
        filter.predicate(Predicate::field("p.id", FilterOp::Eq, SqlParam::Int(id)));

        QueryBuilder::<ProductListing>::new(filter)
            .select_all(&self.pool)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DatabaseError::NotFound(format!("Product {} not found", id)))
    }

    pub async fn insert(&self, values: &ProductValues) -> Result<Product, DatabaseError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (title, description, unit_price, image, stock, category_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(&values.title)
        .bind(&values.description)
        .bind(values.unit_price)
        .bind(&values.image)
        .bind(values.stock)
        .bind(values.category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn update(&self, id: i64, values: &ProductValues) -> Result<Product, DatabaseError> {
        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET title = $1, description = $2, unit_price = $3, image = $4, \
             stock = $5, category_id = $6 WHERE id = $7 RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(&values.title)
        .bind(&values.description)
        .bind(values.unit_price)
        .bind(&values.image)
        .bind(values.stock)
        .bind(values.category_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("Product {} not found", id)))
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The subset of `ids` that exist.
    pub async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let rows: Vec<(i64,)> = sqlx::query_as("SELECT id FROM products WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// One UPDATE statement over all `ids`; returns the number of rows touched.
    pub async fn bulk_update(&self, ids: &[i64], changes: &BulkChanges) -> Result<u64, DatabaseError> {
        if ids.is_empty() || changes.is_empty() {
            return Ok(0);
        }
        let query = bulk_update_sql(changes);
        let mut q: sqlx::query::Query<'_, sqlx::Postgres, PgArguments> = sqlx::query(&query);
        if let Some(stock) = changes.stock {
            q = q.bind(stock);
        }
        if let Some(unit_price) = changes.unit_price {
            q = q.bind(unit_price);
        }
        if let Some(category_id) = changes.category_id {
            q = q.bind(category_id);
        }
        let result = q.bind(ids).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

/// SET clause in a fixed column order; bind order must follow it.
fn bulk_update_sql(changes: &BulkChanges) -> String {
    let mut assignments = Vec::new();
    if changes.stock.is_some() {
        assignments.push("stock");
    }
    if changes.unit_price.is_some() {
        assignments.push("unit_price");
    }
    if changes.category_id.is_some() {
        assignments.push("category_id");
    }
    let set_clause = assignments
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ${}", column, i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE products SET {} WHERE id = ANY(${})",
        set_clause,
        assignments.len() + 1
    )
}
