use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Category, CategoryWithCount};

const CATEGORY_WITH_COUNT: &str = "SELECT c.id, c.name, c.description, COUNT(p.id) AS product_count \
     FROM categories c LEFT JOIN products p ON p.category_id = c.id";

pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All categories ordered by name, each with its product count.
    pub async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, DatabaseError> {
        let rows = sqlx::query_as::<_, CategoryWithCount>(&format!(
            "{} GROUP BY c.id ORDER BY c.name ASC",
            CATEGORY_WITH_COUNT
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_with_count(&self, id: i64) -> Result<CategoryWithCount, DatabaseError> {
        sqlx::query_as::<_, CategoryWithCount>(&format!(
            "{} WHERE c.id = $1 GROUP BY c.id",
            CATEGORY_WITH_COUNT
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("Category {} not found", id)))
    }

    pub async fn find(&self, id: i64) -> Result<Option<Category>, DatabaseError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    pub async fn exists(&self, id: i64) -> Result<bool, DatabaseError> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    /// Whether another category already uses `name`.
    pub async fn name_taken(&self, name: &str, except_id: Option<i64>) -> Result<bool, DatabaseError> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(except_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    pub async fn product_count(&self, id: i64) -> Result<i64, DatabaseError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products WHERE category_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    pub async fn insert(&self, name: &str, description: Option<&str>) -> Result<Category, DatabaseError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING id, name, description",
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(category)
    }

    pub async fn update(
        &self,
        id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, DatabaseError> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $1, description = $2 WHERE id = $3 \
             RETURNING id, name, description",
        )
        .bind(name)
        .bind(description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("Category {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
