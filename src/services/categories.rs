use serde::Deserialize;
use sqlx::PgPool;

use super::{ServiceError, ValidationErrors, REQUIRED};
use crate::database::models::{Category, CategoryWithCount};
use crate::database::CategoryRepository;

const MAX_NAME_LENGTH: usize = 255;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPayload {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Category values after field validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryValues {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryPayload {
    pub fn merged_onto(self, existing: &Category) -> Self {
        Self {
            name: self.name.or_else(|| Some(existing.name.clone())),
            description: self.description.or_else(|| existing.description.clone()),
        }
    }

    pub fn validate(self) -> Result<CategoryValues, ValidationErrors> {
        let name = self.name.map(|n| n.trim().to_string()).unwrap_or_default();
        if name.is_empty() {
            return Err(ValidationErrors::single("name", REQUIRED));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ValidationErrors::single(
                "name",
                "Ensure this field has no more than 255 characters.",
            ));
        }
        Ok(CategoryValues {
            name,
            description: self.description.filter(|d| !d.trim().is_empty()),
        })
    }
}

pub struct CategoryService {
    categories: CategoryRepository,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            categories: CategoryRepository::new(pool),
        }
    }

    pub async fn list(&self) -> Result<Vec<CategoryWithCount>, ServiceError> {
        Ok(self.categories.list_with_counts().await?)
    }

    pub async fn get(&self, id: i64) -> Result<CategoryWithCount, ServiceError> {
        Ok(self.categories.find_with_count(id).await?)
    }

    pub async fn create(&self, payload: CategoryPayload) -> Result<CategoryWithCount, ServiceError> {
        let values = self.validated(payload, None).await?;
        let category = self
            .categories
            .insert(&values.name, values.description.as_deref())
            .await?;
        tracing::info!(category_id = category.id, "Created category");
        Ok(self.categories.find_with_count(category.id).await?)
    }

    pub async fn replace(&self, id: i64, payload: CategoryPayload) -> Result<CategoryWithCount, ServiceError> {
        self.existing(id).await?;
        self.save(id, payload).await
    }

    pub async fn patch(&self, id: i64, payload: CategoryPayload) -> Result<CategoryWithCount, ServiceError> {
        let existing = self.existing(id).await?;
        self.save(id, payload.merged_onto(&existing)).await
    }

    /// Refused while any product still references the category.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.existing(id).await?;
        if self.categories.product_count(id).await? > 0 {
            tracing::warn!(category_id = id, "Refused to delete category with products");
            return Err(ServiceError::Validation(ValidationErrors::single(
                "category",
                "Cannot delete category with existing products",
            )));
        }
        self.categories.delete(id).await?;
        tracing::info!(category_id = id, "Deleted category");
        Ok(())
    }

    async fn save(&self, id: i64, payload: CategoryPayload) -> Result<CategoryWithCount, ServiceError> {
        let values = self.validated(payload, Some(id)).await?;
        self.categories
            .update(id, &values.name, values.description.as_deref())
            .await?;
        Ok(self.categories.find_with_count(id).await?)
    }

    async fn existing(&self, id: i64) -> Result<Category, ServiceError> {
        self.categories
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Category not found".to_string()))
    }

    async fn validated(
        &self,
        payload: CategoryPayload,
        except_id: Option<i64>,
    ) -> Result<CategoryValues, ServiceError> {
        let values = payload.validate()?;
        if self.categories.name_taken(&values.name, except_id).await? {
            return Err(ValidationErrors::single("name", "Category with this name already exists.").into());
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_required_and_trimmed() {
        let err = CategoryPayload::default().validate().unwrap_err();
        assert_eq!(err.get("name"), Some(REQUIRED));

        let values = CategoryPayload {
            name: Some("  Kitchen ".to_string()),
            description: Some("   ".to_string()),
        }
        .validate()
        .unwrap();
        assert_eq!(values.name, "Kitchen");
        assert_eq!(values.description, None);
    }

    #[test]
    fn patch_keeps_existing_name() {
        let existing = Category {
            id: 1,
            name: "Garden".to_string(),
            description: Some("Outdoor".to_string()),
        };
        let values = CategoryPayload {
            description: Some("Plants".to_string()),
            ..Default::default()
        }
        .merged_onto(&existing)
        .validate()
        .unwrap();
        assert_eq!(values.name, "Garden");
        assert_eq!(values.description.as_deref(), Some("Plants"));
    }
}
