use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use super::{ServiceError, ValidationErrors, REQUIRED};
use crate::database::models::{Product, ProductListing, ProductValues};
use crate::database::{CategoryRepository, ProductRepository};

const MAX_TITLE_LENGTH: usize = 255;
/// NUMERIC(10, 2)
const MAX_PRICE_DIGITS: u32 = 10;
const MAX_PRICE_SCALE: u32 = 2;

/// Body of product create, replace and partial update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<Decimal>,
    pub image: Option<String>,
    pub stock: Option<i64>,
    pub category: Option<i64>,
}

impl ProductPayload {
    /// Fill every absent field from `existing`. An empty `image` clears it.
    pub fn merged_onto(self, existing: &Product) -> Self {
        Self {
            title: self.title.or_else(|| Some(existing.title.clone())),
            description: self.description.or_else(|| Some(existing.description.clone())),
            unit_price: self.unit_price.or(Some(existing.unit_price)),
            image: match self.image {
                Some(image) => Some(image),
                None => existing.image.clone(),
            },
            stock: self.stock.or(Some(i64::from(existing.stock))),
            category: self.category.or(Some(existing.category_id)),
        }
    }

    /// Field-level rules that need no store access.
    pub fn validate(self) -> Result<ProductValues, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = self.title.map(|t| t.trim().to_string()).unwrap_or_default();
        if title.is_empty() {
            errors.add("title", REQUIRED);
        } else if title.chars().count() > MAX_TITLE_LENGTH {
            errors.add("title", "Ensure this field has no more than 255 characters.");
        }

        match self.unit_price {
            None => errors.add("unit_price", REQUIRED),
            Some(price) => {
                if let Err(message) = validate_price(price) {
                    errors.add("unit_price", message);
                }
            }
        }

        let stock = self.stock.unwrap_or(0);
        if let Err(message) = validate_stock(stock) {
            errors.add("stock", message);
        }

        if self.category.is_none() {
            errors.add("category", REQUIRED);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ProductValues {
            title,
            description: self.description.unwrap_or_default(),
            unit_price: self.unit_price.unwrap_or_default(),
            image: self.image.map(|i| i.trim().to_string()).filter(|i| !i.is_empty()),
            stock: stock as i32,
            category_id: self.category.unwrap_or_default(),
        })
    }
}

pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price <= Decimal::ZERO {
        return Err("Price must be greater than 0");
    }
    let normalized = price.normalize();
    if normalized.scale() > MAX_PRICE_SCALE {
        return Err("Ensure that there are no more than 2 decimal places.");
    }
    if normalized.trunc() >= Decimal::from(10_i64.pow(MAX_PRICE_DIGITS - MAX_PRICE_SCALE)) {
        return Err("Ensure that there are no more than 10 digits in total.");
    }
    Ok(())
}

pub fn validate_stock(stock: i64) -> Result<(), &'static str> {
    if stock < 0 {
        Err("Stock cannot be negative")
    } else if stock > i64::from(i32::MAX) {
        Err("Ensure this value is less than or equal to 2147483647.")
    } else {
        Ok(())
    }
}

/// Validated single-product mutations.
pub struct ProductService {
    products: ProductRepository,
    categories: CategoryRepository,
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool),
        }
    }

    pub async fn get(&self, id: i64) -> Result<ProductListing, ServiceError> {
        Ok(self.products.find_listing(id).await?)
    }

    pub async fn create(&self, payload: ProductPayload) -> Result<ProductListing, ServiceError> {
        let values = self.validated(payload).await?;
        let product = self.products.insert(&values).await?;
        tracing::info!(product_id = product.id, "Created product");
        Ok(self.products.find_listing(product.id).await?)
    }

    /// Full replacement; omitted optional fields take their defaults.
    pub async fn replace(&self, id: i64, payload: ProductPayload) -> Result<ProductListing, ServiceError> {
        self.existing(id).await?;
        let values = self.validated(payload).await?;
        self.products.update(id, &values).await?;
        Ok(self.products.find_listing(id).await?)
    }

    pub async fn patch(&self, id: i64, payload: ProductPayload) -> Result<ProductListing, ServiceError> {
        let existing = self.existing(id).await?;
        let values = self.validated(payload.merged_onto(&existing)).await?;
        self.products.update(id, &values).await?;
        Ok(self.products.find_listing(id).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if !self.products.delete(id).await? {
            return Err(ServiceError::NotFound("Product not found".to_string()));
        }
        tracing::info!(product_id = id, "Deleted product");
        Ok(())
    }

    async fn existing(&self, id: i64) -> Result<Product, ServiceError> {
        self.products
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Product not found".to_string()))
    }

    async fn validated(&self, payload: ProductPayload) -> Result<ProductValues, ServiceError> {
        let values = payload.validate().map_err(|errors| {
            tracing::warn!("Rejected product payload: {}", errors.summary());
            errors
        })?;
        if !self.categories.exists(values.category_id).await? {
            return Err(ValidationErrors::single("category", "Category does not exist").into());
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn payload() -> ProductPayload {
        ProductPayload {
            title: Some("Mug".to_string()),
            description: None,
            unit_price: Some(Decimal::from_str("9.99").unwrap()),
            image: None,
            stock: Some(5),
            category: Some(1),
        }
    }

    #[test]
    fn valid_payload_keeps_values_unchanged() {
        let values = payload().validate().unwrap();
        assert_eq!(values.unit_price, Decimal::from_str("9.99").unwrap());
        assert_eq!(values.stock, 5);
        assert_eq!(values.description, "");
        assert_eq!(values.image, None);
    }

    #[test]
    fn zero_price_and_negative_stock_are_rejected() {
        let errors = ProductPayload {
            unit_price: Some(Decimal::ZERO),
            stock: Some(-1),
            ..payload()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.get("unit_price"), Some("Price must be greater than 0"));
        assert_eq!(errors.get("stock"), Some("Stock cannot be negative"));
    }

    #[test]
    fn required_fields_are_reported() {
        let errors = ProductPayload::default().validate().unwrap_err();
        assert_eq!(errors.get("title"), Some(REQUIRED));
        assert_eq!(errors.get("unit_price"), Some(REQUIRED));
        assert_eq!(errors.get("category"), Some(REQUIRED));
        assert_eq!(errors.get("stock"), None);
    }

    #[test]
    fn price_precision_matches_column() {
        assert!(validate_price(Decimal::from_str("12345678.99").unwrap()).is_ok());
        assert!(validate_price(Decimal::from_str("1.999").unwrap()).is_err());
        assert!(validate_price(Decimal::from_str("1.500").unwrap()).is_ok());
        assert!(validate_price(Decimal::from_str("100000000").unwrap()).is_err());
    }

    #[test]
    fn stock_must_fit_the_column() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(i64::from(i32::MAX) + 1).is_err());
    }

    #[test]
    fn patch_merges_onto_existing_row() {
        let existing = Product {
            id: 4,
            title: "Old".to_string(),
            description: "desc".to_string(),
            unit_price: Decimal::from_str("3.50").unwrap(),
            image: Some("products/old.png".to_string()),
            stock: 12,
            date_added: Utc::now(),
            category_id: 2,
        };
        let values = ProductPayload {
            stock: Some(0),
            ..Default::default()
        }
        .merged_onto(&existing)
        .validate()
        .unwrap();

        assert_eq!(values.title, "Old");
        assert_eq!(values.stock, 0);
        assert_eq!(values.category_id, 2);
        assert_eq!(values.image.as_deref(), Some("products/old.png"));

        let cleared = ProductPayload {
            image: Some(String::new()),
            ..Default::default()
        }
        .merged_onto(&existing)
        .validate()
        .unwrap();
        assert_eq!(cleared.image, None);
    }

    #[test]
    fn patch_cannot_make_values_invalid() {
        let existing = Product {
            id: 4,
            title: "Old".to_string(),
            description: String::new(),
            unit_price: Decimal::ONE,
            image: None,
            stock: 1,
            date_added: Utc::now(),
            category_id: 2,
        };
        let errors = ProductPayload {
            unit_price: Some(Decimal::from(-2)),
            ..Default::default()
        }
        .merged_onto(&existing)
        .validate()
        .unwrap_err();
        assert_eq!(errors.get("unit_price"), Some("Price must be greater than 0"));
    }
}
