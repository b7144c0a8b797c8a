use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::PgPool;
use std::collections::BTreeSet;
use std::str::FromStr;

use super::products::{validate_price, validate_stock};
use super::{ServiceError, ValidationErrors};
use crate::database::models::BulkChanges;
use crate::database::{CategoryRepository, ProductRepository};

/// The only product fields a bulk update may touch.
pub const BULK_ALLOWED_FIELDS: [&str; 3] = ["stock", "unit_price", "category"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkUpdateRequest {
    #[serde(default)]
    pub product_ids: Vec<i64>,
    #[serde(default)]
    pub updates: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BulkUpdateResult {
    pub message: String,
    pub updated_count: u64,
}

impl BulkUpdateResult {
    fn new(updated_count: u64) -> Self {
        Self {
            message: format!("Successfully updated {} products", updated_count),
            updated_count,
        }
    }
}

/// Requested ids with no matching row, ascending and without duplicates.
pub fn missing_ids(requested: &[i64], existing: &[i64]) -> Vec<i64> {
    let existing: BTreeSet<i64> = existing.iter().copied().collect();
    requested
        .iter()
        .copied()
        .filter(|id| !existing.contains(id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Update keys outside [`BULK_ALLOWED_FIELDS`], in key order.
pub fn disallowed_fields(updates: &Map<String, Value>) -> Vec<&str> {
    updates
        .keys()
        .map(String::as_str)
        .filter(|key| !BULK_ALLOWED_FIELDS.contains(key))
        .collect()
}

/// Typed changes from already allow-listed keys.
pub fn parse_changes(updates: &Map<String, Value>) -> Result<BulkChanges, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut changes = BulkChanges::default();

    if let Some(value) = updates.get("stock") {
        match as_integer(value) {
            Some(stock) => match validate_stock(stock) {
                Ok(()) => changes.stock = Some(stock as i32),
                Err(message) => errors.add("updates", message),
            },
            None => errors.add("updates", "A valid integer is required for stock."),
        }
    }

    if let Some(value) = updates.get("unit_price") {
        match as_decimal(value) {
            Some(price) => match validate_price(price) {
                Ok(()) => changes.unit_price = Some(price),
                Err(message) => errors.add("updates", message),
            },
            None => errors.add("updates", "A valid number is required for unit_price."),
        }
    }

    if let Some(value) = updates.get("category") {
        match as_integer(value) {
            Some(id) => changes.category_id = Some(id),
            None => errors.add("updates", "Category does not exist"),
        }
    }

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(errors)
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let raw = n.to_string();
            Decimal::from_str(&raw)
                .or_else(|_| Decimal::from_scientific(&raw))
                .ok()
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Applies one set of field changes to many products at once.
pub struct BulkUpdateService {
    products: ProductRepository,
    categories: CategoryRepository,
}

impl BulkUpdateService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool),
        }
    }

    /// Every check runs before the single UPDATE; a failure writes nothing.
    pub async fn apply(&self, request: BulkUpdateRequest) -> Result<BulkUpdateResult, ServiceError> {
        if request.product_ids.is_empty() {
            return Err(ValidationErrors::single("product_ids", "This list may not be empty.").into());
        }

        let existing = self.products.existing_ids(&request.product_ids).await?;
        let missing = missing_ids(&request.product_ids, &existing);
        if !missing.is_empty() {
            tracing::warn!(?missing, "Bulk update references unknown products");
            return Err(ValidationErrors::single(
                "product_ids",
                format!("Products with IDs {:?} do not exist", missing),
            )
            .into());
        }

        let disallowed = disallowed_fields(&request.updates);
        if !disallowed.is_empty() {
            return Err(ValidationErrors::single(
                "updates",
                format!(
                    "Field(s) {} not allowed for bulk update. Allowed fields: {}",
                    disallowed
                        .iter()
                        .map(|f| format!("'{}'", f))
                        .collect::<Vec<_>>()
                        .join(", "),
                    BULK_ALLOWED_FIELDS.join(", ")
                ),
            )
            .into());
        }

        let changes = parse_changes(&request.updates)?;
        if changes.is_empty() {
            return Err(ValidationErrors::single("updates", "No fields to update.").into());
        }
        if let Some(category_id) = changes.category_id {
            if !self.categories.exists(category_id).await? {
                return Err(ValidationErrors::single("updates", "Category does not exist").into());
            }
        }

        let updated = self.products.bulk_update(&request.product_ids, &changes).await?;
        tracing::info!(updated, "Bulk updated products");
        Ok(BulkUpdateResult::new(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn updates(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn missing_ids_are_reported_once_in_order() {
        assert_eq!(missing_ids(&[1, 2, 999, 999, 5], &[1, 2]), vec![5, 999]);
        assert!(missing_ids(&[1, 2], &[2, 1]).is_empty());
    }

    #[test]
    fn only_allow_listed_fields_pass() {
        let u = updates(json!({"stock": 1, "title": "x", "unit_price": 2}));
        assert_eq!(disallowed_fields(&u), vec!["title"]);
        assert!(disallowed_fields(&updates(json!({"category": 3}))).is_empty());
    }

    #[test]
    fn disallowed_fields_are_reported_in_key_order() {
        let u = updates(json!({"title": "x", "stock": 1, "description": "y"}));
        assert_eq!(disallowed_fields(&u), vec!["description", "title"]);
    }

    #[test]
    fn stock_change_is_typed() {
        let changes = parse_changes(&updates(json!({"stock": 50}))).unwrap();
        assert_eq!(
            changes,
            BulkChanges {
                stock: Some(50),
                ..Default::default()
            }
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        let errors = parse_changes(&updates(json!({"stock": -3}))).unwrap_err();
        assert_eq!(errors.get("updates"), Some("Stock cannot be negative"));

        let errors = parse_changes(&updates(json!({"unit_price": 0}))).unwrap_err();
        assert_eq!(errors.get("updates"), Some("Price must be greater than 0"));

        assert!(parse_changes(&updates(json!({"stock": "many"}))).is_err());
    }

    #[test]
    fn prices_accept_numbers_and_strings() {
        let changes = parse_changes(&updates(json!({"unit_price": 12.5, "category": "4"}))).unwrap();
        assert_eq!(changes.unit_price, Some(Decimal::from_str("12.5").unwrap()));
        assert_eq!(changes.category_id, Some(4));

        let changes = parse_changes(&updates(json!({"unit_price": "3.10"}))).unwrap();
        assert_eq!(changes.unit_price, Some(Decimal::from_str("3.10").unwrap()));
    }

    #[test]
    fn result_message_counts_rows() {
        let result = BulkUpdateResult::new(3);
        assert_eq!(result.message, "Successfully updated 3 products");
        assert_eq!(result.updated_count, 3);
    }
}
