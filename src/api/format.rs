use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::database::models::{ProductListing, ReviewListing};
use crate::database::stats::round_rating;
use crate::filter::product::LOW_STOCK_THRESHOLD;
use crate::middleware::RequestOrigin;

/// Stock present but at or below the low-stock threshold.
pub fn is_low_stock(stock: i32) -> bool {
    stock > 0 && i64::from(stock) <= LOW_STOCK_THRESHOLD
}

pub fn is_out_of_stock(stock: i32) -> bool {
    stock == 0
}

/// Resolves stored media paths into absolute URLs for the current request.
pub struct MediaUrls<'a> {
    origin: &'a RequestOrigin,
    prefix: &'a str,
}

impl<'a> MediaUrls<'a> {
    pub fn new(origin: &'a RequestOrigin, prefix: &'a str) -> Self {
        Self { origin, prefix }
    }

    pub fn resolve(&self, stored: Option<&str>) -> Option<String> {
        let stored = stored.map(str::trim).filter(|s| !s.is_empty())?;
        if stored.starts_with("http://") || stored.starts_with("https://") {
            return Some(stored.to_string());
        }
        let relative = stored.trim_start_matches('/');
        let relative = relative
            .strip_prefix(self.prefix.trim_start_matches('/'))
            .unwrap_or(relative);
        Some(self.origin.absolute(&format!("{}{}", self.prefix, relative)))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardProduct {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub unit_price: Decimal,
    pub image: Option<String>,
    pub stock: i32,
    pub date_added: DateTime<Utc>,
    pub category: i64,
    pub category_name: Option<String>,
    pub average_rating: Option<f64>,
    pub review_count: i64,
    pub is_low_stock: bool,
    pub is_out_of_stock: bool,
}

impl DashboardProduct {
    pub fn from_listing(listing: ProductListing, media: &MediaUrls<'_>) -> Self {
        Self {
            image: media.resolve(listing.image.as_deref()),
            is_low_stock: is_low_stock(listing.stock),
            is_out_of_stock: is_out_of_stock(listing.stock),
            average_rating: listing.average_rating.map(round_rating),
            id: listing.id,
            title: listing.title,
            description: listing.description,
            unit_price: listing.unit_price,
            stock: listing.stock,
            date_added: listing.date_added,
            category: listing.category_id,
            category_name: listing.category_name,
            review_count: listing.review_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReview {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub user: Option<i64>,
    pub user_name: String,
    pub user_email: Option<String>,
    pub product_id: i64,
    pub product_title: String,
}

impl From<ReviewListing> for DashboardReview {
    fn from(review: ReviewListing) -> Self {
        let user_name = display_name(
            review.user_id.is_some(),
            review.user_first_name.as_deref(),
            review.user_last_name.as_deref(),
            review.user_email.as_deref(),
        );
        Self {
            id: review.id,
            title: review.title,
            content: review.content,
            rating: review.rating,
            created_at: review.created_at,
            user: review.user_id,
            user_name,
            user_email: review.user_email,
            product_id: review.product_id,
            product_title: review.product_title,
        }
    }
}

/// Full name if either part is set, otherwise the email, otherwise "Anonymous User".
pub fn display_name(
    has_user: bool,
    first_name: Option<&str>,
    last_name: Option<&str>,
    email: Option<&str>,
) -> String {
    if !has_user {
        return "Anonymous User".to_string();
    }
    let full = format!(
        "{} {}",
        first_name.unwrap_or_default().trim(),
        last_name.unwrap_or_default().trim()
    );
    let full = full.trim();
    if !full.is_empty() {
        return full.to_string();
    }
    email
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "Anonymous User".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn origin() -> RequestOrigin {
        RequestOrigin {
            origin: "http://shop.test".to_string(),
            path_and_query: "/dashboard/products".to_string(),
        }
    }

    fn listing(stock: i32) -> ProductListing {
        ProductListing {
            id: 1,
            title: "Mug".to_string(),
            description: String::new(),
            unit_price: Decimal::new(999, 2),
            image: Some("products/mug.jpg".to_string()),
            stock,
            date_added: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            category_id: 3,
            category_name: Some("Kitchen".to_string()),
            average_rating: None,
            review_count: 0,
        }
    }

    #[test]
    fn stock_flags_partition_the_range() {
        for stock in [0, 1, 5, 10, 11, 500] {
            let low = is_low_stock(stock);
            let out = is_out_of_stock(stock);
            assert!(!(low && out), "{stock}");
            assert_eq!(out, stock == 0);
            assert_eq!(low, stock > 0 && stock <= 10);
        }
    }

    #[test]
    fn product_serialization_carries_derived_fields() {
        let origin = origin();
        let media = MediaUrls::new(&origin, "/media/");
        let product = DashboardProduct::from_listing(listing(7), &media);
        let value = serde_json::to_value(&product).unwrap();

        assert_eq!(value["image"], "http://shop.test/media/products/mug.jpg");
        assert_eq!(value["category"], 3);
        assert_eq!(value["is_low_stock"], true);
        assert_eq!(value["is_out_of_stock"], false);
        assert!(value["average_rating"].is_null());
        assert_eq!(value["unit_price"], "9.99");
    }

    #[test]
    fn media_resolution_handles_prefixes_and_absolute_urls() {
        let origin = origin();
        let media = MediaUrls::new(&origin, "/media/");
        assert_eq!(
            media.resolve(Some("/media/a.png")).as_deref(),
            Some("http://shop.test/media/a.png")
        );
        assert_eq!(
            media.resolve(Some("https://cdn.test/a.png")).as_deref(),
            Some("https://cdn.test/a.png")
        );
        assert_eq!(media.resolve(Some("  ")), None);
        assert_eq!(media.resolve(None), None);
    }

    #[test]
    fn display_name_falls_back_in_order() {
        assert_eq!(display_name(true, Some("Ada"), None, Some("ada@x.io")), "Ada");
        assert_eq!(display_name(true, Some("Ada"), Some("Lovelace"), None), "Ada Lovelace");
        assert_eq!(display_name(true, Some(""), Some(""), Some("ada@x.io")), "ada@x.io");
        assert_eq!(display_name(false, None, None, None), "Anonymous User");
    }
}
