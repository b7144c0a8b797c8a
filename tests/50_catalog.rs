mod common;

use anyhow::Result;
use axum::{http::StatusCode, Router};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn category(pool: &PgPool, name: &str) -> Result<i64> {
    let (id,): (i64,) = sqlx::query_as("INSERT INTO categories (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn product(pool: &PgPool, title: &str, stock: i32, category_id: i64) -> Result<i64> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO products (title, unit_price, stock, category_id) VALUES ($1, 9.99, $2, $3) RETURNING id",
    )
    .bind(title)
    .bind(stock)
    .bind(category_id)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn stock_of(pool: &PgPool, id: i64) -> Result<i32> {
    let (stock,): (i32,) = sqlx::query_as("SELECT stock FROM products WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(stock)
}

struct Staff {
    app: Router,
    token: String,
}

impl Staff {
    async fn new(pool: &PgPool) -> Result<Self> {
        Ok(Self {
            token: common::staff_token(pool).await?,
            app: common::db_app(pool.clone()),
        })
    }

    async fn get(&self, uri: &str) -> Result<common::TestResponse> {
        common::send_to(self.app.clone(), common::get(uri, Some(&self.token))?).await
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> Result<common::TestResponse> {
        let request = match body {
            Some(body) => common::with_json(method, uri, Some(&self.token), &body)?,
            None => common::request(method, uri, Some(&self.token))?,
        };
        common::send_to(self.app.clone(), request).await
    }
}

fn result_stocks(body: &Value) -> Vec<i64> {
    let mut stocks: Vec<i64> = body["data"]["results"]
        .as_array()
        .map(|rows| rows.iter().filter_map(|row| row["stock"].as_i64()).collect())
        .unwrap_or_default();
    stocks.sort_unstable();
    stocks
}

#[sqlx::test(migrations = "./migrations")]
async fn bulk_update_with_unknown_id_changes_nothing(pool: PgPool) -> Result<()> {
    let kitchen = category(&pool, "Kitchen").await?;
    let first = product(&pool, "Mug", 5, kitchen).await?;
    let second = product(&pool, "Bowl", 7, kitchen).await?;
    let staff = Staff::new(&pool).await?;

    let res = staff
        .send(
            "POST",
            "/dashboard/products/bulk-update",
            Some(json!({"product_ids": [first, second, 999], "updates": {"stock": 50}})),
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let body = res.json()?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["product_ids"], "Products with IDs [999] do not exist");

    assert_eq!(stock_of(&pool, first).await?, 5);
    assert_eq!(stock_of(&pool, second).await?, 7);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn bulk_update_rejects_fields_outside_the_allow_list(pool: PgPool) -> Result<()> {
    let kitchen = category(&pool, "Kitchen").await?;
    let mug = product(&pool, "Mug", 5, kitchen).await?;
    let staff = Staff::new(&pool).await?;

    let res = staff
        .send(
            "POST",
            "/dashboard/products/bulk-update",
            Some(json!({"product_ids": [mug], "updates": {"title": "Renamed", "stock": 1}})),
        )
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let message = res.json()?["field_errors"]["updates"].as_str().unwrap_or_default().to_string();
    assert!(message.contains("'title'"), "{message}");
    assert_eq!(stock_of(&pool, mug).await?, 5);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn bulk_update_applies_to_every_listed_product(pool: PgPool) -> Result<()> {
    let kitchen = category(&pool, "Kitchen").await?;
    let first = product(&pool, "Mug", 5, kitchen).await?;
    let second = product(&pool, "Bowl", 0, kitchen).await?;
    let untouched = product(&pool, "Plate", 2, kitchen).await?;
    let staff = Staff::new(&pool).await?;

    let res = staff
        .send(
            "POST",
            "/dashboard/products/bulk-update",
            Some(json!({"product_ids": [first, second], "updates": {"stock": 50}})),
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json()?;
    assert_eq!(body["data"]["updated_count"], 2);
    assert_eq!(body["data"]["message"], "Successfully updated 2 products");

    for id in [first, second] {
        let res = staff.get(&format!("/dashboard/products/{}", id)).await?;
        assert_eq!(res.json()?["data"]["stock"], 50);
    }
    assert_eq!(stock_of(&pool, untouched).await?, 2);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn category_with_products_cannot_be_deleted(pool: PgPool) -> Result<()> {
    let kitchen = category(&pool, "Kitchen").await?;
    let mug = product(&pool, "Mug", 5, kitchen).await?;
    let staff = Staff::new(&pool).await?;

    let uri = format!("/dashboard/categories/{}", kitchen);
    let res = staff.send("DELETE", &uri, None).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.json()?["field_errors"]["category"],
        "Cannot delete category with existing products"
    );

    let res = staff.get(&uri).await?;
    assert_eq!(res.json()?["data"]["product_count"], 1);

    let res = staff.send("DELETE", &format!("/dashboard/products/{}", mug), None).await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    let res = staff.send("DELETE", &uri, None).await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn page_past_the_end_keeps_the_true_count(pool: PgPool) -> Result<()> {
    let kitchen = category(&pool, "Kitchen").await?;
    for (title, stock) in [("Mug", 1), ("Bowl", 2), ("Plate", 3), ("Cup", 4)] {
        product(&pool, title, stock, kitchen).await?;
    }
    let staff = Staff::new(&pool).await?;

    let res = staff.get("/dashboard/products?page=9").await?;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json()?;
    assert_eq!(body["data"]["count"], 4);
    assert_eq!(body["data"]["results"], json!([]));
    assert_eq!(body["data"]["next"], Value::Null);
    assert_eq!(body["data"]["previous"], "http://localhost/dashboard/products");

    let res = staff.get("/dashboard/products?page=2&page_size=3").await?;
    let body = res.json()?;
    assert_eq!(body["data"]["count"], 4);
    assert_eq!(body["data"]["results"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn stock_filters_select_exactly_their_band(pool: PgPool) -> Result<()> {
    let kitchen = category(&pool, "Kitchen").await?;
    for (title, stock) in [("Empty", 0), ("Few", 3), ("Edge", 10), ("Plenty", 11)] {
        product(&pool, title, stock, kitchen).await?;
    }
    let staff = Staff::new(&pool).await?;

    let cases = [
        ("low_stock", vec![3, 10]),
        ("out_of_stock", vec![0]),
        ("in_stock", vec![3, 10, 11]),
        ("unknown", vec![0, 3, 10, 11]),
    ];
    for (status, expected) in cases {
        let res = staff.get(&format!("/dashboard/products?stock={}", status)).await?;
        assert_eq!(result_stocks(&res.json()?), expected, "{status}");
    }

    let res = staff.get("/dashboard/products?stock=low_stock").await?;
    for row in res.json()?["data"]["results"].as_array().cloned().unwrap_or_default() {
        assert_eq!(row["is_low_stock"], true);
        assert_eq!(row["is_out_of_stock"], false);
    }
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn search_matches_category_names(pool: PgPool) -> Result<()> {
    let kitchen = category(&pool, "Kitchenware").await?;
    let garden = category(&pool, "Garden").await?;
    product(&pool, "Mug", 5, kitchen).await?;
    product(&pool, "Rake", 5, garden).await?;
    let staff = Staff::new(&pool).await?;

    let res = staff.get("/dashboard/products?search=kitchen").await?;
    let body = res.json()?;
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["results"][0]["title"], "Mug");
    assert_eq!(body["data"]["results"][0]["category_name"], "Kitchenware");
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn review_authors_get_display_names(pool: PgPool) -> Result<()> {
    let kitchen = category(&pool, "Kitchen").await?;
    let mug = product(&pool, "Mug", 5, kitchen).await?;
    let staff = Staff::new(&pool).await?;

    sqlx::query(
        "INSERT INTO users (id, email, password_hash, first_name) VALUES \
         (100, 'ada@x.io', '-', 'Ada'), (101, 'bob@x.io', '-', '')",
    )
    .execute(&pool)
    .await?;
    sqlx::query(
        "INSERT INTO reviews (title, rating, user_id, product_id, created_at) VALUES \
         ('Great', 5, 100, $1, NOW() - INTERVAL '2 hours'), \
         ('Fine', 3, 101, $1, NOW() - INTERVAL '1 hour'), \
         ('Meh', 2, NULL, $1, NOW())",
    )
    .bind(mug)
    .execute(&pool)
    .await?;

    let res = staff.get("/dashboard/reviews").await?;
    let body = res.json()?;
    let names: Vec<&str> = body["data"]["results"]
        .as_array()
        .map(|rows| rows.iter().filter_map(|row| row["user_name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["Anonymous User", "bob@x.io", "Ada"]);

    let res = staff.get(&format!("/dashboard/products/{}", mug)).await?;
    let body = res.json()?;
    assert_eq!(body["data"]["review_count"], 3);
    assert_eq!(body["data"]["average_rating"], 3.33);

    let res = staff.get("/dashboard/reviews?rating=5").await?;
    assert_eq!(res.json()?["data"]["count"], 1);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn stats_aggregate_the_catalog(pool: PgPool) -> Result<()> {
    let kitchen = category(&pool, "Kitchen").await?;
    category(&pool, "Garden").await?;
    let mug = product(&pool, "Mug", 5, kitchen).await?;
    product(&pool, "Bowl", 0, kitchen).await?;
    sqlx::query("INSERT INTO reviews (title, rating, product_id) VALUES ('a', 4, $1), ('b', 5, $1)")
        .bind(mug)
        .execute(&pool)
        .await?;
    let staff = Staff::new(&pool).await?;

    let res = staff.get("/dashboard/stats").await?;
    assert_eq!(res.status, StatusCode::OK);
    let stats = &res.json()?["data"];
    assert_eq!(stats["total_products"], 2);
    assert_eq!(stats["total_categories"], 2);
    assert_eq!(stats["total_reviews"], 2);
    assert_eq!(stats["products_with_stock"], 1);
    assert_eq!(stats["products_out_of_stock"], 1);
    assert_eq!(stats["average_rating"], 4.5);
    assert_eq!(stats["recent_products"], 2);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn product_lifecycle_round_trips_through_the_api(pool: PgPool) -> Result<()> {
    let kitchen = category(&pool, "Kitchen").await?;
    let staff = Staff::new(&pool).await?;

    let res = staff
        .send(
            "POST",
            "/dashboard/products",
            Some(json!({"title": "Mug", "unit_price": "4.50", "stock": 8, "category": kitchen, "image": "products/mug.png"})),
        )
        .await?;
    assert_eq!(res.status, StatusCode::CREATED);
    let created = res.json()?["data"].clone();
    assert_eq!(created["is_low_stock"], true);
    assert_eq!(created["image"], "http://localhost/media/products/mug.png");
    let uri = format!("/dashboard/products/{}", created["id"]);

    let res = staff.send("PATCH", &uri, Some(json!({"stock": 0}))).await?;
    let patched = res.json()?["data"].clone();
    assert_eq!(patched["title"], "Mug");
    assert_eq!(patched["is_out_of_stock"], true);

    let res = staff.send("PATCH", &uri, Some(json!({"unit_price": 0}))).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = staff.send("DELETE", &uri, None).await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert_eq!(staff.get(&uri).await?.status, StatusCode::NOT_FOUND);
    Ok(())
}
