use mandi_api_integration::harness::{expect_error, expect_json, TestHarness};
use mandi_common::product::Product;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn names(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.name.as_str()).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn browse_filters_and_sorts() {
    let h = TestHarness::setup().await;

    let nearest: Vec<Product> = expect_json(h.asha.get("/api/products").await, StatusCode::OK).await;
    assert_eq!(nearest.len(), 4);
    assert_eq!(nearest.last().unwrap().name, "Fresh Tomatoes");

    let spices: Vec<Product> =
        expect_json(h.asha.get("/api/products?category=Spices").await, StatusCode::OK).await;
    assert_eq!(names(&spices), ["Garam Masala Powder"]);

    let pickup: Vec<Product> =
        expect_json(h.asha.get("/api/products?delivery=offline").await, StatusCode::OK).await;
    assert!(!names(&pickup).contains(&"Premium Potatoes"));

    let search: Vec<Product> = expect_json(
        h.asha.get("/api/products?search=green%20valley").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(names(&search), ["Fresh Tomatoes"]);

    let best: Vec<Product> =
        expect_json(h.asha.get("/api/products?sort=rating").await, StatusCode::OK).await;
    assert_eq!(best[0].name, "Fresh Tomatoes");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn suppliers_list_and_edit_their_products() {
    let h = TestHarness::setup().await;

    let draft = json!({
        "name": "Curry Leaves",
        "category": "Vegetables",
        "price_paise": 4000,
        "unit": "bunch",
        "stock": 80,
        "distance_km": 1.2,
        "delivery_modes": ["online", "offline"],
        "min_order": 2,
        "bulk_discounts": [{"min_quantity": 40, "percent": 10.0}, {"min_quantity": 20, "percent": 5.0}]
    });
    let created: Product =
        expect_json(h.ravi.post("/api/products", draft.clone()).await, StatusCode::CREATED).await;
    assert_eq!(created.supplier_name, "Ravi Vegetable Mart");
    assert_eq!(created.bulk_discounts[0].min_quantity, 20);

    let forbidden = expect_error(h.asha.post("/api/products", draft).await, StatusCode::FORBIDDEN).await;
    assert!(forbidden.contains("supplier"));

    let path = format!("/api/products/{}", created.id);
    let edited: Product =
        expect_json(h.ravi.patch(&path, json!({"stock": 60})).await, StatusCode::OK).await;
    assert_eq!(edited.stock, 60);

    let theirs = expect_error(
        h.green_valley.patch(&path, json!({"stock": 0})).await,
        StatusCode::FORBIDDEN,
    )
    .await;
    assert!(theirs.contains("does not own"));

    let bad_tier = h
        .ravi
        .patch(&path, json!({"bulk_discounts": [{"min_quantity": 10, "percent": 150.0}]}))
        .await;
    assert_eq!(bad_tier.status(), StatusCode::BAD_REQUEST);

    let mine: Vec<Product> =
        expect_json(h.asha.get("/api/suppliers/supplier1/products").await, StatusCode::OK).await;
    assert_eq!(mine.len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn deleted_products_leave_carts() {
    let h = TestHarness::setup().await;
    let onions = h.product_id("Fresh Red Onions").await;
    let masala = h.product_id("Garam Masala Powder").await;
    h.asha.add_to_cart(&onions, 5).await;
    h.asha.add_to_cart(&masala, 1).await;

    let resp = h.ravi.delete(&format!("/api/products/{onions}")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let cart: Value = expect_json(h.asha.get("/api/cart").await, StatusCode::OK).await;
    assert_eq!(cart["lines"].as_array().unwrap().len(), 1);
    assert_eq!(cart["total_paise"], 18_000);

    let gone = h.asha.get(&format!("/api/products/{onions}")).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cart_pricing_applies_bulk_discounts() {
    let h = TestHarness::setup().await;
    let tomatoes = h.product_id("Fresh Tomatoes").await;

    let cart = h.asha.add_to_cart(&tomatoes, 20).await;
    assert_eq!(cart["lines"][0]["discount_percent"], 0.0);
    assert_eq!(cart["total_paise"], 20 * 3500);

    let cart: Value = expect_json(
        h.asha
            .put(&format!("/api/cart/items/{tomatoes}"), json!({"quantity": 25}))
            .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(cart["lines"][0]["discount_percent"], 8.0);
    assert_eq!(cart["lines"][0]["unit_price_paise"], 3220);
    assert_eq!(cart["total_paise"], 25 * 3220);

    let cart: Value = expect_json(
        h.asha.delete(&format!("/api/cart/items/{tomatoes}")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(cart["total_items"], 0);

    let missing = h
        .asha
        .put(&format!("/api/cart/items/{tomatoes}"), json!({"quantity": 3}))
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn oversized_prices_and_totals_are_refused() {
    let h = TestHarness::setup().await;
    let masala = h.product_id("Garam Masala Powder").await;
    let path = format!("/api/products/{masala}");

    let err = expect_error(
        h.ravi.patch(&path, json!({"price_paise": 10_000_000_001u64})).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(err, "price is too large");

    let _: Product = expect_json(
        h.ravi.patch(&path, json!({"price_paise": 10_000_000_000u64})).await,
        StatusCode::OK,
    )
    .await;

    let err = expect_error(
        h.asha
            .post(
                "/api/cart/items",
                json!({"product_id": masala, "quantity": 4_000_000_000u32}),
            )
            .await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(err, "line total is too large");

    let cart: Value = expect_json(h.asha.get("/api/cart").await, StatusCode::OK).await;
    assert_eq!(cart["total_items"], 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn product_reviews_are_averaged() {
    let h = TestHarness::setup().await;
    let masala = h.product_id("Garam Masala Powder").await;
    let path = format!("/api/products/{masala}/ratings");

    expect_json::<Product>(
        h.asha.post(&path, json!({"rating": 5, "comment": "fragrant"})).await,
        StatusCode::CREATED,
    )
    .await;
    let rated: Product =
        expect_json(h.meena.post(&path, json!({"rating": 4})).await, StatusCode::CREATED).await;
    assert_eq!(rated.ratings.len(), 2);
    assert_eq!(rated.average_rating, Some(4.5));

    let out_of_range = h.asha.post(&path, json!({"rating": 0})).await;
    assert_eq!(out_of_range.status(), StatusCode::BAD_REQUEST);
}
