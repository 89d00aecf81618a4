use mandi_api_integration::harness::{expect_error, expect_json, TestHarness};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Asha buys from both Ravi and Green Valley; returns the two order ids.
async fn place_split_order(h: &TestHarness) -> (String, String) {
    let onions = h.product_id("Fresh Red Onions").await;
    let tomatoes = h.product_id("Fresh Tomatoes").await;
    let masala = h.product_id("Garam Masala Powder").await;
    h.asha.add_to_cart(&onions, 50).await;
    h.asha.add_to_cart(&tomatoes, 10).await;
    h.asha.add_to_cart(&masala, 2).await;

    let orders = h.asha.checkout().await;
    assert_eq!(orders.len(), 2);
    (
        orders[0]["id"].as_str().unwrap().to_string(),
        orders[1]["id"].as_str().unwrap().to_string(),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn checkout_creates_one_order_per_supplier() {
    let h = TestHarness::setup().await;
    let (ravi_order, valley_order) = place_split_order(&h).await;

    let ravi_orders: Vec<Value> = expect_json(h.ravi.get("/api/orders").await, StatusCode::OK).await;
    assert_eq!(ravi_orders.len(), 1);
    assert_eq!(ravi_orders[0]["id"], ravi_order.as_str());
    assert_eq!(ravi_orders[0]["items"].as_array().unwrap().len(), 2);
    assert_eq!(ravi_orders[0]["total_paise"], 142_500 + 36_000);
    assert_eq!(ravi_orders[0]["status"], "pending");
    assert_eq!(ravi_orders[0]["delivery_address"], "Marina Beach Road, Chennai");
    assert_eq!(ravi_orders[0]["delivery_time"], "06:30");

    let valley_orders: Vec<Value> =
        expect_json(h.green_valley.get("/api/orders").await, StatusCode::OK).await;
    assert_eq!(valley_orders[0]["id"], valley_order.as_str());

    let mine: Vec<Value> = expect_json(h.asha.get("/api/orders").await, StatusCode::OK).await;
    assert_eq!(mine.len(), 2);

    let cart: Value = expect_json(h.asha.get("/api/cart").await, StatusCode::OK).await;
    assert_eq!(cart["total_items"], 0);

    let session: Value = expect_json(h.asha.get("/api/session").await, StatusCode::OK).await;
    assert_eq!(session["loyalty_points"], 10);

    let (unread, notes) = h.ravi.inbox().await;
    assert_eq!(unread, 1);
    assert_eq!(notes[0]["title"], "New Order Received");
    assert_eq!(notes[0]["message"], "New order from Asha Chaat for ₹1785.00");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn checkout_enforces_minimum_order() {
    let h = TestHarness::setup().await;
    let potatoes = h.product_id("Premium Potatoes").await;
    h.asha.add_to_cart(&potatoes, 4).await;

    let resp = h
        .asha
        .post("/api/cart/checkout", json!({"delivery_mode": "online"}))
        .await;
    let err = expect_error(resp, StatusCode::BAD_REQUEST).await;
    assert!(err.contains("minimum order of 10"));

    let empty = h
        .meena
        .post("/api/cart/checkout", json!({"delivery_mode": "offline"}))
        .await;
    assert_eq!(expect_error(empty, StatusCode::BAD_REQUEST).await, "cart is empty");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn order_lifecycle_with_vendor_notifications() {
    let h = TestHarness::setup().await;
    let (ravi_order, valley_order) = place_split_order(&h).await;

    // Only the order's own supplier may accept it.
    let resp = h.green_valley.set_order_status(&ravi_order, "accepted").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = h.asha.set_order_status(&ravi_order, "accepted").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let skip = h.ravi.set_order_status(&ravi_order, "completed").await;
    assert_eq!(skip.status(), StatusCode::FORBIDDEN);
    let skip = h.ravi.set_order_status(&ravi_order, "delivered").await;
    assert_eq!(skip.status(), StatusCode::CONFLICT);

    let accepted: Value =
        expect_json(h.ravi.set_order_status(&ravi_order, "accepted").await, StatusCode::OK).await;
    assert_eq!(accepted["status"], "accepted");
    expect_json::<Value>(h.ravi.set_order_status(&ravi_order, "delivered").await, StatusCode::OK)
        .await;
    let completed: Value =
        expect_json(h.asha.set_order_status(&ravi_order, "completed").await, StatusCode::OK).await;
    assert_eq!(completed["status"], "completed");

    let rejected: Value = expect_json(
        h.green_valley.set_order_status(&valley_order, "rejected").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(rejected["status"], "rejected");
    let again = h.green_valley.set_order_status(&valley_order, "accepted").await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let (unread, notes) = h.asha.inbox().await;
    assert_eq!(unread, 3);
    let kinds: Vec<&str> = notes.iter().map(|n| n["kind"].as_str().unwrap()).collect();
    assert_eq!(kinds, ["error", "success", "success"]);
    assert_eq!(notes[0]["message"], "Your order has been rejected");

    let filtered: Vec<Value> =
        expect_json(h.asha.get("/api/orders?status=completed").await, StatusCode::OK).await;
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["id"], ravi_order.as_str());

    let snooping = h.meena.get(&format!("/api/orders/{ravi_order}")).await;
    assert_eq!(snooping.status(), StatusCode::FORBIDDEN);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn suppliers_are_rated_once_per_fulfilled_order() {
    let h = TestHarness::setup().await;
    let (ravi_order, _) = place_split_order(&h).await;
    let rate = |stars: u8| json!({"order_id": ravi_order, "rating": stars, "comment": "on time"});

    let early = h.asha.post("/api/suppliers/ratings", rate(5)).await;
    assert_eq!(early.status(), StatusCode::CONFLICT);

    h.ravi.set_order_status(&ravi_order, "accepted").await;
    h.ravi.set_order_status(&ravi_order, "delivered").await;

    let stranger = h.meena.post("/api/suppliers/ratings", rate(1)).await;
    assert_eq!(stranger.status(), StatusCode::FORBIDDEN);

    let rating: Value =
        expect_json(h.asha.post("/api/suppliers/ratings", rate(4)).await, StatusCode::CREATED).await;
    assert_eq!(rating["supplier_id"], "supplier1");
    assert_eq!(rating["vendor_name"], "Asha Chaat");

    let twice = h.asha.post("/api/suppliers/ratings", rate(5)).await;
    assert_eq!(twice.status(), StatusCode::CONFLICT);

    let view: Value =
        expect_json(h.anonymous.get("/api/suppliers/supplier1/rating").await, StatusCode::OK).await;
    assert_eq!(view["rating"], 4.0);
    assert_eq!(view["ratings"].as_array().unwrap().len(), 1);

    let unrated: Value =
        expect_json(h.anonymous.get("/api/suppliers/supplier3/rating").await, StatusCode::OK).await;
    assert_eq!(unrated["rating"], 4.5);

    let summary: Value =
        expect_json(h.ravi.get("/api/suppliers/supplier1/summary").await, StatusCode::OK).await;
    assert_eq!(summary["product_count"], 2);
    assert_eq!(summary["rating_count"], 1);
    assert_eq!(summary["average_rating"], 4.0);

    let onions: Value = expect_json(
        h.asha
            .get(&format!("/api/products/{}", h.product_id("Fresh Red Onions").await))
            .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(onions["supplier_rating"], 4.0);
}
