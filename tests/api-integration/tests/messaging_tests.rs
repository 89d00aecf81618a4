use mandi_api_integration::harness::{expect_json, TestHarness};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn vendors_and_suppliers_chat() {
    let h = TestHarness::setup().await;

    let sent: Value = expect_json(
        h.asha
            .post(
                "/api/messages",
                json!({"to_id": "supplier1", "to_name": "Ravi Vegetable Mart", "body": "Onions at 6am?"}),
            )
            .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(sent["from_name"], "Asha Chaat");
    assert_eq!(sent["read"], false);

    expect_json::<Value>(
        h.ravi
            .post(
                "/api/messages",
                json!({"to_id": "vendor-asha", "to_name": "Asha Chaat", "body": "Yes, ready by 5:45"}),
            )
            .await,
        StatusCode::CREATED,
    )
    .await;
    expect_json::<Value>(
        h.meena
            .post(
                "/api/messages",
                json!({"to_id": "supplier1", "to_name": "Ravi Vegetable Mart", "body": "Need 20kg onions"}),
            )
            .await,
        StatusCode::CREATED,
    )
    .await;

    let threads: Vec<Value> =
        expect_json(h.ravi.get("/api/messages/conversations").await, StatusCode::OK).await;
    assert_eq!(threads.len(), 2);
    assert_eq!(threads[0]["contact_id"], "vendor-meena");
    assert_eq!(threads[0]["unread"], 1);
    assert_eq!(threads[1]["messages"].as_array().unwrap().len(), 2);

    let (unread, notes) = h.ravi.inbox().await;
    assert_eq!(unread, 2);
    assert_eq!(notes[0]["message"], "New message from Meena Dosa Cart");

    let id = sent["id"].as_str().unwrap();
    let wrong = h.asha.post(&format!("/api/messages/{id}/read"), json!({})).await;
    assert_eq!(wrong.status(), StatusCode::FORBIDDEN);
    let read: Value = expect_json(
        h.ravi.post(&format!("/api/messages/{id}/read"), json!({})).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(read["read"], true);

    let mine: Vec<Value> = expect_json(h.asha.get("/api/messages").await, StatusCode::OK).await;
    assert_eq!(mine.len(), 2);

    let blank = h
        .asha
        .post("/api/messages", json!({"to_id": "supplier1", "to_name": "Ravi", "body": "  "}))
        .await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn notifications_can_be_read_and_dismissed() {
    let h = TestHarness::setup().await;
    h.asha
        .post(
            "/api/messages",
            json!({"to_id": "supplier3", "to_name": "Green Valley Farms", "body": "Tomato price?"}),
        )
        .await;

    let (unread, notes) = h.green_valley.inbox().await;
    assert_eq!(unread, 1);
    let id = notes[0]["id"].as_str().unwrap().to_string();

    let foreign = h.asha.post(&format!("/api/notifications/{id}/read"), json!({})).await;
    assert_eq!(foreign.status(), StatusCode::FORBIDDEN);

    let resp = h
        .green_valley
        .post(&format!("/api/notifications/{id}/read"), json!({}))
        .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(h.green_valley.inbox().await.0, 0);

    let resp = h.green_valley.delete(&format!("/api/notifications/{id}")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(h.green_valley.inbox().await.1.is_empty());

    let resp = h.green_valley.delete(&format!("/api/notifications/{id}")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
