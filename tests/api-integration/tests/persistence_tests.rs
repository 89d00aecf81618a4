use clap::Parser;
use mandi_api_integration::harness::{expect_json, TestServer};
use mandi_api_integration::make_user;
use mandi_server::{AppState, Cli};
use reqwest::StatusCode;
use serde_json::{json, Value};

fn cli(state_file: &str, items_file: &str) -> Cli {
    Cli::try_parse_from([
        "mandi-server",
        "--state-file",
        state_file,
        "--items-file",
        items_file,
    ])
    .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let state_file = dir.path().join("market.json").to_string_lossy().into_owned();
    let items_file = dir.path().join("items.json").to_string_lossy().into_owned();
    let client = reqwest::Client::new();

    {
        let server = TestServer::start(AppState::from_cli(&cli(&state_file, &items_file)).unwrap()).await;
        let user = make_user("supplier1", "Ravi Vegetable Mart", "Koyambedu Market, Chennai");
        let resp = client
            .post(server.url("/api/session"))
            .json(&json!({"user": user, "role": "supplier"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = client
            .post(server.url("/api/products"))
            .header("X-User-Id", "supplier1")
            .json(&json!({
                "name": "Shallots",
                "category": "Vegetables",
                "price_paise": 7000,
                "unit": "kg",
                "stock": 120,
                "delivery_modes": ["offline"]
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = client
            .post(server.url("/api/items"))
            .json(&json!({"note": "kept"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let server = TestServer::start(AppState::from_cli(&cli(&state_file, &items_file)).unwrap()).await;

    let health: Value = expect_json(
        client.get(server.url("/health")).send().await.unwrap(),
        StatusCode::OK,
    )
    .await;
    assert_eq!(health["products"], 5);
    assert_eq!(health["sessions"], 1);

    let items: Vec<Value> = expect_json(
        client.get(server.url("/api/items")).send().await.unwrap(),
        StatusCode::OK,
    )
    .await;
    assert_eq!(items[0]["note"], "kept");
}
