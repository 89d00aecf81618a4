use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use mandi_common::demo::demo_marketplace;
use mandi_common::identity::UserId;
use mandi_common::product::Product;
use mandi_server::items::ItemStore;
use mandi_server::state::default_vendors;
use mandi_server::{serve, AppState};

use crate::make_user;

/// A running server bound to an ephemeral local port.
pub struct TestServer {
    pub base: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Boot the router around `state`.
    pub async fn start(state: Arc<AppState>) -> Self {
        tracing_subscriber::fmt::try_init().ok();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let shutdown = async move {
                rx.await.ok();
            };
            if let Err(e) = serve(listener, state, shutdown).await {
                tracing::error!("test server failed: {e}");
            }
        });

        Self {
            base: format!("http://{addr}"),
            shutdown: Some(tx),
        }
    }

    /// Boot a server holding the demo catalog.
    pub async fn demo() -> Self {
        let market = demo_marketplace(Utc::now()).unwrap();
        let state = AppState::new(
            market,
            ItemStore::in_memory(),
            default_vendors().unwrap(),
            None,
        );
        Self::start(state).await
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
    }
}

/// Someone talking to the API as a given user.
pub struct Participant {
    pub id: UserId,
    pub name: String,
    base: String,
    client: Client,
}

impl Participant {
    fn new(server: &TestServer, id: &str, name: &str) -> Self {
        Self {
            id: UserId::from(id),
            name: name.to_string(),
            base: server.base.clone(),
            client: Client::new(),
        }
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base))
            .header("X-User-Id", &self.id.0)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.request(Method::GET, path).send().await.unwrap()
    }

    pub async fn post(&self, path: &str, body: Value) -> Response {
        self.request(Method::POST, path)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn put(&self, path: &str, body: Value) -> Response {
        self.request(Method::PUT, path)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn patch(&self, path: &str, body: Value) -> Response {
        self.request(Method::PATCH, path)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.request(Method::DELETE, path).send().await.unwrap()
    }

    /// Log in with `role`, building a profile from the participant's name.
    pub async fn login(&self, role: &str, address: &str) -> Value {
        let user = make_user(&self.id.0, &self.name, address);
        let resp = self
            .post("/api/session", json!({ "user": user, "role": role }))
            .await;
        expect_json(resp, StatusCode::OK).await
    }

    /// Add `quantity` of `product_id` to this vendor's cart.
    pub async fn add_to_cart(&self, product_id: &str, quantity: u32) -> Value {
        let resp = self
            .post(
                "/api/cart/items",
                json!({ "product_id": product_id, "quantity": quantity }),
            )
            .await;
        expect_json(resp, StatusCode::OK).await
    }

    /// Check out with home delivery and return the placed orders.
    pub async fn checkout(&self) -> Vec<Value> {
        let resp = self
            .post(
                "/api/cart/checkout",
                json!({ "delivery_mode": "online", "requested_time": "06:30" }),
            )
            .await;
        expect_json(resp, StatusCode::CREATED).await
    }

    pub async fn set_order_status(&self, order_id: &str, status: &str) -> Response {
        self.patch(
            &format!("/api/orders/{order_id}/status"),
            json!({ "status": status }),
        )
        .await
    }

    /// The participant's notifications as `(unread, list)`.
    pub async fn inbox(&self) -> (u64, Vec<Value>) {
        let body: Value = expect_json(self.get("/api/notifications").await, StatusCode::OK).await;
        let unread = body["unread"].as_u64().unwrap();
        let list = body["notifications"].as_array().cloned().unwrap_or_default();
        (unread, list)
    }
}

/// Assert the status and decode the body.
pub async fn expect_json<T: DeserializeOwned>(resp: Response, status: StatusCode) -> T {
    let actual = resp.status();
    let text = resp.text().await.unwrap();
    assert_eq!(actual, status, "unexpected status, body: {text}");
    serde_json::from_str(&text).unwrap()
}

/// Assert an error status and return the `error` message.
pub async fn expect_error(resp: Response, status: StatusCode) -> String {
    let body: Value = expect_json(resp, status).await;
    body["error"].as_str().unwrap().to_string()
}

/// Demo server plus named participants, all logged in:
/// two vendors (Asha, Meena) and two demo suppliers (Ravi, Green Valley).
pub struct TestHarness {
    pub server: TestServer,
    pub asha: Participant,
    pub meena: Participant,
    pub ravi: Participant,
    pub green_valley: Participant,
    pub anonymous: Participant,
}

impl TestHarness {
    pub async fn setup() -> Self {
        let server = TestServer::demo().await;

        let asha = Participant::new(&server, "vendor-asha", "Asha Chaat");
        let meena = Participant::new(&server, "vendor-meena", "Meena Dosa Cart");
        let ravi = Participant::new(&server, "supplier1", "Ravi Vegetable Mart");
        let green_valley = Participant::new(&server, "supplier3", "Green Valley Farms");
        let anonymous = Participant::new(&server, "nobody", "Nobody");

        asha.login("vendor", "Marina Beach Road, Chennai").await;
        meena.login("vendor", "Besant Nagar, Chennai").await;
        ravi.login("supplier", "Koyambedu Market, Chennai").await;
        green_valley.login("supplier", "Red Hills, Chennai").await;

        Self {
            server,
            asha,
            meena,
            ravi,
            green_valley,
            anonymous,
        }
    }

    /// Current catalog, cheapest first.
    pub async fn products(&self) -> Vec<Product> {
        let resp = self.asha.get("/api/products?sort=price").await;
        expect_json(resp, StatusCode::OK).await
    }

    /// Id of the catalog product called `name`.
    pub async fn product_id(&self, name: &str) -> String {
        self.products()
            .await
            .into_iter()
            .find(|p| p.name == name)
            .map(|p| p.id.0)
            .unwrap_or_else(|| panic!("no product named {name}"))
    }
}
