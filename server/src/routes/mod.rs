//! HTTP handlers, one module per resource.

use std::sync::Arc;

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::state::AppState;

mod cart;
mod messages;
mod meta;
mod notifications;
mod orders;
mod products;
mod session;
mod suppliers;

pub fn api() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(meta::root))
        .route("/health", get(meta::health))
        .route("/api/vendors", get(meta::vendors))
        .route("/api/items", get(meta::list_items).post(meta::create_item))
        // Session
        .route(
            "/api/session",
            post(session::login)
                .get(session::current)
                .patch(session::update)
                .delete(session::logout),
        )
        // Catalog
        .route("/api/products", get(products::browse).post(products::create))
        .route(
            "/api/products/{id}",
            get(products::get)
                .patch(products::update)
                .delete(products::delete),
        )
        .route("/api/products/{id}/ratings", post(products::rate))
        // Cart
        .route("/api/cart", get(cart::get).delete(cart::clear))
        .route("/api/cart/items", post(cart::add))
        .route(
            "/api/cart/items/{product_id}",
            put(cart::set_quantity).delete(cart::remove),
        )
        .route("/api/cart/checkout", post(cart::checkout))
        // Orders
        .route("/api/orders", get(orders::list))
        .route("/api/orders/{id}", get(orders::get))
        .route("/api/orders/{id}/status", patch(orders::transition))
        // Messages
        .route("/api/messages", get(messages::list).post(messages::send))
        .route("/api/messages/conversations", get(messages::conversations))
        .route("/api/messages/{id}/read", post(messages::mark_read))
        // Notifications
        .route("/api/notifications", get(notifications::list))
        .route(
            "/api/notifications/{id}/read",
            post(notifications::mark_read),
        )
        .route(
            "/api/notifications/{id}",
            axum::routing::delete(notifications::remove),
        )
        // Suppliers
        .route("/api/suppliers/ratings", post(suppliers::rate))
        .route("/api/suppliers/{id}/rating", get(suppliers::rating))
        .route("/api/suppliers/{id}/summary", get(suppliers::summary))
        .route("/api/suppliers/{id}/products", get(suppliers::products))
}
