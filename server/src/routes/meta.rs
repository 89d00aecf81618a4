use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use mandi_common::marketplace::MarketStats;
use mandi_common::vendor::VendorListing;
use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;
use crate::extract::Body;
use crate::state::AppState;

pub async fn root() -> &'static str {
    "✅ Welcome to Street Food Vendor API – backend is running."
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    #[serde(flatten)]
    stats: MarketStats,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        stats: state.read().await.stats(),
    })
}

pub async fn vendors(State(state): State<Arc<AppState>>) -> Json<Vec<VendorListing>> {
    Json(state.vendors.clone())
}

pub async fn list_items(State(state): State<Arc<AppState>>) -> Json<Vec<Value>> {
    Json(state.items.list().await)
}

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Body(doc): Body<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let saved = state.items.insert(doc).await?;
    tracing::debug!(id = %saved["_id"], "Item stored");
    Ok((StatusCode::CREATED, Json(saved)))
}
