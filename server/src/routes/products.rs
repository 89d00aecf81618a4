use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use mandi_common::catalog::BrowseQuery;
use mandi_common::product::{Product, ProductDraft, ProductId, ProductPatch};
use serde::Deserialize;

use crate::error::AppError;
use crate::extract::{Actor, Body, Params, PathParam};
use crate::state::AppState;

pub async fn browse(
    State(state): State<Arc<AppState>>,
    Params(query): Params<BrowseQuery>,
) -> Json<Vec<Product>> {
    let market = state.read().await;
    Json(market.browse(&query).into_iter().cloned().collect())
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<ProductId>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.read().await.product(&id)?.clone()))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
    Body(draft): Body<ProductDraft>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state
        .mutate(|m| m.add_product(&user, draft, Utc::now()).cloned())
        .await?;
    tracing::info!(product = %product.id, supplier = %user, "Product listed");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
    PathParam(id): PathParam<ProductId>,
    Body(patch): Body<ProductPatch>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .mutate(|m| m.update_product(&user, &id, patch, Utc::now()).cloned())
        .await?;
    Ok(Json(product))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
    PathParam(id): PathParam<ProductId>,
) -> Result<StatusCode, AppError> {
    state.mutate(|m| m.delete_product(&user, &id)).await?;
    tracing::info!(product = %id, supplier = %user, "Product removed");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    rating: u8,
    #[serde(default)]
    comment: String,
}

pub async fn rate(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
    PathParam(id): PathParam<ProductId>,
    Body(review): Body<ReviewRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state
        .mutate(|m| {
            m.rate_product(&user, &id, review.rating, review.comment, Utc::now())
                .cloned()
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}
