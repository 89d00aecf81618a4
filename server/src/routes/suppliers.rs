use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use mandi_common::identity::UserId;
use mandi_common::product::Product;
use mandi_common::rating::{SupplierRating, SupplierRatingDraft, SupplierSummary};
use serde::Serialize;

use crate::error::AppError;
use crate::extract::{Actor, Body, PathParam};
use crate::state::AppState;

#[derive(Serialize)]
pub struct RatingView {
    supplier_id: UserId,
    rating: f64,
    ratings: Vec<SupplierRating>,
}

pub async fn rating(
    State(state): State<Arc<AppState>>,
    PathParam(supplier): PathParam<UserId>,
) -> Json<RatingView> {
    let market = state.read().await;
    Json(RatingView {
        rating: market.supplier_rating(&supplier),
        ratings: market.supplier_ratings(&supplier).into_iter().cloned().collect(),
        supplier_id: supplier,
    })
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    PathParam(supplier): PathParam<UserId>,
) -> Json<SupplierSummary> {
    Json(state.read().await.supplier_summary(&supplier))
}

pub async fn products(
    State(state): State<Arc<AppState>>,
    PathParam(supplier): PathParam<UserId>,
) -> Json<Vec<Product>> {
    let market = state.read().await;
    Json(
        market
            .products_by_supplier(&supplier)
            .into_iter()
            .cloned()
            .collect(),
    )
}

pub async fn rate(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
    Body(draft): Body<SupplierRatingDraft>,
) -> Result<(StatusCode, Json<SupplierRating>), AppError> {
    let rating = state
        .mutate(|m| m.rate_supplier(&user, draft, Utc::now()).cloned())
        .await?;
    tracing::info!(
        supplier = %rating.supplier_id,
        order = %rating.order_id,
        stars = rating.rating,
        "Supplier rated"
    );
    Ok((StatusCode::CREATED, Json(rating)))
}
