use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use mandi_common::cart::PricedCart;
use mandi_common::order::{CheckoutDetails, Order};
use mandi_common::product::ProductId;
use serde::Deserialize;

use crate::error::AppError;
use crate::extract::{Actor, Body, PathParam};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AddLine {
    product_id: ProductId,
    quantity: u32,
}

#[derive(Deserialize)]
pub struct SetQuantity {
    quantity: u32,
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
) -> Result<Json<PricedCart>, AppError> {
    Ok(Json(state.read().await.cart(&user)?))
}

pub async fn add(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
    Body(line): Body<AddLine>,
) -> Result<Json<PricedCart>, AppError> {
    let cart = state
        .mutate(|m| m.add_to_cart(&user, line.product_id, line.quantity))
        .await?;
    Ok(Json(cart))
}

pub async fn set_quantity(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
    PathParam(product_id): PathParam<ProductId>,
    Body(req): Body<SetQuantity>,
) -> Result<Json<PricedCart>, AppError> {
    let cart = state
        .mutate(|m| m.set_cart_quantity(&user, &product_id, req.quantity))
        .await?;
    Ok(Json(cart))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
    PathParam(product_id): PathParam<ProductId>,
) -> Result<Json<PricedCart>, AppError> {
    let cart = state
        .mutate(|m| m.remove_from_cart(&user, &product_id))
        .await?;
    Ok(Json(cart))
}

pub async fn clear(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
) -> Result<StatusCode, AppError> {
    state.mutate(|m| m.clear_cart(&user)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn checkout(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
    Body(details): Body<CheckoutDetails>,
) -> Result<(StatusCode, Json<Vec<Order>>), AppError> {
    let orders = state
        .mutate(|m| m.checkout(&user, details, Utc::now()))
        .await?;
    for order in &orders {
        tracing::info!(
            order = %order.id,
            vendor = %order.vendor_id,
            supplier = %order.supplier_id,
            total_paise = order.total_paise,
            "Order placed"
        );
    }
    Ok((StatusCode::CREATED, Json(orders)))
}
