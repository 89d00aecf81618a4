use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use mandi_common::order::{Order, OrderId, OrderStatus};
use serde::Deserialize;

use crate::error::AppError;
use crate::extract::{Actor, Body, Params, PathParam};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct OrderFilter {
    #[serde(default)]
    status: Option<OrderStatus>,
}

#[derive(Deserialize)]
pub struct StatusChange {
    status: OrderStatus,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
    Params(filter): Params<OrderFilter>,
) -> Result<Json<Vec<Order>>, AppError> {
    let market = state.read().await;
    let orders = market.orders_for(&user, filter.status)?;
    Ok(Json(orders.into_iter().cloned().collect()))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
    PathParam(id): PathParam<OrderId>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.read().await.order(&user, &id)?.clone()))
}

pub async fn transition(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
    PathParam(id): PathParam<OrderId>,
    Body(change): Body<StatusChange>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .mutate(|m| m.transition_order(&user, &id, change.status, Utc::now()).cloned())
        .await?;
    tracing::info!(order = %order.id, status = %order.status, by = %user, "Order updated");
    Ok(Json(order))
}
