use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use mandi_common::notification::{Notification, NotificationId};
use serde::Serialize;

use crate::error::AppError;
use crate::extract::{Actor, PathParam};
use crate::state::AppState;

#[derive(Serialize)]
pub struct InboxView {
    unread: usize,
    notifications: Vec<Notification>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
) -> Result<Json<InboxView>, AppError> {
    let market = state.read().await;
    market.session(&user)?;
    Ok(Json(InboxView {
        unread: market.unread_count(&user),
        notifications: market.notifications_for(&user).into_iter().cloned().collect(),
    }))
}

pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
    PathParam(id): PathParam<NotificationId>,
) -> Result<StatusCode, AppError> {
    state
        .mutate(|m| m.mark_notification_read(&user, &id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
    PathParam(id): PathParam<NotificationId>,
) -> Result<StatusCode, AppError> {
    state.mutate(|m| m.remove_notification(&user, &id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
