use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use mandi_common::identity::{User, UserPatch, UserRole};
use mandi_common::session::Session;
use serde::Deserialize;

use crate::error::AppError;
use crate::extract::{Actor, Body};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    user: User,
    role: UserRole,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Body(req): Body<LoginRequest>,
) -> Result<Json<Session>, AppError> {
    if req.user.id.0.trim().is_empty() {
        return Err(AppError::BadRequest("user id is required".into()));
    }
    let session = state
        .mutate(|m| Ok(m.login(req.user, req.role, Utc::now()).clone()))
        .await?;
    tracing::info!(user = %session.user.id, role = %session.role, "Logged in");
    Ok(Json(session))
}

pub async fn current(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
) -> Result<Json<Session>, AppError> {
    Ok(Json(state.read().await.session(&user)?.clone()))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
    Body(patch): Body<UserPatch>,
) -> Result<Json<Session>, AppError> {
    let session = state
        .mutate(|m| m.update_user(&user, patch).cloned())
        .await?;
    Ok(Json(session))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
) -> Result<StatusCode, AppError> {
    state.mutate(|m| m.logout(&user)).await?;
    tracing::info!(%user, "Logged out");
    Ok(StatusCode::NO_CONTENT)
}
