use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use mandi_common::message::{Conversation, Message, MessageDraft, MessageId};

use crate::error::AppError;
use crate::extract::{Actor, Body, PathParam};
use crate::state::AppState;

pub async fn list(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
) -> Result<Json<Vec<Message>>, AppError> {
    let market = state.read().await;
    market.session(&user)?;
    Ok(Json(
        market.messages_by_user(&user).into_iter().cloned().collect(),
    ))
}

pub async fn conversations(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
) -> Result<Json<Vec<Conversation>>, AppError> {
    let market = state.read().await;
    market.session(&user)?;
    Ok(Json(market.conversations(&user)))
}

pub async fn send(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
    Body(draft): Body<MessageDraft>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let message = state
        .mutate(|m| m.send_message(&user, draft, Utc::now()).cloned())
        .await?;
    tracing::debug!(from = %message.from_id, to = %message.to_id, "Message sent");
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Actor(user): Actor,
    PathParam(id): PathParam<MessageId>,
) -> Result<Json<Message>, AppError> {
    let message = state
        .mutate(|m| m.mark_message_read(&user, &id).cloned())
        .await?;
    Ok(Json(message))
}
