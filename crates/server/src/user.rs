//! Registration and login.

use api_types::{
    Message,
    user::{Credentials, LoginResponse},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>), ServerError> {
    let Json(payload) = payload?;
    state
        .engine
        .register(&payload.username, &payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(Message::new("User registered"))))
}

pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<LoginResponse>, ServerError> {
    let Json(payload) = payload?;
    tracing::info!("login attempt for {}", payload.username);
    let user = state
        .engine
        .login(&payload.username, &payload.password)
        .await?;
    let access_token = state.tokens.issue(user.id).map_err(ServerError::Token)?;
    Ok(Json(LoginResponse { access_token }))
}
