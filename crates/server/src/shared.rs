//! Shared budget (contribution) endpoints.

use api_types::{
    Message,
    shared::{SharedNew, SharedView},
};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    payload: Result<Json<SharedNew>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>), ServerError> {
    let Json(payload) = payload?;
    state
        .engine
        .new_shared_budget(user.id, payload.budget_item_id, payload.contribution_percent)
        .await?;
    Ok((StatusCode::CREATED, Json(Message::new("Shared budget added"))))
}

pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<SharedView>>, ServerError> {
    let shared = state
        .engine
        .shared_budgets(user.id)
        .await?
        .into_iter()
        .map(|contribution| SharedView {
            item: contribution.item.title,
            amount: contribution.item.amount,
            kind: contribution.item.kind,
            contribution_percent: contribution.contribution_percent,
        })
        .collect();
    Ok(Json(shared))
}
