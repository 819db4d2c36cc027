//! Budget items API endpoints.

use api_types::item::{ItemCreated, ItemNew, ItemView};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

fn map_entry(entry: engine::BudgetItemEntry) -> ItemView {
    let item = entry.item;
    ItemView {
        id: item.id,
        title: item.title,
        amount: item.amount,
        kind: item.kind,
        created_at: item.created_at,
        category: entry.category,
    }
}

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    payload: Result<Json<ItemNew>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemCreated>), ServerError> {
    let Json(payload) = payload?;
    let item = state
        .engine
        .new_item(
            user.id,
            payload.category_id,
            &payload.title,
            payload.amount,
            &payload.kind,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ItemCreated {
            message: "Item created".to_string(),
            id: item.id,
        }),
    ))
}

pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<ItemView>>, ServerError> {
    let items = state
        .engine
        .items(user.id)
        .await?
        .into_iter()
        .map(map_entry)
        .collect();
    Ok(Json(items))
}
