//! Categories API endpoints.

use api_types::category::{CategoryNew, CategoryView};
use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

use engine::EngineError;

use crate::{ServerError, server::ServerState};

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
    }
}

pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state
        .engine
        .categories(user.id)
        .await?
        .into_iter()
        .map(map_category)
        .collect();
    Ok(Json(categories))
}

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    payload: Result<Json<CategoryNew>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let Json(payload) = payload?;
    let category = state.engine.new_category(user.id, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(map_category(category))))
}

pub async fn delete(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    category_id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ServerError> {
    // Ids that do not parse as an integer cannot name an existing category.
    let Path(category_id) = category_id.map_err(|err| {
        tracing::debug!("rejected category id: {err}");
        EngineError::KeyNotFound("Category not found".to_string())
    })?;
    state.engine.delete_category(user.id, category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
