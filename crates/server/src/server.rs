use axum::{
    Json, Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use std::sync::Arc;

use api_types::Message;
use engine::{Engine, EngineError};

use crate::{ServerError, TokenKeys, categories, items, shared, user};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub tokens: Arc<TokenKeys>,
}

/// Resolve the bearer token to a user and attach it to the request.
///
/// Tokens of users that no longer exist are rejected like invalid ones.
async fn auth(
    auth_header: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let TypedHeader(authorization) = auth_header
        .map_err(|_| ServerError::Unauthorized("Missing Authorization Header".to_string()))?;

    let user_id = state.tokens.verify(authorization.token()).map_err(|err| {
        tracing::debug!("rejected bearer token: {err}");
        ServerError::Unauthorized("Invalid or expired token".to_string())
    })?;

    let user = match state.engine.user(user_id).await {
        Ok(user) => user,
        Err(EngineError::KeyNotFound(_)) => {
            return Err(ServerError::Unauthorized("Unknown user".to_string()));
        }
        Err(err) => return Err(err.into()),
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

async fn index() -> Json<Message> {
    Json(Message::new("Budget Tracker API"))
}

/// Build the full application router: public auth routes plus the
/// bearer-protected resource routes.
pub fn router(engine: Engine, tokens: TokenKeys) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
        tokens: Arc::new(tokens),
    };

    let protected = Router::new()
        .route("/categories", get(categories::list).post(categories::create))
        .route("/categories/{id}", delete(categories::delete))
        .route("/items", get(items::list).post(items::create))
        .route("/shared", get(shared::list).post(shared::create))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/", get(index))
        .route("/register", post(user::register))
        .route("/login", post(user::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    tokens: TokenKeys,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine, tokens)).await
}
