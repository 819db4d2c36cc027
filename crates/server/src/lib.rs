use axum::{Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{router, run_with_listener};
pub use token::TokenKeys;

mod categories;
mod items;
mod server;
mod shared;
mod token;
mod user;

pub enum ServerError {
    Engine(EngineError),
    /// Missing, malformed or expired bearer token.
    Unauthorized(String),
    Token(jsonwebtoken::errors::Error),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        EngineError::InvalidInput(_) | EngineError::InvalidPercentage(_) => {
            StatusCode::BAD_REQUEST
        }
        EngineError::Password(_) | EngineError::Database(_) | EngineError::Task(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Password(hash_err) => {
            tracing::error!("password hashing error: {hash_err}");
            "internal server error".to_string()
        }
        EngineError::Task(join_err) => {
            tracing::error!("background task error: {join_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Unauthorized(err) => (StatusCode::UNAUTHORIZED, err),
            ServerError::Token(err) => {
                tracing::error!("failed to issue token: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}
