//! The module contains the error the engine can throw.
//!
//! Most variants carry the message returned to API clients verbatim, e.g.
//! [`KeyNotFound`] holds `"Invalid category"` or `"Item not found"`.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use bcrypt::BcryptError;
use sea_orm::DbErr;
use thiserror::Error;
use tokio::task::JoinError;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    KeyNotFound(String),
    #[error("{0}")]
    ExistingKey(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("Contribution must be 0-100")]
    InvalidPercentage(f64),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Password(#[from] BcryptError),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("background task failed: {0}")]
    Task(#[from] JoinError),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InvalidPercentage(a), Self::InvalidPercentage(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::Password(a), Self::Password(b)) => a.to_string() == b.to_string(),
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            (Self::Task(a), Self::Task(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
