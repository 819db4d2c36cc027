use sea_orm::{DbErr, SqlErr};

use crate::EngineError;

mod categories;
mod items;
mod maintenance;
mod shared;
mod users;

pub use items::BudgetItemEntry;
pub use shared::Contribution;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Report a unique-index violation as [`EngineError::ExistingKey`].
fn map_unique_violation(err: DbErr, message: &str) -> EngineError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => EngineError::ExistingKey(message.to_string()),
        _ => EngineError::Database(err),
    }
}
