use sea_orm::{TransactionTrait, prelude::*};

use crate::{ResultEngine, budget_items, categories, shared_budgets, users};

use super::with_tx;

impl crate::Engine {
    /// Removes every row from every table, children first.
    ///
    /// Used by the seeding tool; never exposed over HTTP.
    pub async fn clear_all(&self) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let shared = shared_budgets::Entity::delete_many().exec(&db_tx).await?;
            let items = budget_items::Entity::delete_many().exec(&db_tx).await?;
            let owned = categories::Entity::delete_many().exec(&db_tx).await?;
            let accounts = users::Entity::delete_many().exec(&db_tx).await?;
            tracing::info!(
                shared = shared.rows_affected,
                items = items.rows_affected,
                categories = owned.rows_affected,
                users = accounts.rows_affected,
                "cleared all tables"
            );
            Ok(())
        })
    }
}
