//! Persistence and domain rules of the budget tracker.
//!
//! [`Engine`] owns the database connection and exposes one async method per
//! API operation. Every method runs inside its own database transaction and
//! filters rows by the calling user's id.

use sea_orm::DatabaseConnection;

pub use error::EngineError;
pub use ops::{BudgetItemEntry, Contribution};

pub use budget_items::Model as BudgetItem;
pub use categories::Model as Category;
pub use shared_budgets::Model as SharedBudget;
pub use users::Model as User;

pub mod budget_items;
pub mod categories;
mod error;
mod ops;
pub mod password;
pub mod shared_budgets;
pub mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    password_cost: u32,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    password_cost: Option<u32>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// bcrypt work factor for new password hashes. Defaults to
    /// [`password::DEFAULT_COST`].
    pub fn password_cost(mut self, cost: u32) -> EngineBuilder {
        self.password_cost = Some(cost);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let password_cost = self.password_cost.unwrap_or(password::DEFAULT_COST);
        if !(4..=31).contains(&password_cost) {
            return Err(EngineError::InvalidInput(format!(
                "bcrypt cost must be between 4 and 31, got {password_cost}"
            )));
        }
        Ok(Engine {
            database: self.database,
            password_cost,
        })
    }
}
