use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{BudgetItem, EngineError, ResultEngine, SharedBudget, budget_items, shared_budgets};

use super::{map_unique_violation, with_tx};

/// One of the caller's contributions, joined with the item it targets.
#[derive(Clone, Debug, PartialEq)]
pub struct Contribution {
    pub item: BudgetItem,
    pub contribution_percent: f64,
}

impl crate::Engine {
    /// Records that `user_id` contributes `percent` of an existing item.
    ///
    /// The item may belong to any user. Lookup happens before range
    /// validation, so a missing item wins over a bad percentage. A second
    /// contribution to the same item is rejected by the `unique_user_item`
    /// index.
    pub async fn new_shared_budget(
        &self,
        user_id: i32,
        budget_item_id: i32,
        percent: f64,
    ) -> ResultEngine<SharedBudget> {
        with_tx!(self, |db_tx| {
            let item = budget_items::Entity::find_by_id(budget_item_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("Item not found".to_string()))?;

            if !(0.0..=100.0).contains(&percent) {
                return Err(EngineError::InvalidPercentage(percent));
            }

            shared_budgets::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                budget_item_id: ActiveValue::Set(item.id),
                contribution_percent: ActiveValue::Set(percent),
                ..Default::default()
            }
            .insert(&db_tx)
            .await
            .map_err(|err| {
                map_unique_violation(err, "Contribution to this item already recorded")
            })
        })
    }

    /// Lists the contributions made by `user_id`.
    pub async fn shared_budgets(&self, user_id: i32) -> ResultEngine<Vec<Contribution>> {
        let rows = shared_budgets::Entity::find()
            .filter(shared_budgets::Column::UserId.eq(user_id))
            .find_also_related(budget_items::Entity)
            .order_by_asc(shared_budgets::Column::Id)
            .all(&self.database)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(shared, item)| {
                item.map(|item| Contribution {
                    item,
                    contribution_percent: shared.contribution_percent,
                })
            })
            .collect())
    }
}
