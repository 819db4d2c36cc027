use sea_orm::{ActiveValue, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{
    Category, EngineError, ResultEngine, budget_items, categories, shared_budgets,
    util::{CATEGORY_NAME_MAX_LEN, normalize_required_text},
};

use super::with_tx;

impl crate::Engine {
    /// Lists the categories owned by `user_id`, oldest first.
    pub async fn categories(&self, user_id: i32) -> ResultEngine<Vec<Category>> {
        categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(categories::Column::Id)
            .all(&self.database)
            .await
            .map_err(Into::into)
    }

    pub async fn new_category(&self, user_id: i32, name: &str) -> ResultEngine<Category> {
        let name = normalize_required_text(name, "category name", CATEGORY_NAME_MAX_LEN)?;
        with_tx!(self, |db_tx| {
            categories::ActiveModel {
                name: ActiveValue::Set(name),
                user_id: ActiveValue::Set(user_id),
                ..Default::default()
            }
            .insert(&db_tx)
            .await
            .map_err(EngineError::from)
        })
    }

    /// Deletes a category owned by `user_id` together with its items and
    /// their shared budgets.
    ///
    /// Dependents are removed explicitly so the cascade does not rely on the
    /// backend enforcing foreign keys.
    pub async fn delete_category(&self, user_id: i32, category_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let category = categories::Entity::find_by_id(category_id)
                .filter(categories::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("Category not found".to_string()))?;

            let item_ids: Vec<i32> = budget_items::Entity::find()
                .select_only()
                .column(budget_items::Column::Id)
                .filter(budget_items::Column::CategoryId.eq(category.id))
                .into_tuple()
                .all(&db_tx)
                .await?;

            if !item_ids.is_empty() {
                shared_budgets::Entity::delete_many()
                    .filter(shared_budgets::Column::BudgetItemId.is_in(item_ids.clone()))
                    .exec(&db_tx)
                    .await?;
                budget_items::Entity::delete_many()
                    .filter(budget_items::Column::CategoryId.eq(category.id))
                    .exec(&db_tx)
                    .await?;
            }

            categories::Entity::delete_by_id(category.id)
                .exec(&db_tx)
                .await?;

            tracing::debug!(
                category_id = category.id,
                items = item_ids.len(),
                "deleted category"
            );
            Ok(())
        })
    }
}
