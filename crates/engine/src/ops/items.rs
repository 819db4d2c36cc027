use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    BudgetItem, EngineError, ResultEngine, budget_items, categories,
    util::{ITEM_KIND_MAX_LEN, ITEM_TITLE_MAX_LEN, normalize_required_text, require_finite},
};

use super::with_tx;

/// A budget item together with the name of its category.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetItemEntry {
    pub item: BudgetItem,
    pub category: String,
}

impl crate::Engine {
    /// Records an item under one of the caller's categories.
    ///
    /// `kind` is stored verbatim; a category that does not exist or belongs
    /// to someone else yields `KeyNotFound("Invalid category")`.
    pub async fn new_item(
        &self,
        user_id: i32,
        category_id: i32,
        title: &str,
        amount: f64,
        kind: &str,
    ) -> ResultEngine<BudgetItem> {
        let title = normalize_required_text(title, "title", ITEM_TITLE_MAX_LEN)?;
        let kind = normalize_required_text(kind, "type", ITEM_KIND_MAX_LEN)?;
        let amount = require_finite(amount, "amount")?;

        with_tx!(self, |db_tx| {
            let owned = categories::Entity::find_by_id(category_id)
                .filter(categories::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .is_some();
            if !owned {
                return Err(EngineError::KeyNotFound("Invalid category".to_string()));
            }

            budget_items::ActiveModel {
                title: ActiveValue::Set(title),
                amount: ActiveValue::Set(amount),
                kind: ActiveValue::Set(kind),
                created_at: ActiveValue::Set(Utc::now()),
                category_id: ActiveValue::Set(category_id),
                ..Default::default()
            }
            .insert(&db_tx)
            .await
            .map_err(EngineError::from)
        })
    }

    /// Lists every item whose category belongs to `user_id`.
    pub async fn items(&self, user_id: i32) -> ResultEngine<Vec<BudgetItemEntry>> {
        let rows = budget_items::Entity::find()
            .find_also_related(categories::Entity)
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(budget_items::Column::Id)
            .all(&self.database)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(item, category)| {
                category.map(|category| BudgetItemEntry {
                    item,
                    category: category.name,
                })
            })
            .collect())
    }
}
