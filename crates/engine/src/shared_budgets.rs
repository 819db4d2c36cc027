//! A user's percentage contribution toward a budget item.
//!
//! `(user_id, budget_item_id)` is unique (index `unique_user_item`).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "shared_budgets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub budget_item_id: i32,
    pub contribution_percent: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::budget_items::Entity",
        from = "Column::BudgetItemId",
        to = "super::budget_items::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    BudgetItem,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::budget_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
