//! Initial schema.
//!
//! - `users`: credentials
//! - `categories`: user-owned groupings
//! - `budget_items`: income/expense records inside a category
//! - `shared_budgets`: per-user contribution percentages toward an item
//!
//! Every child row is removed together with its parent (`ON DELETE CASCADE`).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    UserId,
}

#[derive(Iden)]
enum BudgetItems {
    Table,
    Id,
    Title,
    Amount,
    Type,
    CreatedAt,
    CategoryId,
}

#[derive(Iden)]
enum SharedBudgets {
    Table,
    Id,
    UserId,
    BudgetItemId,
    ContributionPercent,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(80)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::PasswordHash)
                            .string_len(128)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string_len(120).not_null())
                    .col(ColumnDef::new(Categories::UserId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-user_id")
                            .from(Categories::Table, Categories::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-user_id")
                    .table(Categories::Table)
                    .col(Categories::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Budget items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BudgetItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BudgetItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BudgetItems::Title).string_len(120).not_null())
                    .col(ColumnDef::new(BudgetItems::Amount).double().not_null())
                    .col(ColumnDef::new(BudgetItems::Type).string_len(20).not_null())
                    .col(
                        ColumnDef::new(BudgetItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BudgetItems::CategoryId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budget_items-category_id")
                            .from(BudgetItems::Table, BudgetItems::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budget_items-category_id")
                    .table(BudgetItems::Table)
                    .col(BudgetItems::CategoryId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Shared budgets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SharedBudgets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SharedBudgets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SharedBudgets::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(SharedBudgets::BudgetItemId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SharedBudgets::ContributionPercent)
                            .double()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-shared_budgets-user_id")
                            .from(SharedBudgets::Table, SharedBudgets::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-shared_budgets-budget_item_id")
                            .from(SharedBudgets::Table, SharedBudgets::BudgetItemId)
                            .to(BudgetItems::Table, BudgetItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one contribution per (user, item).
        manager
            .create_index(
                Index::create()
                    .name("unique_user_item")
                    .table(SharedBudgets::Table)
                    .col(SharedBudgets::UserId)
                    .col(SharedBudgets::BudgetItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SharedBudgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BudgetItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
