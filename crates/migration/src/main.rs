//! Manual schema management for the budget database.
//!
//! `DATABASE_URL` selects the database; the app itself always runs `up` at
//! start-up, so this binary is mostly useful for `down`/`fresh` while developing.

use sea_orm::Database;
use sea_orm_migration::prelude::*;

const USAGE: &str = "Usage: cargo run -p migration -- [up|down [steps]|fresh|status]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut args = std::env::args().skip(1);
    let cmd = args.next().unwrap_or_else(|| "up".to_string());

    let db_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:./budget.db?mode=rwc".to_string());

    let db = Database::connect(&db_url).await?;

    match cmd.as_str() {
        "up" => migration::Migrator::up(&db, None).await?,
        "down" => {
            let steps = match args.next() {
                Some(raw) => Some(raw.parse::<u32>().map_err(|_| USAGE)?),
                None => Some(1),
            };
            migration::Migrator::down(&db, steps).await?
        }
        "fresh" => migration::Migrator::fresh(&db).await?,
        "status" => migration::Migrator::status(&db).await?,
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}
