//! Fixed sample data for manual testing.
//!
//! Seeding wipes every table first, so running it twice leaves the same data.

use engine::{Engine, EngineError};

const USERS: &[(&str, &str)] = &[
    ("Alice", "password"),
    ("Bob", "password123"),
    ("Charlie", "mypassword"),
    ("Dave", "secret"),
    ("Kimberly", "123456"),
    ("Eve", "qwerty"),
];

/// `(owner, category)`
const CATEGORIES: &[(&str, &str)] = &[
    ("Alice", "Food"),
    ("Alice", "Rent"),
    ("Bob", "Misc"),
    ("Charlie", "Entertainment"),
    ("Dave", "Travel"),
];

/// `(category, title, amount, type)`
const ITEMS: &[(&str, &str, f64, &str)] = &[
    ("Food", "Groceries", 150.0, "expense"),
    ("Rent", "Apartment Rent", 800.0, "expense"),
    ("Misc", "Freelance Income", 500.0, "income"),
    ("Entertainment", "Netflix Subscription", 300.0, "expense"),
    ("Travel", "Flight to Paris", 3000.0, "expense"),
    ("Rent", "Salary", 200000.0, "income"),
];

/// `(contributor, item title, percent)`
const SHARED: &[(&str, &str, f64)] = &[
    ("Bob", "Apartment Rent", 25.0),
    ("Charlie", "Netflix Subscription", 50.0),
    ("Dave", "Flight to Paris", 75.0),
    ("Kimberly", "Salary", 100.0),
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub categories: usize,
    pub items: usize,
    pub shared: usize,
}

fn lookup<T: Copy>(rows: &[(&str, T)], key: &str) -> Result<T, EngineError> {
    rows.iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| *value)
        .ok_or_else(|| EngineError::KeyNotFound(format!("seed row \"{key}\" missing")))
}

pub async fn seed(engine: &Engine) -> Result<SeedSummary, EngineError> {
    engine.clear_all().await?;

    let mut user_ids = Vec::with_capacity(USERS.len());
    for (username, password) in USERS {
        let user = engine.register(username, password).await?;
        user_ids.push((*username, user.id));
    }

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (owner, name) in CATEGORIES {
        let owner_id = lookup(&user_ids, owner)?;
        let category = engine.new_category(owner_id, name).await?;
        category_ids.push((*name, (owner_id, category.id)));
    }

    let mut item_ids = Vec::with_capacity(ITEMS.len());
    for (category, title, amount, kind) in ITEMS {
        let (owner_id, category_id) = lookup(&category_ids, category)?;
        let item = engine
            .new_item(owner_id, category_id, title, *amount, kind)
            .await?;
        item_ids.push((*title, item.id));
    }

    for (contributor, title, percent) in SHARED {
        let user_id = lookup(&user_ids, contributor)?;
        let item_id = lookup(&item_ids, title)?;
        engine.new_shared_budget(user_id, item_id, *percent).await?;
    }

    Ok(SeedSummary {
        users: user_ids.len(),
        categories: category_ids.len(),
        items: item_ids.len(),
        shared: SHARED.len(),
    })
}
