//! Salted password hashing (bcrypt).

use crate::ResultEngine;

pub use bcrypt::DEFAULT_COST;

/// Hash `password` with a fresh random salt.
pub fn hash(password: &str, cost: u32) -> ResultEngine<String> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Check `password` against a stored bcrypt hash.
pub fn verify(password: &str, hash: &str) -> ResultEngine<bool> {
    Ok(bcrypt::verify(password, hash)?)
}

/// [`hash`] on the blocking thread pool, keeping async workers free.
pub async fn hash_blocking(password: String, cost: u32) -> ResultEngine<String> {
    tokio::task::spawn_blocking(move || hash(&password, cost)).await?
}

/// [`verify`] on the blocking thread pool.
pub async fn verify_blocking(password: String, hash: String) -> ResultEngine<bool> {
    tokio::task::spawn_blocking(move || verify(&password, &hash)).await?
}
