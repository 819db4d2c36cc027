use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, User, password, users,
    util::{USERNAME_MAX_LEN, normalize_required_text},
};

use super::{map_unique_violation, with_tx};

const USERNAME_TAKEN: &str = "Username already taken";

impl crate::Engine {
    /// Registers a new user, storing only a salted hash of the password.
    pub async fn register(&self, username: &str, password: &str) -> ResultEngine<User> {
        let username = normalize_required_text(username, "username", USERNAME_MAX_LEN)?;
        if password.is_empty() {
            return Err(EngineError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }
        let password_hash =
            password::hash_blocking(password.to_string(), self.password_cost).await?;

        let user = with_tx!(self, |db_tx| {
            let taken = users::Entity::find()
                .filter(users::Column::Username.eq(username.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::ExistingKey(USERNAME_TAKEN.to_string()));
            }

            users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                password_hash: ActiveValue::Set(password_hash),
                ..Default::default()
            }
            .insert(&db_tx)
            .await
            .map_err(|err| map_unique_violation(err, USERNAME_TAKEN))
        })?;

        tracing::info!(user_id = user.id, "registered user {}", user.username);
        Ok(user)
    }

    /// Returns the user matching the credentials.
    ///
    /// Unknown usernames and wrong passwords both yield
    /// [`EngineError::InvalidCredentials`].
    pub async fn login(&self, username: &str, password: &str) -> ResultEngine<User> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username.trim()))
            .one(&self.database)
            .await?
            .ok_or(EngineError::InvalidCredentials)?;

        let matches =
            password::verify_blocking(password.to_string(), user.password_hash.clone()).await?;
        if !matches {
            tracing::debug!(user_id = user.id, "rejected login: wrong password");
            return Err(EngineError::InvalidCredentials);
        }
        Ok(user)
    }

    pub async fn user(&self, user_id: i32) -> ResultEngine<User> {
        users::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not found".to_string()))
    }
}
