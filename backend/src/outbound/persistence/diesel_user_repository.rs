//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Email uniqueness is enforced by the `user_models_email_key` constraint, so
//! concurrent registrations race inside PostgreSQL rather than in this
//! adapter. A violation is reported under [`USER_EMAIL_CONSTRAINT`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{USER_EMAIL_CONSTRAINT, UserPersistenceError, UserRepository};
use crate::domain::{Email, PasswordHash, ProfileChanges, UserAccount, UserId, Username};

use super::diesel_error_mapping::{ErrorKinds, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, ProfileUpdate, UserRow};
use super::pool::DbPool;
use super::schema::user_models;

const KINDS: ErrorKinds<UserPersistenceError> = ErrorKinds {
    connection: |message| UserPersistenceError::connection(message),
    query: |message| UserPersistenceError::query(message),
    unique_violation: || UserPersistenceError::unique_violation(USER_EMAIL_CONSTRAINT),
};

/// Diesel-backed credential store.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let corrupt = |err: crate::domain::UserValidationError| {
        UserPersistenceError::query(format!("stored account {} is invalid: {err}", row.id))
    };
    let email = Email::new(row.email.clone()).map_err(corrupt)?;
    let username = Username::new(row.username.clone()).map_err(corrupt)?;
    let hash = PasswordHash::new(row.password_hash.clone()).map_err(corrupt)?;
    Ok(
        UserAccount::new(UserId::from_uuid(row.id), email, username, hash)
            .with_profile(row.bio, row.image),
    )
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &KINDS))?;
        let row = NewUserRow {
            id: *account.id().as_uuid(),
            email: account.email().as_str(),
            username: account.username().as_str(),
            bio: account.bio(),
            image: account.image(),
            password_hash: account.password_hash().as_str(),
        };
        diesel::insert_into(user_models::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, &KINDS))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &KINDS))?;
        let row = user_models::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, &KINDS))?;
        row.map(row_to_account).transpose()
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &KINDS))?;
        let row = user_models::table
            .filter(user_models::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, &KINDS))?;
        row.map(row_to_account).transpose()
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, &KINDS))?;
        let update = ProfileUpdate {
            email: changes.email.as_ref().map(Email::as_str),
            bio: changes.bio.as_deref(),
            image: changes.image.as_ref().map(Option::as_deref),
        };
        let row = diesel::update(user_models::table.find(*id.as_uuid()))
            .set((update, user_models::updated_at.eq(diesel::dsl::now)))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, &KINDS))?;
        row.map(row_to_account).transpose()
    }
}
