//! Account use-cases: registration, login, and profile maintenance.
//!
//! Every mutation runs the same pipeline: authenticate (when a caller is
//! required), authorize, validate, write, then re-read the stored account so
//! the response reflects what was committed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::authorization::{Operation, authorize};
use crate::domain::persistence_errors::map_user_persistence_error;
use crate::domain::ports::{
    AuthenticatedUser, CurrentUserQuery, LoginRequest, PasswordHasher, PasswordHasherError,
    RegisterUserRequest, TokenService, UpdateUserRequest, UserAccountCommand, UserRepository,
};
use crate::domain::validation::{self, LOGIN, REGISTER_USER, UPDATE_USER, ValidationReport};
use crate::domain::{
    Authenticator, BearerToken, Email, Error, Password, ProfileChanges, UserAccount, UserId,
    Username,
};

/// Account service implementing the user driving ports.
pub struct UserAccountService<U, T, H> {
    users: Arc<U>,
    tokens: Arc<T>,
    hasher: Arc<H>,
    authenticator: Authenticator<U, T>,
}

impl<U, T, H> Clone for UserAccountService<U, T, H> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            tokens: Arc::clone(&self.tokens),
            hasher: Arc::clone(&self.hasher),
            authenticator: self.authenticator.clone(),
        }
    }
}

impl<U, T, H> UserAccountService<U, T, H> {
    /// Create a new service over the given adapters.
    pub fn new(users: Arc<U>, tokens: Arc<T>, hasher: Arc<H>) -> Self {
        let authenticator = Authenticator::new(Arc::clone(&users), Arc::clone(&tokens));
        Self {
            users,
            tokens,
            hasher,
            authenticator,
        }
    }
}

/// Turn a single failed field into the same error shape the engine emits.
fn field_violation(field: &str) -> Error {
    let mut report = ValidationReport::default();
    report.record(field);
    report.into()
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

/// Run a hashing job on the blocking pool.
async fn off_executor<H, R, F>(hasher: &Arc<H>, job: F) -> Result<R, Error>
where
    H: PasswordHasher + 'static,
    R: Send + 'static,
    F: FnOnce(&H) -> Result<R, PasswordHasherError> + Send + 'static,
{
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || job(&hasher))
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(map_hasher_error)
}

fn profile_changes(request: UpdateUserRequest) -> Result<ProfileChanges, Error> {
    let email = request
        .email
        .map(Email::new)
        .transpose()
        .map_err(|_| field_violation("email"))?;
    // An empty image clears the avatar; a missing one leaves it alone.
    let image = request
        .image
        .map(|image| if image.is_empty() { None } else { Some(image) });
    Ok(ProfileChanges {
        email,
        bio: request.bio,
        image,
    })
}

impl<U, T, H> UserAccountService<U, T, H>
where
    U: UserRepository,
    T: TokenService,
    H: PasswordHasher + 'static,
{
    fn issue_token(&self, user_id: &UserId) -> Result<BearerToken, Error> {
        self.tokens
            .issue(user_id)
            .map_err(|err| Error::internal(err.to_string()))
    }

    async fn reload(&self, user_id: &UserId) -> Result<UserAccount, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::internal(format!("account {user_id} vanished after write")))
    }

    async fn build_account(&self, request: &RegisterUserRequest) -> Result<UserAccount, Error> {
        let email = Email::new(request.email.clone().unwrap_or_default())
            .map_err(|_| field_violation("email"))?;
        let username = Username::new(request.username.clone().unwrap_or_default())
            .map_err(|_| field_violation("username"))?;
        let password = request
            .password
            .clone()
            .ok_or_else(|| field_violation("password"))?;
        let hash = off_executor(&self.hasher, move |hasher| hasher.hash(&password)).await?;
        Ok(UserAccount::new(UserId::random(), email, username, hash))
    }

    async fn password_matches(
        &self,
        password: &Password,
        account: &UserAccount,
    ) -> Result<bool, Error> {
        let password = password.clone();
        let hash = account.password_hash().clone();
        off_executor(&self.hasher, move |hasher| hasher.verify(&password, &hash)).await
    }

    /// Spend one hash on an unknown email so it costs what a verify would.
    async fn spend_equal_effort(&self, password: &Password) -> Result<(), Error> {
        let password = password.clone();
        off_executor(&self.hasher, move |hasher| hasher.hash(&password).map(drop)).await
    }
}

#[async_trait]
impl<U, T, H> UserAccountCommand for UserAccountService<U, T, H>
where
    U: UserRepository,
    T: TokenService,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<AuthenticatedUser, Error> {
        validation::validate(&request, &REGISTER_USER).into_result()?;
        debug!(operation = REGISTER_USER.operation(), "payload validated");

        let account = self.build_account(&request).await?;
        self.users
            .create(&account)
            .await
            .map_err(map_user_persistence_error)?;
        debug!(operation = REGISTER_USER.operation(), user_id = %account.id(), "account committed");

        let account = self.reload(account.id()).await?;
        let token = self.issue_token(account.id())?;
        Ok(AuthenticatedUser { account, token })
    }

    async fn login(&self, request: LoginRequest) -> Result<AuthenticatedUser, Error> {
        validation::validate(&request, &LOGIN).into_result()?;
        debug!(operation = LOGIN.operation(), "payload validated");

        let (Some(email), Some(password)) = (request.email.as_deref(), request.password.as_ref())
        else {
            return Err(Error::invalid_credentials());
        };
        let found = self
            .users
            .find_by_email(email)
            .await
            .map_err(map_user_persistence_error)?;
        let Some(account) = found else {
            self.spend_equal_effort(password).await?;
            debug!(operation = LOGIN.operation(), "unknown email");
            return Err(Error::invalid_credentials());
        };
        if !self.password_matches(password, &account).await? {
            debug!(operation = LOGIN.operation(), "password mismatch");
            return Err(Error::invalid_credentials());
        }

        let token = self.issue_token(account.id())?;
        debug!(operation = LOGIN.operation(), user_id = %account.id(), "login accepted");
        Ok(AuthenticatedUser { account, token })
    }

    async fn update_profile(
        &self,
        token: Option<BearerToken>,
        request: UpdateUserRequest,
    ) -> Result<AuthenticatedUser, Error> {
        let actor = self.authenticator.require(token.as_ref()).await?;
        debug!(operation = UPDATE_USER.operation(), user_id = %actor.id(), "authenticated");

        authorize(Some(actor.id()), Some(actor.id()), Operation::Update).into_result()?;
        validation::validate(&request, &UPDATE_USER).into_result()?;
        debug!(operation = UPDATE_USER.operation(), "payload validated");

        let changes = profile_changes(request)?;
        let account = if changes.is_empty() {
            debug!(operation = UPDATE_USER.operation(), user_id = %actor.id(), "nothing to change");
            actor
        } else {
            let updated = self
                .users
                .update_profile(actor.id(), &changes)
                .await
                .map_err(map_user_persistence_error)?
                .ok_or_else(|| Error::unauthorized("missing or invalid token"))?;
            debug!(operation = UPDATE_USER.operation(), user_id = %updated.id(), "profile committed");
            self.reload(updated.id()).await?
        };
        let token = match token {
            Some(token) => token,
            None => self.issue_token(account.id())?,
        };
        Ok(AuthenticatedUser { account, token })
    }
}

#[async_trait]
impl<U, T, H> CurrentUserQuery for UserAccountService<U, T, H>
where
    U: UserRepository,
    T: TokenService,
    H: PasswordHasher + 'static,
{
    async fn current_user(&self, token: Option<BearerToken>) -> Result<AuthenticatedUser, Error> {
        let account = self.authenticator.require(token.as_ref()).await?;
        let token = match token {
            Some(token) => token,
            None => self.issue_token(account.id())?,
        };
        Ok(AuthenticatedUser { account, token })
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
