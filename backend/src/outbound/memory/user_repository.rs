//! In-process credential store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{USER_EMAIL_CONSTRAINT, UserPersistenceError, UserRepository};
use crate::domain::{ProfileChanges, UserAccount, UserId};

#[derive(Default)]
struct Accounts {
    by_id: HashMap<UserId, UserAccount>,
    id_by_email: HashMap<String, UserId>,
}

/// `UserRepository` kept in memory for development and tests.
///
/// The email index and the account map share one lock, so the uniqueness
/// check and the write are a single critical section.
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: Mutex<Accounts>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Accounts>, UserPersistenceError> {
        self.state
            .lock()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut state = self.lock()?;
        let email = account.email().as_str();
        if state.id_by_email.contains_key(email) {
            return Err(UserPersistenceError::unique_violation(USER_EMAIL_CONSTRAINT));
        }
        state.id_by_email.insert(email.to_owned(), *account.id());
        state.by_id.insert(*account.id(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self.lock()?.by_id.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let state = self.lock()?;
        Ok(state
            .id_by_email
            .get(email)
            .and_then(|id| state.by_id.get(id))
            .cloned())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut state = self.lock()?;
        let Some(current) = state.by_id.get(id) else {
            return Ok(None);
        };
        let updated = current.apply(changes);
        let old_email = current.email().as_str().to_owned();
        let new_email = updated.email().as_str();

        if new_email != old_email {
            if state.id_by_email.contains_key(new_email) {
                return Err(UserPersistenceError::unique_violation(USER_EMAIL_CONSTRAINT));
            }
            state.id_by_email.remove(&old_email);
            state.id_by_email.insert(new_email.to_owned(), *id);
        }
        state.by_id.insert(*id, updated.clone());
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{Email, PasswordHash, Username};

    fn account(email: &str) -> UserAccount {
        UserAccount::new(
            UserId::random(),
            Email::new(email).expect("email"),
            Username::new("caiquecoelho15").expect("username"),
            PasswordHash::new("hash").expect("hash"),
        )
    }

    fn email_change(email: &str) -> ProfileChanges {
        ProfileChanges {
            email: Some(Email::new(email).expect("email")),
            ..ProfileChanges::default()
        }
    }

    #[fixture]
    fn repo() -> InMemoryUserRepository {
        InMemoryUserRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_rejected_and_first_account_kept(repo: InMemoryUserRepository) {
        let first = account("caique@hotmail.com");
        repo.create(&first).await.expect("first insert");

        let err = repo
            .create(&account("caique@hotmail.com"))
            .await
            .expect_err("duplicate");
        assert_eq!(err.to_string(), "UNIQUE constraint failed: user_models.email");

        let stored = repo
            .find_by_email("caique@hotmail.com")
            .await
            .expect("lookup")
            .expect("still present");
        assert_eq!(stored.id(), first.id());
    }

    #[rstest]
    #[tokio::test]
    async fn shared_usernames_are_allowed(repo: InMemoryUserRepository) {
        repo.create(&account("a@hotmail.com")).await.expect("first");
        repo.create(&account("b@hotmail.com")).await.expect("second");
    }

    #[rstest]
    #[tokio::test]
    async fn email_change_moves_the_index(repo: InMemoryUserRepository) {
        let user = account("old@hotmail.com");
        repo.create(&user).await.expect("insert");

        let updated = repo
            .update_profile(user.id(), &email_change("new@hotmail.com"))
            .await
            .expect("update")
            .expect("account exists");
        assert_eq!(updated.email().as_str(), "new@hotmail.com");
        assert!(repo.find_by_email("old@hotmail.com").await.expect("lookup").is_none());
        assert!(repo.find_by_email("new@hotmail.com").await.expect("lookup").is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn email_change_to_taken_address_leaves_store_untouched(repo: InMemoryUserRepository) {
        let first = account("first@hotmail.com");
        let second = account("second@hotmail.com");
        repo.create(&first).await.expect("insert");
        repo.create(&second).await.expect("insert");

        let err = repo
            .update_profile(second.id(), &email_change("first@hotmail.com"))
            .await
            .expect_err("conflict");
        assert!(matches!(err, UserPersistenceError::UniqueViolation { .. }));

        let stored = repo
            .find_by_id(second.id())
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(stored.email().as_str(), "second@hotmail.com");
    }

    #[rstest]
    #[tokio::test]
    async fn keeping_own_email_is_not_a_conflict(repo: InMemoryUserRepository) {
        let user = account("same@hotmail.com");
        repo.create(&user).await.expect("insert");
        repo.update_profile(user.id(), &email_change("same@hotmail.com"))
            .await
            .expect("no conflict")
            .expect("present");
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_account_update_returns_none(repo: InMemoryUserRepository) {
        let result = repo
            .update_profile(&UserId::random(), &ProfileChanges::default())
            .await
            .expect("no error");
        assert!(result.is_none());
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_registrations_commit_one_account() {
        let repo = std::sync::Arc::new(InMemoryUserRepository::new());
        let mut attempts = tokio::task::JoinSet::new();
        for _ in 0..64 {
            let repo = std::sync::Arc::clone(&repo);
            attempts.spawn(async move { repo.create(&account("race@hotmail.com")).await });
        }

        let mut committed = 0;
        let mut conflicts = 0;
        while let Some(outcome) = attempts.join_next().await {
            match outcome.expect("task completes") {
                Ok(()) => committed += 1,
                Err(UserPersistenceError::UniqueViolation { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected failure: {other}"),
            }
        }

        assert_eq!(committed, 1);
        assert_eq!(conflicts, 63);
        assert_eq!(repo.lock().expect("lock").by_id.len(), 1);
    }
}
