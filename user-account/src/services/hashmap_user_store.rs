use std::collections::HashMap;

use crate::domain::{
    data_stores::{CredentialStore, CredentialStoreError, UserId},
    email::Email,
    user::UserRecord,
};

/// In-memory store. Emails are indexed by their lowercase form, which is
/// what enforces case-insensitive uniqueness.
#[derive(Debug, Default)]
pub struct HashMapCredentialStore {
    users: HashMap<UserId, UserRecord>,
    email_index: HashMap<Email, UserId>,
}

impl HashMapCredentialStore {
    pub fn count(&self) -> usize {
        self.users.len()
    }

    fn email_owner(&self, email: &Email) -> Option<&UserId> {
        self.email_index.get(&email.normalized())
    }
}

#[async_trait::async_trait]
impl CredentialStore for HashMapCredentialStore {
    /// Add a record, rejecting an email already held in any case.
    ///
    /// ## Example
    ///
    /// ```
    /// use chrono::Utc;
    /// use tokio_test;
    /// use user_account::domain::data_stores::{CredentialStore, CredentialStoreError, PasswordDigest};
    /// use user_account::domain::{email::Email, parse::Parseable, remember_token::RememberToken, user::UserRecord};
    /// use user_account::services::hashmap_user_store::HashMapCredentialStore;
    ///
    /// let record = |email: &str| UserRecord {
    ///     name: "Jaymo".to_string(),
    ///     email: Email::parse(email.to_string()).unwrap(),
    ///     password_digest: PasswordDigest::new("$argon2id$...".to_string()),
    ///     remember_token: RememberToken::default(),
    ///     created_at: Utc::now(),
    ///     updated_at: Utc::now(),
    /// };
    /// let mut store = HashMapCredentialStore::default();
    ///
    /// tokio_test::block_on(async {
    ///     assert!(store.insert(record("jaymo@gmail.com")).await.is_ok());
    ///
    ///     // Try again in another case, we should fail
    ///     let result = store.insert(record("JAYMO@gmail.com")).await;
    ///     assert_eq!(result, Err(CredentialStoreError::UniqueConstraint));
    /// })
    /// ```
    #[tracing::instrument(name = "Insert user record", skip_all)]
    async fn insert(&mut self, record: UserRecord) -> Result<UserId, CredentialStoreError> {
        if self.email_owner(&record.email).is_some() {
            return Err(CredentialStoreError::UniqueConstraint);
        }
        let id = UserId::default();
        self.email_index.insert(record.email.normalized(), id.clone());
        self.users.insert(id.clone(), record);
        Ok(id)
    }

    #[tracing::instrument(name = "Update user record", skip_all, fields(%id))]
    async fn update(
        &mut self,
        id: &UserId,
        record: UserRecord,
    ) -> Result<(), CredentialStoreError> {
        let previous_email = match self.users.get(id) {
            Some(existing) => existing.email.normalized(),
            None => return Err(CredentialStoreError::NotFound),
        };
        if matches!(self.email_owner(&record.email), Some(owner) if owner != id) {
            return Err(CredentialStoreError::UniqueConstraint);
        }
        self.email_index.remove(&previous_email);
        self.email_index.insert(record.email.normalized(), id.clone());
        self.users.insert(id.clone(), record);
        Ok(())
    }

    /// Return a copy of the matching record, if there is one.
    #[tracing::instrument(name = "Find user record by email", skip_all)]
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<(UserId, UserRecord), CredentialStoreError> {
        let id = self
            .email_owner(email)
            .ok_or(CredentialStoreError::NotFound)?;
        self.find_by_id(id).await
    }

    #[tracing::instrument(name = "Find user record by id", skip_all, fields(%id))]
    async fn find_by_id(&self, id: &UserId) -> Result<(UserId, UserRecord), CredentialStoreError> {
        self.users
            .get(id)
            .cloned()
            .map(|record| (id.clone(), record))
            .ok_or(CredentialStoreError::NotFound)
    }

    #[tracing::instrument(name = "Delete user record", skip_all, fields(%id))]
    async fn delete(&mut self, id: &UserId) -> Result<(), CredentialStoreError> {
        let record = self.users.remove(id).ok_or(CredentialStoreError::NotFound)?;
        self.email_index.remove(&record.email.normalized());
        Ok(())
    }
}
