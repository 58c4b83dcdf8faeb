use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::data_stores::{CredentialStore, PasswordHasher};

// Using type aliases to improve readability!
pub type UserStoreType = Arc<RwLock<dyn CredentialStore>>;
pub type PasswordHasherType = Arc<dyn PasswordHasher>;

/// Handles every account operation runs against. Owned by the caller.
#[derive(Clone)]
pub struct AccountState {
    pub user_store: UserStoreType,
    pub hasher: PasswordHasherType,
}

impl AccountState {
    pub fn new(user_store: UserStoreType, hasher: PasswordHasherType) -> Self {
        Self { user_store, hasher }
    }
}
