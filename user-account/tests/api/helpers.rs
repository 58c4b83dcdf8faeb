use std::sync::Arc;

use lazy_static::lazy_static;
use secrecy::Secret;
use tokio::sync::RwLock;
use user_account::{
    app_state::state::AccountState,
    services::{argon2_hasher::Argon2Hasher, hashmap_user_store::HashMapCredentialStore},
    utils::tracing::init_tracing,
    UserAccount,
};
use uuid::Uuid;

lazy_static! {
    // Only the first test to get here installs the subscriber
    static ref TRACING: () = {
        let _ = init_tracing();
    };
}

pub struct TestApp {
    pub state: AccountState,
    pub user_store: Arc<RwLock<HashMapCredentialStore>>,
}

impl TestApp {
    pub fn new() -> Self {
        lazy_static::initialize(&TRACING);
        let user_store = Arc::new(RwLock::new(HashMapCredentialStore::default()));
        let state = AccountState::new(user_store.clone(), Arc::new(Argon2Hasher::new()));
        Self { state, user_store }
    }

    pub async fn user_count(&self) -> usize {
        self.user_store.read().await.count()
    }
}

pub fn secret(value: &str) -> Secret<String> {
    Secret::new(value.to_owned())
}

pub fn get_random_email() -> String {
    format!("{}@example.com", Uuid::new_v4())
}

/// Valid, unsaved account with password "foobar"
pub fn example_user(email: &str) -> UserAccount {
    UserAccount::new("Example User", email, secret("foobar"), secret("foobar"))
        .expect("example user should be valid")
}
