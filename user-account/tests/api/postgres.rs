use std::sync::Arc;

use tokio::sync::RwLock;
use user_account::{
    app_state::state::AccountState,
    services::{
        argon2_hasher::Argon2Hasher,
        data_stores::{configure_postgresql, PostgresCredentialStore},
    },
    UserAccount,
};

use crate::helpers::{example_user, get_random_email, secret};

#[tokio::test]
#[ignore = "requires a live PostgreSQL at DATABASE_URL"]
async fn postgres_store_round_trip() {
    let pool = configure_postgresql()
        .await
        .expect("Failed to configure PostgreSQL");
    let state = AccountState::new(
        Arc::new(RwLock::new(PostgresCredentialStore::new(pool))),
        Arc::new(Argon2Hasher::new()),
    );

    let email = get_random_email();
    let mut user = example_user(&email.to_uppercase());
    user.save(&state).await.expect("Failed to save user");
    assert_eq!(user.email, email);

    let found = UserAccount::find_by_email(&email, &state)
        .await
        .unwrap()
        .expect("saved user should be found");
    assert!(found.authenticate(&secret("foobar"), &state).await.is_some());

    // the unique index catches what the pre-check would
    let mut duplicate = example_user(&email);
    let err = duplicate.save(&state).await.unwrap_err();
    assert!(err.has_field_error("email", "taken"));

    found.destroy(&state).await.expect("Failed to destroy user");
    assert!(UserAccount::find_by_email(&email, &state)
        .await
        .unwrap()
        .is_none());
}
