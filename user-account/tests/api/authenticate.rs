use user_account::UserAccount;

use crate::helpers::{example_user, get_random_email, secret, TestApp};

async fn saved_and_found(app: &TestApp) -> (UserAccount, UserAccount) {
    let mut user = example_user(&get_random_email());
    user.save(&app.state).await.expect("Failed to save user");
    let found_user = UserAccount::find_by_email(&user.email, &app.state)
        .await
        .unwrap()
        .expect("saved user should be found");
    (user, found_user)
}

#[tokio::test]
async fn should_return_account_with_valid_password() {
    let app = TestApp::new();
    let (user, found_user) = saved_and_found(&app).await;

    let authenticated = found_user.authenticate(&secret("foobar"), &app.state).await;
    assert_eq!(authenticated, Some(&user));
}

#[tokio::test]
async fn should_return_none_with_invalid_password() {
    let app = TestApp::new();
    let (user, found_user) = saved_and_found(&app).await;

    let invalid_user = found_user.authenticate(&secret("invalid"), &app.state).await;
    assert!(invalid_user.is_none());
    assert_ne!(invalid_user, Some(&user));
}

#[tokio::test]
async fn should_return_none_without_digest() {
    let app = TestApp::new();
    let user = example_user(&get_random_email());
    assert!(user.password_digest().is_none());
    assert!(user.authenticate(&secret("foobar"), &app.state).await.is_none());
}
