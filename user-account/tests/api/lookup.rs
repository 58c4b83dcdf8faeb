use test_case::test_case;
use user_account::{domain::data_stores::UserId, UserAccount};

use crate::helpers::{example_user, TestApp};

#[test_case("lookup@example.com")]
#[test_case("LOOKUP@EXAMPLE.COM")]
#[test_case("Lookup@Example.com")]
#[tokio::test]
async fn find_by_email_ignores_case(query: &str) {
    let app = TestApp::new();
    let mut user = example_user("lookup@example.com");
    user.save(&app.state).await.unwrap();

    let found = UserAccount::find_by_email(query, &app.state).await.unwrap();
    assert_eq!(found, Some(user));
}

#[test_case("nobody@example.com")]
#[test_case("not an email")]
#[test_case("")]
#[tokio::test]
async fn find_by_email_miss_is_none(query: &str) {
    let app = TestApp::new();
    let found = UserAccount::find_by_email(query, &app.state).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn find_by_unknown_id_is_none() {
    let app = TestApp::new();
    let found = UserAccount::find(&UserId::default(), &app.state).await.unwrap();
    assert!(found.is_none());
}
