use test_case::test_case;
use user_account::UserAccount;

use crate::helpers::{example_user, get_random_email, secret, TestApp};

#[tokio::test]
async fn example_user_is_valid() {
    let app = TestApp::new();
    let user = example_user("example@example.com");
    assert!(user.is_valid(&app.state).await.unwrap());
}

#[test_case("")]
#[test_case(" ")]
#[tokio::test]
async fn should_be_invalid_when_name_is_blank(name: &str) {
    let app = TestApp::new();
    let mut user = example_user("example@example.com");
    user.name = name.to_owned();
    assert!(!user.is_valid(&app.state).await.unwrap());
}

#[test_case(50, true)]
#[test_case(51, false)]
#[tokio::test]
async fn name_length_boundary(len: usize, valid: bool) {
    let app = TestApp::new();
    let mut user = example_user("example@example.com");
    user.name = "a".repeat(len);
    assert_eq!(user.is_valid(&app.state).await.unwrap(), valid);
}

#[tokio::test]
async fn should_be_invalid_when_email_is_blank() {
    let app = TestApp::new();
    let mut user = example_user("example@example.com");
    user.email = String::new();
    assert!(!user.is_valid(&app.state).await.unwrap());
}

#[test_case("user@foo,com")]
#[test_case("user_at_foo.org")]
#[test_case("example.user@foo.")]
#[test_case("foo@bar_baz.com")]
#[test_case("foo@bar+baz.com")]
#[tokio::test]
async fn should_be_invalid_when_email_format_is_invalid(address: &str) {
    let app = TestApp::new();
    let mut user = example_user("example@example.com");
    user.email = address.to_owned();
    let err = user.validate(&app.state).await.unwrap_err();
    assert!(err.has_field_error("email", "invalid"), "{}", address);
}

#[test_case("user@foo.COM")]
#[test_case("A_US-ER@f.b.org")]
#[test_case("frst.lst@foo.jp")]
#[test_case("a+b@baz.cn")]
#[tokio::test]
async fn should_be_valid_when_email_format_is_valid(address: &str) {
    let app = TestApp::new();
    let mut user = example_user("example@example.com");
    user.email = address.to_owned();
    assert!(user.is_valid(&app.state).await.unwrap(), "{}", address);
}

#[tokio::test]
async fn should_be_invalid_when_email_is_already_taken() {
    let app = TestApp::new();
    let email = get_random_email();
    let mut existing = example_user(&email.to_uppercase());
    existing.save(&app.state).await.unwrap();

    let user = example_user(&email);
    let err = user.validate(&app.state).await.unwrap_err();
    assert!(err.has_field_error("email", "taken"));
}

#[test_case(" ")]
#[test_case("      ")]
fn should_be_invalid_when_password_is_blank(password: &str) {
    let err = UserAccount::new(
        "Example User",
        "user@example.com",
        secret(password),
        secret(password),
    )
    .unwrap_err();
    assert!(err.has_field_error("password", "blank"));
}

#[tokio::test]
async fn should_be_invalid_when_password_does_not_match_confirmation() {
    let app = TestApp::new();
    let mut user = example_user("example@example.com");
    user.set_password(secret("foobar"), secret("bar"));
    let err = user.validate(&app.state).await.unwrap_err();
    assert!(err.has_field_error("password_confirmation", "confirmation"));
}

#[test_case(5, false)]
#[test_case(6, true)]
#[tokio::test]
async fn password_length_boundary(len: usize, valid: bool) {
    let app = TestApp::new();
    let mut user = example_user("example@example.com");
    let password = "a".repeat(len);
    user.set_password(secret(&password), secret(&password));
    assert_eq!(user.is_valid(&app.state).await.unwrap(), valid);
}
