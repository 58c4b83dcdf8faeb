use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use validator::ValidationError;

use super::parse::Parseable;

lazy_static! {
    // local-part@domain.tld, where the final label is letters only
    static ref VALID_EMAIL_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9_+\-.]+@[A-Za-z0-9\-.]+\.[A-Za-z]+$")
            .expect("email pattern must compile");
}

/// An email address that passed format validation.
///
/// The case given by the caller is kept; use [`Email::normalized`] to get
/// the lowercase form that is written to the store.
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Email {
    /// Lowercase copy of the address
    /// ```
    /// use user_account::domain::email::Email;
    /// use user_account::domain::parse::Parseable;
    ///
    /// let email = Email::parse("Foo@Bar.COM".to_string()).unwrap();
    /// assert_eq!(email.normalized().as_ref(), "foo@bar.com");
    /// ```
    pub fn normalized(&self) -> Email {
        Email(self.0.to_lowercase())
    }
}

impl Parseable<String> for Email {
    fn parse(email: String) -> Result<Email, ValidationError> {
        if VALID_EMAIL_REGEX.is_match(&email) {
            Ok(Email(email))
        } else {
            let mut val_err = ValidationError::new("invalid");
            val_err.message = Some(Cow::Borrowed("is invalid"));
            val_err.add_param(Cow::Borrowed("input"), &email);
            Err(val_err)
        }
    }
}
