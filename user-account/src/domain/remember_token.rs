use std::borrow::Cow;

use rand::{distributions::Alphanumeric, Rng};
use secrecy::{ExposeSecret, Secret};
use validator::ValidationError;

use super::parse::Parseable;
use crate::utils::constants::REMEMBER_TOKEN_LEN;

/// Opaque bearer value backing the persistent-login cookie.
#[derive(Debug, Clone)]
pub struct RememberToken(Secret<String>);

impl Parseable<String> for RememberToken {
    /// Wrap a token read back from the store
    /// ```
    /// use user_account::domain::parse::Parseable;
    /// use user_account::domain::remember_token::RememberToken;
    ///
    /// assert!(RememberToken::parse("   ".to_string()).is_err());
    /// assert!(RememberToken::parse("q1w2e3r4".to_string()).is_ok());
    /// ```
    fn parse(token: String) -> Result<Self, ValidationError> {
        if token.trim().is_empty() {
            let mut err = ValidationError::new("blank");
            err.message = Some(Cow::Borrowed("can't be blank"));
            return Err(err);
        }
        Ok(Self(Secret::new(token)))
    }
}

impl Default for RememberToken {
    /// Draw a fresh random token
    /// ```
    /// use secrecy::ExposeSecret;
    /// use user_account::domain::remember_token::RememberToken;
    ///
    /// let token = RememberToken::default();
    /// assert_eq!(token.as_ref().expose_secret().chars().count(), 32);
    /// ```
    fn default() -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(REMEMBER_TOKEN_LEN)
            .map(char::from)
            .collect();
        Self(Secret::new(token))
    }
}

impl AsRef<Secret<String>> for RememberToken {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for RememberToken {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}
