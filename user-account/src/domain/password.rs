use secrecy::{ExposeSecret, Secret};

/// Plaintext password held only while it is being set or changed.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub fn new(password: Secret<String>) -> Self {
        Password(password)
    }

    /// Empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.expose_secret().trim().is_empty()
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl From<&str> for Password {
    fn from(password: &str) -> Self {
        Password(Secret::new(password.to_owned()))
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}
