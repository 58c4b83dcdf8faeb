use std::borrow::Cow;

use color_eyre::eyre::Report;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use super::data_stores::{CredentialStoreError, HasherError};

/// Errors surfaced by account operations.
///
/// ## Variants
///
/// Validation: every field rule that failed, never just the first one.
/// A duplicate email caught by the store lands here as well.
/// NotFound: the record to update or delete is gone
/// Store: persistence fault, passed through untouched
/// UnexpectedError: anything else, e.g. the hasher failing
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("User not found")]
    NotFound,
    #[error("Store error")]
    Store(#[source] Report),
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl AccountError {
    /// Field violations, if this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            AccountError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Whether `field` failed with `code`
    pub fn has_field_error(&self, field: &str, code: &str) -> bool {
        self.validation_errors()
            .and_then(|errors| errors.field_errors().get(field).cloned())
            .map_or(false, |errs| errs.iter().any(|e| e.code == code))
    }
}

impl From<CredentialStoreError> for AccountError {
    fn from(err: CredentialStoreError) -> Self {
        match err {
            CredentialStoreError::UniqueConstraint => {
                let mut errors = ValidationErrors::new();
                errors.add("email", email_taken());
                AccountError::Validation(errors)
            }
            CredentialStoreError::NotFound => AccountError::NotFound,
            CredentialStoreError::UnexpectedError(report) => AccountError::Store(report),
        }
    }
}

impl From<HasherError> for AccountError {
    fn from(err: HasherError) -> Self {
        match err {
            HasherError::UnexpectedError(report) => AccountError::UnexpectedError(report),
        }
    }
}

pub fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub fn email_taken() -> ValidationError {
    field_error("taken", "has already been taken")
}
