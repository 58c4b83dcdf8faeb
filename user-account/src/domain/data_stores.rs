use color_eyre::eyre::Report;
use secrecy::Secret;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationError;

use super::{email::Email, parse::Parseable, password::Password, user::UserRecord};

/// Persistence boundary for user accounts.
///
/// Implementations must reject a second record whose email matches an
/// existing one case-insensitively, independently of any check the
/// caller did beforehand.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    async fn insert(&mut self, record: UserRecord) -> Result<UserId, CredentialStoreError>;
    async fn update(&mut self, id: &UserId, record: UserRecord)
        -> Result<(), CredentialStoreError>;
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<(UserId, UserRecord), CredentialStoreError>;
    async fn find_by_id(&self, id: &UserId) -> Result<(UserId, UserRecord), CredentialStoreError>;
    async fn delete(&mut self, id: &UserId) -> Result<(), CredentialStoreError>;
}

#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("Email has already been taken")]
    UniqueConstraint,
    #[error("User not found")]
    NotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for CredentialStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::UniqueConstraint, Self::UniqueConstraint)
                | (Self::NotFound, Self::NotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// One-way password hashing primitive.
#[async_trait::async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &Password) -> Result<PasswordDigest, HasherError>;

    /// Constant-time comparison. A malformed digest is a mismatch.
    async fn verify(&self, candidate: &Secret<String>, digest: &PasswordDigest) -> bool;

    /// Well-formed digest that matches no password. Verifying against it
    /// costs the same as verifying against a real digest.
    fn placeholder_digest(&self) -> PasswordDigest;
}

#[derive(Debug, Error)]
pub enum HasherError {
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Parseable<String> for UserId {
    /// Parse a stored id, which should be a valid UUID
    /// ```
    /// use user_account::domain::data_stores::UserId;
    /// use user_account::domain::parse::Parseable;
    ///
    /// let bad_id = UserId::parse("should_not_work".to_string());
    /// assert!(bad_id.is_err());
    /// if let Err(e) = bad_id {
    ///     assert_eq!(e.code, "invalid_uuid");
    /// }
    /// ```
    fn parse(id: String) -> Result<Self, ValidationError> {
        let uuid = Uuid::parse_str(id.as_str()).map_err(|_| ValidationError::new("invalid_uuid"))?;
        Ok(Self(uuid))
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// PHC-formatted hash string as produced by a [`PasswordHasher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn new(digest: String) -> Self {
        Self(digest)
    }
}

impl AsRef<str> for PasswordDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
