use chrono::{DateTime, Utc};
use color_eyre::eyre::eyre;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use validator::{validate_length, validate_must_match, ValidationError, ValidationErrors};

use super::{
    data_stores::{CredentialStoreError, PasswordDigest, UserId},
    email::Email,
    error::{email_taken, field_error, AccountError},
    parse::Parseable,
    password::Password,
    remember_token::RememberToken,
};
use crate::{
    app_state::state::AccountState,
    utils::constants::{MAX_NAME_LEN, MIN_PASSWORD_LEN},
};

/// Persisted shape of an account, as handed to a `CredentialStore`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub name: String,
    pub email: Email,
    pub password_digest: PasswordDigest,
    pub remember_token: RememberToken,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A registered (or about to be registered) user.
///
/// `name` and `email` are plain fields so callers can edit them before
/// calling [`UserAccount::save`]. Nothing is checked until then.
#[derive(Debug, Clone, Serialize)]
pub struct UserAccount {
    id: Option<UserId>,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    password_digest: Option<PasswordDigest>,
    #[serde(skip)]
    remember_token: Option<RememberToken>,
    #[serde(skip)]
    password: Option<Password>,
    #[serde(skip)]
    password_confirmation: Option<Password>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

struct Rule {
    field: &'static str,
    code: &'static str,
    message: &'static str,
    passes: fn(&UserAccount) -> bool,
}

impl Rule {
    fn error(&self) -> ValidationError {
        field_error(self.code, self.message)
    }
}

// Evaluated in order, all of them, every time.
const FIELD_RULES: [Rule; 7] = [
    Rule {
        field: "name",
        code: "blank",
        message: "can't be blank",
        passes: name_present,
    },
    Rule {
        field: "name",
        code: "too_long",
        message: "is too long (maximum is 50 characters)",
        passes: name_within_limit,
    },
    Rule {
        field: "email",
        code: "blank",
        message: "can't be blank",
        passes: email_present,
    },
    Rule {
        field: "email",
        code: "invalid",
        message: "is invalid",
        passes: email_well_formed,
    },
    Rule {
        field: "password",
        code: "blank",
        message: "can't be blank",
        passes: password_present,
    },
    Rule {
        field: "password",
        code: "too_short",
        message: "is too short (minimum is 6 characters)",
        passes: password_long_enough,
    },
    Rule {
        field: "password_confirmation",
        code: "confirmation",
        message: "doesn't match Password",
        passes: password_confirmed,
    },
];

fn name_present(account: &UserAccount) -> bool {
    !account.name.trim().is_empty()
}

fn name_within_limit(account: &UserAccount) -> bool {
    validate_length(account.name.as_str(), None, Some(MAX_NAME_LEN), None)
}

fn email_present(account: &UserAccount) -> bool {
    !account.email.trim().is_empty()
}

fn email_well_formed(account: &UserAccount) -> bool {
    Email::parse(account.email.clone()).is_ok()
}

// A loaded record carries no plaintext, so password rules only bite
// while one is being set. New records must set one.
fn password_present(account: &UserAccount) -> bool {
    match &account.password {
        Some(password) => !password.is_blank(),
        None => account.is_persisted(),
    }
}

fn password_long_enough(account: &UserAccount) -> bool {
    account.password.as_ref().map_or(true, |password| {
        validate_length(
            password.as_ref().expose_secret().as_str(),
            Some(MIN_PASSWORD_LEN),
            None,
            None,
        )
    })
}

fn password_confirmed(account: &UserAccount) -> bool {
    match (&account.password, &account.password_confirmation) {
        (Some(password), Some(confirmation)) => validate_must_match(
            password.as_ref().expose_secret(),
            confirmation.as_ref().expose_secret(),
        ),
        _ => true,
    }
}

impl UserAccount {
    /// Build an unsaved account, checking every rule that does not need
    /// the store.
    /// ```
    /// use secrecy::Secret;
    /// use user_account::domain::user::UserAccount;
    ///
    /// let account = UserAccount::new(
    ///     "Example User",
    ///     "user@example.com",
    ///     Secret::new("foobar".to_string()),
    ///     Secret::new("foobar".to_string()),
    /// )
    /// .unwrap();
    /// assert!(!account.is_persisted());
    ///
    /// let err = UserAccount::new(
    ///     "",
    ///     "user@example,com",
    ///     Secret::new("foo".to_string()),
    ///     Secret::new("bar".to_string()),
    /// )
    /// .unwrap_err();
    /// assert!(err.has_field_error("name", "blank"));
    /// assert!(err.has_field_error("email", "invalid"));
    /// assert!(err.has_field_error("password", "too_short"));
    /// assert!(err.has_field_error("password_confirmation", "confirmation"));
    /// ```
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: Secret<String>,
        password_confirmation: Secret<String>,
    ) -> Result<Self, AccountError> {
        let account = UserAccount {
            id: None,
            name: name.into(),
            email: email.into(),
            password_digest: None,
            remember_token: None,
            password: Some(Password::new(password)),
            password_confirmation: Some(Password::new(password_confirmation)),
            created_at: None,
            updated_at: None,
        };
        let errors = account.check_fields();
        if errors.errors().is_empty() {
            Ok(account)
        } else {
            Err(AccountError::Validation(errors))
        }
    }

    fn from_record(id: UserId, record: UserRecord) -> Self {
        UserAccount {
            id: Some(id),
            name: record.name,
            email: record.email.as_ref().to_owned(),
            password_digest: Some(record.password_digest),
            remember_token: Some(record.remember_token),
            password: None,
            password_confirmation: None,
            created_at: Some(record.created_at),
            updated_at: Some(record.updated_at),
        }
    }

    pub fn id(&self) -> Option<&UserId> {
        self.id.as_ref()
    }

    pub fn password_digest(&self) -> Option<&PasswordDigest> {
        self.password_digest.as_ref()
    }

    pub fn remember_token(&self) -> Option<&RememberToken> {
        self.remember_token.as_ref()
    }

    pub fn password(&self) -> Option<&Password> {
        self.password.as_ref()
    }

    pub fn password_confirmation(&self) -> Option<&Password> {
        self.password_confirmation.as_ref()
    }

    pub fn created_at(&self) -> Option<&DateTime<Utc>> {
        self.created_at.as_ref()
    }

    pub fn updated_at(&self) -> Option<&DateTime<Utc>> {
        self.updated_at.as_ref()
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Stage a new password. It is checked and hashed on the next save.
    pub fn set_password(&mut self, password: Secret<String>, password_confirmation: Secret<String>) {
        self.password = Some(Password::new(password));
        self.password_confirmation = Some(Password::new(password_confirmation));
    }

    /// Run every rule that can be decided without the store.
    pub fn check_fields(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for rule in FIELD_RULES.iter() {
            if !(rule.passes)(self) {
                errors.add(rule.field, rule.error());
            }
        }
        errors
    }

    /// Full validation, including email uniqueness against the store.
    #[tracing::instrument(name = "Validate user account", skip_all)]
    pub async fn validate(&self, state: &AccountState) -> Result<(), AccountError> {
        let mut errors = self.check_fields();
        if self.email_taken(state).await? {
            errors.add("email", email_taken());
        }
        if errors.errors().is_empty() {
            Ok(())
        } else {
            tracing::debug!(?errors, "user account failed validation");
            Err(AccountError::Validation(errors))
        }
    }

    /// `Ok(false)` on any rule violation; store faults are still errors.
    pub async fn is_valid(&self, state: &AccountState) -> Result<bool, AccountError> {
        match self.validate(state).await {
            Ok(()) => Ok(true),
            Err(AccountError::Validation(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn email_taken(&self, state: &AccountState) -> Result<bool, AccountError> {
        // Malformed addresses are already reported by the format rule
        let email = match Email::parse(self.email.clone()) {
            Ok(email) => email.normalized(),
            Err(_) => return Ok(false),
        };
        let user_store = state.user_store.read().await;
        match user_store.find_by_email(&email).await {
            Ok((id, _)) => Ok(self.id.as_ref() != Some(&id)),
            Err(CredentialStoreError::NotFound) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Validate, lowercase the email, hash a staged password, mint a
    /// remember token if there is none, then insert or update.
    ///
    /// Nothing on `self` changes unless the write succeeds.
    #[tracing::instrument(name = "Save user account", skip_all, fields(id = ?self.id))]
    pub async fn save(&mut self, state: &AccountState) -> Result<(), AccountError> {
        self.validate(state).await?;

        let email = Email::parse(self.email.clone())
            .map_err(|e| {
                let mut errors = ValidationErrors::new();
                errors.add("email", e);
                AccountError::Validation(errors)
            })?
            .normalized();

        let password_digest = match &self.password {
            Some(password) => state.hasher.hash(password).await?,
            None => self.password_digest.clone().ok_or_else(|| {
                AccountError::UnexpectedError(eyre!("persisted account has no password digest"))
            })?,
        };
        let remember_token = self.remember_token.clone().unwrap_or_default();
        let now = Utc::now();
        let record = UserRecord {
            name: self.name.clone(),
            email: email.clone(),
            password_digest: password_digest.clone(),
            remember_token: remember_token.clone(),
            created_at: self.created_at.unwrap_or(now),
            updated_at: now,
        };

        let mut user_store = state.user_store.write().await;
        let written = match self.id.clone() {
            Some(id) => user_store.update(&id, record).await.map(|_| id),
            None => user_store.insert(record).await,
        };
        drop(user_store);
        let id = written.map_err(|e| {
            if e == CredentialStoreError::UniqueConstraint {
                tracing::warn!("store rejected duplicate email");
            }
            AccountError::from(e)
        })?;

        if self.id.is_none() {
            self.created_at = Some(now);
        }
        self.id = Some(id);
        self.email = email.as_ref().to_owned();
        self.password_digest = Some(password_digest);
        self.remember_token = Some(remember_token);
        self.updated_at = Some(now);
        self.password = None;
        self.password_confirmation = None;
        tracing::info!(id = ?self.id, "user account saved");
        Ok(())
    }

    /// `Some(self)` when `candidate` matches the stored digest, `None`
    /// otherwise. Never fails.
    #[tracing::instrument(name = "Authenticate user account", skip_all, fields(id = ?self.id))]
    pub async fn authenticate(
        &self,
        candidate: &Secret<String>,
        state: &AccountState,
    ) -> Option<&Self> {
        let matched = match &self.password_digest {
            Some(digest) => state.hasher.verify(candidate, digest).await,
            None => {
                let _ = state
                    .hasher
                    .verify(candidate, &state.hasher.placeholder_digest())
                    .await;
                false
            }
        };
        if matched {
            Some(self)
        } else {
            None
        }
    }

    /// Look an account up by email, ignoring case. A miss is `Ok(None)`.
    #[tracing::instrument(name = "Find user account by email", skip_all)]
    pub async fn find_by_email(
        email: &str,
        state: &AccountState,
    ) -> Result<Option<Self>, AccountError> {
        let email = match Email::parse(email.to_owned()) {
            Ok(email) => email.normalized(),
            Err(_) => return Ok(None),
        };
        let user_store = state.user_store.read().await;
        match user_store.find_by_email(&email).await {
            Ok((id, record)) => Ok(Some(Self::from_record(id, record))),
            Err(CredentialStoreError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(name = "Find user account by id", skip_all, fields(%id))]
    pub async fn find(id: &UserId, state: &AccountState) -> Result<Option<Self>, AccountError> {
        let user_store = state.user_store.read().await;
        match user_store.find_by_id(id).await {
            Ok((id, record)) => Ok(Some(Self::from_record(id, record))),
            Err(CredentialStoreError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the account. An unsaved account has nothing to delete.
    #[tracing::instrument(name = "Destroy user account", skip_all, fields(id = ?self.id))]
    pub async fn destroy(self, state: &AccountState) -> Result<(), AccountError> {
        let Some(id) = self.id else {
            return Ok(());
        };
        state.user_store.write().await.delete(&id).await?;
        Ok(())
    }
}

/// Two accounts are equal when they are the same stored record.
impl PartialEq for UserAccount {
    fn eq(&self, other: &Self) -> bool {
        self.id.is_some() && self.id == other.id
    }
}
