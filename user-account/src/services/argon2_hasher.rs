use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash,
    PasswordHasher as _, PasswordVerifier, Version,
};
use color_eyre::eyre::{eyre, Context, Result};
use lazy_static::lazy_static;
use secrecy::{ExposeSecret, Secret};

use crate::{
    domain::{
        data_stores::{HasherError, PasswordDigest, PasswordHasher},
        password::Password,
    },
    utils::constants::hashing::{ITERATIONS, MEMORY_COST, PARALLELISM},
};

lazy_static! {
    // Same parameters as real digests; all-zero salt and output never match.
    static ref PLACEHOLDER_DIGEST: String = format!(
        "$argon2id$v=19$m={},t={},p={}${}${}",
        MEMORY_COST,
        ITERATIONS,
        PARALLELISM,
        "A".repeat(22),
        "A".repeat(43)
    );
}

/// Argon2id hasher. Work runs on the blocking pool so async callers are
/// not stalled.
#[derive(Debug, Default, Clone)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl PasswordHasher for Argon2Hasher {
    #[tracing::instrument(name = "Computing password hash", skip_all)]
    async fn hash(&self, password: &Password) -> Result<PasswordDigest, HasherError> {
        let password = password.as_ref().expose_secret().to_owned();
        let digest = compute_password_hash(password)
            .await
            .map_err(HasherError::UnexpectedError)?;
        Ok(PasswordDigest::new(digest))
    }

    #[tracing::instrument(name = "Verify password hash", skip_all)]
    async fn verify(&self, candidate: &Secret<String>, digest: &PasswordDigest) -> bool {
        let result = verify_password_hash(
            digest.as_ref().to_owned(),
            candidate.expose_secret().to_owned(),
        )
        .await;
        match result {
            Ok(matched) => matched,
            Err(e) => {
                tracing::error!(error = ?e, "could not verify password hash");
                false
            }
        }
    }

    fn placeholder_digest(&self) -> PasswordDigest {
        PasswordDigest::new(PLACEHOLDER_DIGEST.clone())
    }
}

// Ok(false) on mismatch, Err only for a malformed digest or a panicked task
async fn verify_password_hash(
    expected_password_hash: String,
    password_candidate: String,
) -> Result<bool> {
    let current_span: tracing::Span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| -> Result<bool> {
            let expected_password_hash: PasswordHash<'_> =
                PasswordHash::new(&expected_password_hash).map_err(|e| eyre!(e))?;
            Ok(Argon2::default()
                .verify_password(password_candidate.as_bytes(), &expected_password_hash)
                .is_ok())
        })
    })
    .await
    .wrap_err("password verification task failed")?
}

async fn compute_password_hash(password: String) -> Result<String> {
    let current_span: tracing::Span = tracing::Span::current();
    let compute_password_hash_task = tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| -> Result<String> {
            let salt = SaltString::generate(&mut rand::thread_rng());
            let password_hash = Argon2::new(
                Algorithm::Argon2id,
                Version::V0x13,
                Params::new(MEMORY_COST, ITERATIONS, PARALLELISM, None).map_err(|e| eyre!(e))?,
            )
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| eyre!(e))?
            .to_string();
            Ok(password_hash)
        })
    });
    compute_password_hash_task
        .await
        .wrap_err("password hashing task failed")?
}
