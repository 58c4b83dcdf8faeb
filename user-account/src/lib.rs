use sqlx::{postgres::PgPoolOptions, PgPool};

pub mod app_state;
pub mod domain;
pub mod services;
pub mod utils;

pub use app_state::state::AccountState;
pub use domain::{error::AccountError, user::UserAccount};

use utils::constants::MAX_DB_CONNECTIONS;

/// Create a new PostgreSQL connection pool
pub async fn get_postgres_pool(url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_DB_CONNECTIONS)
        .connect(url)
        .await
}
