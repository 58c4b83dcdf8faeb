use dotenvy::dotenv;
use lazy_static::lazy_static;
use std::env as std_env;

// Define a lazily evaluated static.
// lazy_static is needed because std_env::var is not a const function.
lazy_static! {
    pub static ref DATABASE_URL: String = get_database_url();
}

/// Read a required variable, loading `.env` first
fn retrieve_dot_env_variable(variable_key: &str) -> String {
    dotenv().ok();
    let value = std_env::var(variable_key).unwrap_or_else(|_| panic!("{} must be set", variable_key));
    if value.is_empty() {
        panic!("{} must not be empty", variable_key)
    }
    value
}

fn get_database_url() -> String {
    retrieve_dot_env_variable(env::DATABASE_URL)
}

pub mod env {
    pub const DATABASE_URL: &str = "DATABASE_URL";
}

pub const MAX_NAME_LEN: u64 = 50;
pub const MIN_PASSWORD_LEN: u64 = 6;
pub const REMEMBER_TOKEN_LEN: usize = 32;
pub const MAX_DB_CONNECTIONS: u32 = 5;

pub mod hashing {
    // m_cost (KiB), t_cost, p_cost
    pub const MEMORY_COST: u32 = 15000;
    pub const ITERATIONS: u32 = 2;
    pub const PARALLELISM: u32 = 1;
}
