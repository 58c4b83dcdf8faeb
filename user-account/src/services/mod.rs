pub mod argon2_hasher;
pub mod data_stores;
pub mod hashmap_user_store;
