pub mod data_stores;
pub mod email;
pub mod error;
pub mod parse;
pub mod password;
pub mod remember_token;
pub mod user;
