//! Owner authentication.

mod password;

pub use password::{PasswordError, check_credentials, hash_password, verify_password};
