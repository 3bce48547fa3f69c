//! Tab-scoped session persistence.
//!
//! [`Storage`] is the key-value surface a browser tab offers; [`SessionStore`]
//! keeps one validated [`Session`](crate::models::Session) in it.

pub mod storage;
pub mod store;

pub use storage::*;
pub use store::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Malformed session: {0}")]
    Parse(String),
    #[error("Invalid session: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for SessionError {
    fn from(e: std::io::Error) -> Self {
        SessionError::Storage(e.to_string())
    }
}
