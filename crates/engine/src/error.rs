//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when a referenced row does not exist.
//! - [`ExistingKey`] thrown when a unique name is already taken.
//! - [`StillAssigned`] thrown when a catalog entry is still referenced by
//!   ingredients and cannot be deleted.
//! - [`MissingFilter`] thrown when a bulk operation is called without any
//!   selector.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`StillAssigned`]: EngineError::StillAssigned
//!  [`MissingFilter`]: EngineError::MissingFilter
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Still assigned: {0}")]
    StillAssigned(String),
    #[error("Missing filter: {0}")]
    MissingFilter(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Translate a failed write into a domain error.
    ///
    /// Unique-constraint violations become [`EngineError::ExistingKey`] naming
    /// `key`; anything else stays a database error.
    pub(crate) fn from_write(err: DbErr, key: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::ExistingKey(key.to_string()),
            _ => Self::Database(err),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::StillAssigned(a), Self::StillAssigned(b)) => a == b,
            (Self::MissingFilter(a), Self::MissingFilter(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
