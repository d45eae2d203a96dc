//! Errors the engine can raise.
//!
//! Every business-rule check runs before the first write of an operation, so
//! an error means the database was left untouched by that operation (the
//! surrounding transaction rolls back any partial work).

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Missing or malformed required field.
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("\"{0}\" not found")]
    KeyNotFound(String),
    #[error("\"{0}\" already exists")]
    ExistingKey(String),
    /// A debit would take the bank below zero.
    #[error("insufficient balance: {0}")]
    InsufficientFunds(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// Status change not allowed from the current state.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidTransition(a), Self::InvalidTransition(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
