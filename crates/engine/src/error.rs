//! The module contains the error the engine can throw.
//!
//! Every message is meant to be shown to the user as-is, so keep them short
//! and readable. The errors are:
//!
//! - [`Validation`] thrown when an input is missing or malformed.
//! - [`NotFound`] thrown when a wallet, transaction or user does not exist.
//! - [`InsufficientFunds`] thrown when an expense would overdraw a wallet.
//! - [`InvariantViolation`] thrown when a change would leave a wallet negative.
//! - [`Upload`] thrown when an image could not be stored.
//! - [`Conflict`] thrown when a wallet changed under our feet.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`NotFound`]: EngineError::NotFound
//!  [`InsufficientFunds`]: EngineError::InsufficientFunds
//!  [`InvariantViolation`]: EngineError::InvariantViolation
//!  [`Upload`]: EngineError::Upload
//!  [`Conflict`]: EngineError::Conflict
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InsufficientFunds(String),
    #[error("{0}")]
    InvariantViolation(String),
    #[error("{0}")]
    Upload(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    pub(crate) fn wallet_not_found() -> Self {
        Self::NotFound("Wallet not found".to_string())
    }

    pub(crate) fn transaction_not_found() -> Self {
        Self::NotFound("Transaction not found".to_string())
    }

    pub(crate) fn insufficient_funds() -> Self {
        Self::InsufficientFunds("Insufficient funds in wallet".to_string())
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::InvariantViolation(a), Self::InvariantViolation(b)) => a == b,
            (Self::Upload(a), Self::Upload(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
