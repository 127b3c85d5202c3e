//! The module contains the errors the ledger can throw.
//!
//! Mutations validate before touching state, so a [`Validation`] or
//! [`NotFound`] error always means no state change happened.
//!
//! [`Validation`]: LedgerError::Validation
//! [`NotFound`]: LedgerError::NotFound
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid record: {0}")]
    Validation(String),
    #[error("\"{0}\" not found")]
    NotFound(String),
    #[error("unknown member: {0}")]
    UnknownMember(String),
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("unknown payment method: {0}")]
    UnknownMethod(String),
    #[error("invalid roster: {0}")]
    InvalidRoster(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors from the persistence port.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("corrupt ledger file: {0}")]
    Corrupt(String),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::UnknownMember(a), Self::UnknownMember(b)) => a == b,
            (Self::UnknownCategory(a), Self::UnknownCategory(b)) => a == b,
            (Self::UnknownMethod(a), Self::UnknownMethod(b)) => a == b,
            (Self::InvalidRoster(a), Self::InvalidRoster(b)) => a == b,
            (Self::Storage(a), Self::Storage(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
