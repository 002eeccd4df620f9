use mailcamp_store::error::StoreError;
use thiserror::Error;

/// Errors that stop a send run. Per-recipient delivery problems are not
/// errors at this level; they end up in the run statistics.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("cannot resolve recipients: {0}")]
    Resolution(String),
    #[error("campaign {0} is already being sent")]
    Busy(String),
    #[error("transport setup failed: {0}")]
    Setup(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, SendError>;

/// Failure reported by a single transport call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("failed to build message: {0}")]
    Message(String),
    #[error("smtp error: {0}")]
    Smtp(String),
    #[error("{0}")]
    Other(String),
}
