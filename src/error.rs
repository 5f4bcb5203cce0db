use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds {
        balance: rust_decimal::Decimal,
        required: rust_decimal::Decimal,
    },
    #[error("Job {0} is already paid")]
    AlreadyPaid(u32),
    #[error("Deposit of {amount} exceeds the allowed limit of {limit}")]
    DepositLimitExceeded {
        amount: rust_decimal::Decimal,
        limit: rust_decimal::Decimal,
    },
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
    #[error("No data in the requested window")]
    NoData,
    #[error("Write conflict: {0}")]
    Conflict(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LedgerError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }

    /// Conflicts are the only failures a settlement retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for LedgerError {
    fn from(e: rocksdb::Error) -> Self {
        Self::Storage(Box::new(e))
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Storage(Box::new(e))
    }
}
