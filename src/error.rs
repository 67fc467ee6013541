use thiserror::Error;

use crate::domain::error::Rejection;
use crate::domain::id::{QuestionId, UserId};
use crate::domain::money::Tokens;
use crate::domain::question::QuestionKind;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Everything `place_wager` can fail with.
///
/// Only [`WagerError::StorageFailure`] and [`WagerError::LockTimeout`] are
/// worth retrying; every other variant is a caller-input problem detected
/// before any mutation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WagerError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("{0} not found")]
    UserNotFound(UserId),

    #[error("{0} not found")]
    QuestionNotFound(QuestionId),

    #[error("insufficient balance: {balance} < {requested}")]
    InsufficientBalance { balance: Tokens, requested: Tokens },

    #[error("storage failure: {0}")]
    StorageFailure(String),

    #[error("timed out waiting for exclusive access to {0}")]
    LockTimeout(UserId),
}

impl WagerError {
    /// Wrap an infrastructure fault.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::StorageFailure(err.to_string())
    }

    /// True when retrying the same request is safe and may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageFailure(_) | Self::LockTimeout(_))
    }

    /// Stable code used in logs and machine-readable output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Rejected(rejection) => rejection.code(),
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::QuestionNotFound(_) => "QUESTION_NOT_FOUND",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::StorageFailure(_) => "STORAGE_FAILURE",
            Self::LockTimeout(_) => "LOCK_TIMEOUT",
        }
    }
}

/// Catalog and registration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("question title (en) cannot be empty")]
    MissingTitle,

    #[error("{kind} questions need at least one option")]
    MissingOptions { kind: QuestionKind },

    #[error("option labels (en) cannot be empty")]
    EmptyOptionLabel,

    #[error("username '{username}' is already taken")]
    DuplicateUsername { username: String },

    #[error("username cannot be empty")]
    EmptyUsername,

    #[error("{0} not found")]
    QuestionNotFound(QuestionId),

    #[error("{0} not found")]
    UserNotFound(UserId),
}

impl CatalogError {
    /// Stable code used in logs and machine-readable output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingTitle => "MISSING_TITLE",
            Self::MissingOptions { .. } => "MISSING_OPTIONS",
            Self::EmptyOptionLabel => "EMPTY_OPTION_LABEL",
            Self::DuplicateUsername { .. } => "DUPLICATE_USERNAME",
            Self::EmptyUsername => "EMPTY_USERNAME",
            Self::QuestionNotFound(_) => "QUESTION_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
        }
    }
}

/// Identity resolution errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("unauthenticated")]
    Unauthenticated,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Wager(#[from] WagerError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Stable code for the CLI's machine-readable error output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Wager(err) => err.code(),
            Self::Catalog(err) => err.code(),
            Self::Identity(_) => "UNAUTHENTICATED",
            Self::Json(_) | Self::Parse(_) => "PARSE_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Connection(_) | Self::Database(_) => "STORAGE_FAILURE",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_infrastructure_faults_are_retryable() {
        assert!(WagerError::storage("disk full").is_retryable());
        assert!(WagerError::LockTimeout(UserId::new(1)).is_retryable());
        assert!(!WagerError::UserNotFound(UserId::new(1)).is_retryable());
        assert!(!WagerError::InsufficientBalance {
            balance: 0,
            requested: 1
        }
        .is_retryable());
        assert!(!WagerError::from(Rejection::BettingDisabled).is_retryable());
    }

    #[test]
    fn rejection_codes_pass_through() {
        let err = WagerError::from(Rejection::MissingOption);
        assert_eq!(err.code(), "MISSING_OPTION");
        assert_eq!(err.to_string(), Rejection::MissingOption.to_string());
    }

    #[test]
    fn wager_error_converts_into_crate_error() {
        let err: Error = WagerError::QuestionNotFound(QuestionId::new(3)).into();
        assert_eq!(err.to_string(), "question-3 not found");
        assert_eq!(err.code(), "QUESTION_NOT_FOUND");
    }

    #[test]
    fn catalog_codes_are_stable() {
        let err: Error = CatalogError::DuplicateUsername {
            username: "alice".into(),
        }
        .into();
        assert_eq!(err.code(), "DUPLICATE_USERNAME");
        assert_eq!(err.to_string(), "username 'alice' is already taken");
    }
}
