//! Wager rejection reasons produced by the validator.
//!
//! These errors describe caller-input problems that are detected before any
//! balance or stake is touched. They carry no side effects and are never
//! worth retrying.
//!
//! # Examples
//!
//! ```
//! use parimutuel::domain::error::Rejection;
//! use parimutuel::domain::question::{QuestionKind, QuestionSnapshot};
//! use parimutuel::domain::validator::validate;
//! use parimutuel::domain::wager::WagerPayload;
//! use parimutuel::domain::id::{QuestionId, UserId};
//!
//! let question = QuestionSnapshot::new(QuestionId::new(1), QuestionKind::Discussion, vec![]);
//! let payload = WagerPayload::new(10);
//!
//! assert!(matches!(validate(&question, &payload), Err(Rejection::BettingDisabled)));
//! ```

use serde_json::Number;
use thiserror::Error;

use crate::domain::id::{OptionId, QuestionId};

/// Reasons the validator refuses a proposed wager.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    /// Amount missing, zero, negative, or fractional.
    #[error(
        "amount must be a positive integer, got {}",
        .amount.as_ref().map_or_else(|| "nothing".to_string(), Number::to_string)
    )]
    InvalidAmount {
        /// The amount as submitted.
        amount: Option<Number>,
    },

    /// Choice questions need an option reference.
    #[error("an option is required for this question type")]
    MissingOption,

    /// The option does not belong to the question.
    #[error("{option} is not an option of {question}")]
    InvalidOption {
        /// The option that was referenced.
        option: OptionId,
        /// The question the wager targets.
        question: QuestionId,
    },

    /// Numeric questions need a finite numeric guess.
    #[error("a finite numeric value is required")]
    MissingNumericValue,

    /// Date questions need a parseable date guess.
    #[error("a date value is required (YYYY-MM-DD or RFC 3339)")]
    MissingDateValue,

    /// Discussion questions never accept wagers.
    #[error("betting is disabled on discussion questions")]
    BettingDisabled,
}

impl Rejection {
    /// Stable code used in logs and machine-readable output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::MissingOption => "MISSING_OPTION",
            Self::InvalidOption { .. } => "INVALID_OPTION",
            Self::MissingNumericValue => "MISSING_NUMERIC_VALUE",
            Self::MissingDateValue => "MISSING_DATE_VALUE",
            Self::BettingDisabled => "BETTING_DISABLED",
        }
    }
}
