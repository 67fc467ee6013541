//! Wager validation against a question's kind and option set.
//!
//! Pure functions of the payload and a read-only [`QuestionSnapshot`]. Rules
//! run in a fixed order and the first failure wins:
//!
//! 1. the amount is a positive integer
//! 2. choice kinds reference one of the question's options
//! 3. numeric questions carry a finite number
//! 4. date questions carry a parseable date
//! 5. discussion questions refuse everything

use serde_json::Number;

use crate::domain::error::Rejection;
use crate::domain::money::Tokens;
use crate::domain::question::{QuestionKind, QuestionSnapshot};
use crate::domain::wager::{parse_date_value, Selection, ValidatedWager, WagerPayload};

/// Check that an amount is present, whole, and strictly positive.
///
/// Runs on its own before any entity lookup so bad amounts never cost a
/// storage round-trip. A float with no fractional part (`40.0`) counts as
/// whole.
pub fn validate_amount(amount: Option<&Number>) -> Result<Tokens, Rejection> {
    match amount.and_then(whole_tokens) {
        Some(tokens) if tokens > 0 => Ok(tokens),
        _ => Err(Rejection::InvalidAmount {
            amount: amount.cloned(),
        }),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_tokens(amount: &Number) -> Option<Tokens> {
    if let Some(tokens) = amount.as_u64() {
        return Some(tokens);
    }
    let value = amount.as_f64()?;
    // Negative integers land here too and fail the sign check.
    (value.is_finite() && value.fract() == 0.0 && value >= 1.0 && value <= u64::MAX as f64)
        .then(|| value as Tokens)
}

/// Validate a proposed wager against the question it targets.
pub fn validate(
    question: &QuestionSnapshot,
    payload: &WagerPayload,
) -> Result<ValidatedWager, Rejection> {
    let amount = validate_amount(payload.amount.as_ref())?;

    let selection = match question.kind() {
        QuestionKind::YesNo | QuestionKind::MultipleChoice | QuestionKind::MultiSelect => {
            let option = payload.option.ok_or(Rejection::MissingOption)?;
            Selection::Option(option)
        }
        QuestionKind::Numeric => match payload.numeric_value {
            Some(value) if value.is_finite() => Selection::Numeric(value),
            _ => return Err(Rejection::MissingNumericValue),
        },
        QuestionKind::Date => {
            let date = payload
                .date_value
                .as_deref()
                .and_then(parse_date_value)
                .ok_or(Rejection::MissingDateValue)?;
            Selection::Date(date)
        }
        QuestionKind::Discussion => return Err(Rejection::BettingDisabled),
    };

    // Any option sent along must belong to this question, whatever the kind.
    if let Some(option) = payload.option {
        if !question.has_option(option) {
            return Err(Rejection::InvalidOption {
                option,
                question: question.id(),
            });
        }
    }

    Ok(ValidatedWager { amount, selection })
}
