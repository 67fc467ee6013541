//! Wager payloads and the immutable wager records they become.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::domain::id::{OptionId, QuestionId, UserId, WagerId};
use crate::domain::money::Tokens;

/// A proposed wager as submitted by the caller, before validation.
///
/// Every field is optional because which ones are required depends on the
/// question kind. `amount` is any JSON number so that negative or fractional
/// input reaches the validator instead of failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WagerPayload {
    #[serde(default, rename = "optionId")]
    pub option: Option<OptionId>,
    #[serde(default)]
    pub amount: Option<Number>,
    #[serde(default)]
    pub numeric_value: Option<f64>,
    #[serde(default)]
    pub date_value: Option<String>,
}

impl WagerPayload {
    /// Payload with only an amount set.
    #[must_use]
    pub fn new(amount: i64) -> Self {
        Self {
            amount: Some(Number::from(amount)),
            ..Self::default()
        }
    }

    /// Payload with an amount exactly as submitted, possibly fractional.
    #[must_use]
    pub fn with_raw_amount(amount: Number) -> Self {
        Self {
            amount: Some(amount),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_option(mut self, option: OptionId) -> Self {
        self.option = Some(option);
        self
    }

    #[must_use]
    pub fn with_numeric(mut self, value: f64) -> Self {
        self.numeric_value = Some(value);
        self
    }

    #[must_use]
    pub fn with_date(mut self, value: impl Into<String>) -> Self {
        self.date_value = Some(value.into());
        self
    }
}

/// What a wager is staked on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Selection {
    /// One option of a choice question.
    Option(OptionId),
    /// A numeric guess.
    Numeric(f64),
    /// A date guess.
    Date(NaiveDate),
}

/// A payload that passed validation, with typed amount and selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedWager {
    pub amount: Tokens,
    pub selection: Selection,
}

/// An immutable stake record. Never edited or cancelled once committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wager {
    pub id: WagerId,
    pub user_id: UserId,
    pub question_id: QuestionId,
    pub selection: Selection,
    pub amount: Tokens,
    pub placed_at: DateTime<Utc>,
}

impl Wager {
    /// Stamp a validated wager with a fresh id and the current time.
    #[must_use]
    pub fn new(user_id: UserId, question_id: QuestionId, validated: ValidatedWager) -> Self {
        Self {
            id: WagerId::new(),
            user_id,
            question_id,
            selection: validated.selection,
            amount: validated.amount,
            placed_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn option_id(&self) -> Option<OptionId> {
        match self.selection {
            Selection::Option(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn numeric_value(&self) -> Option<f64> {
        match self.selection {
            Selection::Numeric(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn date_value(&self) -> Option<NaiveDate> {
        match self.selection {
            Selection::Date(d) => Some(d),
            _ => None,
        }
    }
}

/// Parse a date guess given as `YYYY-MM-DD` or an RFC 3339 timestamp.
#[must_use]
pub fn parse_date_value(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_deserializes_from_camel_case_json() {
        let payload: WagerPayload =
            serde_json::from_str(r#"{"optionId": 4, "amount": 25}"#).unwrap();
        assert_eq!(payload.option, Some(OptionId::new(4)));
        assert_eq!(payload.amount, Some(Number::from(25)));
        assert_eq!(payload.numeric_value, None);
    }

    #[test]
    fn payload_keeps_fractional_amount_for_the_validator() {
        let payload: WagerPayload =
            serde_json::from_str(r#"{"optionId": 1, "amount": 2.5}"#).unwrap();
        assert_eq!(payload.amount.as_ref().and_then(Number::as_f64), Some(2.5));
    }

    #[test]
    fn parse_date_value_accepts_plain_and_rfc3339() {
        let expected = NaiveDate::from_ymd_opt(2030, 1, 15).unwrap();
        assert_eq!(parse_date_value("2030-01-15"), Some(expected));
        assert_eq!(parse_date_value("2030-01-15T08:00:00Z"), Some(expected));
        assert_eq!(parse_date_value("  "), None);
        assert_eq!(parse_date_value("next tuesday"), None);
    }

    #[test]
    fn accessors_follow_selection() {
        let wager = Wager::new(
            UserId::new(1),
            QuestionId::new(2),
            ValidatedWager {
                amount: 5,
                selection: Selection::Numeric(3.5),
            },
        );
        assert_eq!(wager.numeric_value(), Some(3.5));
        assert_eq!(wager.option_id(), None);
        assert_eq!(wager.date_value(), None);
    }
}
