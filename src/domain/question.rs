//! Questions, their kinds, and the options wagers can target.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::id::{OptionId, QuestionId, UserId};

/// How a question is answered, which decides what a wager must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionKind {
    YesNo,
    MultipleChoice,
    MultiSelect,
    Numeric,
    Date,
    Discussion,
}

impl QuestionKind {
    /// All kinds, in declaration order.
    pub const ALL: [QuestionKind; 6] = [
        Self::YesNo,
        Self::MultipleChoice,
        Self::MultiSelect,
        Self::Numeric,
        Self::Date,
        Self::Discussion,
    ];

    /// Stable name used in storage and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::YesNo => "YES_NO",
            Self::MultipleChoice => "MULTIPLE_CHOICE",
            Self::MultiSelect => "MULTI_SELECT",
            Self::Numeric => "NUMERIC",
            Self::Date => "DATE",
            Self::Discussion => "DISCUSSION",
        }
    }

    /// True for kinds whose wagers reference an option.
    #[must_use]
    pub const fn is_choice(self) -> bool {
        matches!(self, Self::YesNo | Self::MultipleChoice | Self::MultiSelect)
    }

    /// False only for discussion questions.
    #[must_use]
    pub const fn accepts_wagers(self) -> bool {
        !matches!(self, Self::Discussion)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown question kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown question kind '{0}'")]
pub struct UnknownKind(pub String);

impl FromStr for QuestionKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Text with an English form and an optional Chinese form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zh: Option<String>,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, zh: Option<String>) -> Self {
        Self { en: en.into(), zh }
    }

    /// English-only text.
    pub fn en(en: impl Into<String>) -> Self {
        Self::new(en, None)
    }
}

/// An outcome of a choice question, ordered by `position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: OptionId,
    pub question_id: QuestionId,
    pub position: u32,
    pub label: LocalizedText,
}

/// A catalog question with its options sorted by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub kind: QuestionKind,
    pub creator: UserId,
    pub title: LocalizedText,
    pub description: Option<LocalizedText>,
    pub created_at: DateTime<Utc>,
    pub options: Vec<QuestionOption>,
}

impl Question {
    /// The read-only view the validator works from.
    #[must_use]
    pub fn snapshot(&self) -> QuestionSnapshot {
        QuestionSnapshot::new(self.id, self.kind, self.options.clone())
    }
}

/// A question's kind and ordered option set, as handed to the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSnapshot {
    id: QuestionId,
    kind: QuestionKind,
    options: Vec<QuestionOption>,
}

impl QuestionSnapshot {
    /// Build a snapshot; options are sorted by position.
    #[must_use]
    pub fn new(id: QuestionId, kind: QuestionKind, mut options: Vec<QuestionOption>) -> Self {
        options.sort_by_key(|o| o.position);
        Self { id, kind, options }
    }

    #[must_use]
    pub const fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub const fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> &[QuestionOption] {
        &self.options
    }

    /// True if `option` is one of this question's options.
    #[must_use]
    pub fn has_option(&self, option: OptionId) -> bool {
        self.options
            .iter()
            .any(|o| o.id == option && o.question_id == self.id)
    }
}

/// A question to be added to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub kind: QuestionKind,
    pub creator: UserId,
    pub title: LocalizedText,
    pub description: Option<LocalizedText>,
    /// Option labels in display order. Positions are assigned from the index.
    pub options: Vec<LocalizedText>,
}

/// Labels given to a yes/no question created without explicit options.
#[must_use]
pub fn default_yes_no_options() -> Vec<LocalizedText> {
    vec![
        LocalizedText::new("Yes", Some("是".to_string())),
        LocalizedText::new("No", Some("否".to_string())),
    ]
}
