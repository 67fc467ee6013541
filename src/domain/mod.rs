//! Storage-agnostic domain logic: questions, wagers, validation, pool math.

pub mod error;
pub mod id;
pub mod money;
pub mod pool;
pub mod question;
pub mod validator;
pub mod wager;

pub use error::Rejection;
pub use id::{OptionId, QuestionId, UserId, WagerId};
pub use money::{Probability, Tokens};
pub use pool::{compute_option_stats, OptionStats, PoolSnapshot};
pub use question::{
    LocalizedText, NewQuestion, Question, QuestionKind, QuestionOption, QuestionSnapshot,
};
pub use wager::{Selection, ValidatedWager, Wager, WagerPayload};
