//! Persistence ports for balances, stakes, and the question catalog.

use std::collections::HashMap;
use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::id::{OptionId, QuestionId, UserId};
use crate::domain::money::Tokens;
use crate::domain::question::{
    LocalizedText, NewQuestion, Question, QuestionKind, QuestionSnapshot,
};
use crate::domain::wager::Wager;
use crate::error::{Result, WagerError};

/// A registered user and their current token balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: UserId,
    pub username: String,
    pub balance: Tokens,
    pub created_at: DateTime<Utc>,
}

/// A catalog listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionSummary {
    pub id: QuestionId,
    pub kind: QuestionKind,
    pub title: LocalizedText,
    pub creator: UserId,
    pub creator_username: String,
    pub created_at: DateTime<Utc>,
}

/// Storage operations for user balances.
pub trait BalanceStore: Send + Sync {
    /// Register a user credited with `initial` tokens.
    fn open_account(
        &self,
        username: &str,
        initial: Tokens,
    ) -> impl Future<Output = Result<Account>> + Send;

    /// Get an account by ID.
    fn account(&self, user: UserId) -> impl Future<Output = Result<Option<Account>>> + Send;

    /// Current balance, or `None` if the user does not exist.
    fn balance(&self, user: UserId) -> impl Future<Output = Result<Option<Tokens>>> + Send;
}

/// Read access to the append-only wager records.
pub trait StakeStore: Send + Sync {
    /// Summed wager amounts per option of a question, read as one snapshot.
    ///
    /// Options without wagers may be absent from the map.
    fn stake_totals(
        &self,
        question: QuestionId,
    ) -> impl Future<Output = Result<HashMap<OptionId, Tokens>>> + Send;

    /// All wagers placed by a user, oldest first.
    fn wagers_for_user(&self, user: UserId) -> impl Future<Output = Result<Vec<Wager>>> + Send;

    /// All wagers on a question, oldest first.
    fn wagers_for_question(
        &self,
        question: QuestionId,
    ) -> impl Future<Output = Result<Vec<Wager>>> + Send;
}

/// The write side: balance debit and wager insert as one unit.
pub trait LedgerStore: BalanceStore + StakeStore {
    /// Debit `wager.amount` from `wager.user_id` and insert `wager`, atomically.
    ///
    /// The debit is conditional on the balance covering the amount. Either
    /// both effects become visible or neither does. Returns the balance left
    /// after the debit.
    ///
    /// # Errors
    /// `UserNotFound` or `InsufficientBalance` if the conditional debit is
    /// refused; `StorageFailure` if the commit could not complete.
    fn commit_wager(
        &self,
        wager: &Wager,
    ) -> impl Future<Output = std::result::Result<Tokens, WagerError>> + Send;
}

/// Storage operations for the question catalog.
pub trait CatalogStore: Send + Sync {
    /// Insert a question and its options as one batch.
    ///
    /// Option positions follow the order of `question.options`.
    fn create_question(
        &self,
        question: &NewQuestion,
    ) -> impl Future<Output = Result<Question>> + Send;

    /// Get a question with its options.
    fn question(&self, id: QuestionId) -> impl Future<Output = Result<Option<Question>>> + Send;

    /// Kind and ordered options only, for validation.
    fn snapshot(
        &self,
        id: QuestionId,
    ) -> impl Future<Output = Result<Option<QuestionSnapshot>>> + Send;

    /// Newest questions first.
    fn list_questions(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<QuestionSummary>>> + Send;
}
