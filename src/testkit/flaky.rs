//! Fault injection for the commit step.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::domain::id::{OptionId, QuestionId, UserId};
use crate::domain::money::Tokens;
use crate::domain::question::{NewQuestion, Question, QuestionSnapshot};
use crate::domain::wager::Wager;
use crate::error::{Result, WagerError};
use crate::port::outbound::store::{
    Account, BalanceStore, CatalogStore, LedgerStore, QuestionSummary, StakeStore,
};

/// Wraps a store and fails the next commit with `StorageFailure` when armed.
///
/// A failed commit never reaches the inner store, mirroring a transaction
/// that rolled back.
#[derive(Debug, Default)]
pub struct FlakyStore<S> {
    inner: S,
    fail_next: AtomicBool,
    commits: AtomicUsize,
}

impl<S> FlakyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_next: AtomicBool::new(false),
            commits: AtomicUsize::new(0),
        }
    }

    /// Fail the next `commit_wager` call.
    pub fn fail_next_commit(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Number of commits attempted, failed ones included.
    pub fn commit_attempts(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: BalanceStore> BalanceStore for FlakyStore<S> {
    async fn open_account(&self, username: &str, initial: Tokens) -> Result<Account> {
        self.inner.open_account(username, initial).await
    }

    async fn account(&self, user: UserId) -> Result<Option<Account>> {
        self.inner.account(user).await
    }

    async fn balance(&self, user: UserId) -> Result<Option<Tokens>> {
        self.inner.balance(user).await
    }
}

impl<S: StakeStore> StakeStore for FlakyStore<S> {
    async fn stake_totals(&self, question: QuestionId) -> Result<HashMap<OptionId, Tokens>> {
        self.inner.stake_totals(question).await
    }

    async fn wagers_for_user(&self, user: UserId) -> Result<Vec<Wager>> {
        self.inner.wagers_for_user(user).await
    }

    async fn wagers_for_question(&self, question: QuestionId) -> Result<Vec<Wager>> {
        self.inner.wagers_for_question(question).await
    }
}

impl<S: LedgerStore> LedgerStore for FlakyStore<S> {
    async fn commit_wager(&self, wager: &Wager) -> std::result::Result<Tokens, WagerError> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(WagerError::storage("injected commit failure"));
        }
        self.inner.commit_wager(wager).await
    }
}

impl<S: CatalogStore> CatalogStore for FlakyStore<S> {
    async fn create_question(&self, question: &NewQuestion) -> Result<Question> {
        self.inner.create_question(question).await
    }

    async fn question(&self, id: QuestionId) -> Result<Option<Question>> {
        self.inner.question(id).await
    }

    async fn snapshot(&self, id: QuestionId) -> Result<Option<QuestionSnapshot>> {
        self.inner.snapshot(id).await
    }

    async fn list_questions(&self, limit: usize) -> Result<Vec<QuestionSummary>> {
        self.inner.list_questions(limit).await
    }
}
