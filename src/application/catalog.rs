//! Question management and user registration.
//!
//! These flows sit outside the wagering core; they only feed it users with
//! balances and questions with options.

use std::sync::Arc;

use tracing::info;

use crate::domain::id::QuestionId;
use crate::domain::money::Tokens;
use crate::domain::question::{default_yes_no_options, NewQuestion, Question, QuestionKind};
use crate::error::{CatalogError, Result};
use crate::port::outbound::store::{Account, BalanceStore, CatalogStore, QuestionSummary};

/// How many questions a listing returns.
pub const LIST_LIMIT: usize = 50;

/// Registration and question catalog use cases.
pub struct CatalogService<B, C> {
    balances: Arc<B>,
    catalog: Arc<C>,
    initial_tokens: Tokens,
}

impl<B, C> CatalogService<B, C>
where
    B: BalanceStore,
    C: CatalogStore,
{
    pub fn new(balances: Arc<B>, catalog: Arc<C>, initial_tokens: Tokens) -> Self {
        Self {
            balances,
            catalog,
            initial_tokens,
        }
    }

    /// Register a user with the configured starting balance.
    ///
    /// # Errors
    /// `EmptyUsername` or `DuplicateUsername`, or a storage error.
    pub async fn register(&self, username: &str) -> Result<Account> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CatalogError::EmptyUsername.into());
        }
        let account = self
            .balances
            .open_account(username, self.initial_tokens)
            .await?;
        info!(user = %account.id, username, balance = account.balance, "User registered");
        Ok(account)
    }

    /// Add a question to the catalog.
    ///
    /// A yes/no question without options gets `Yes`/`No`. Other choice kinds
    /// need at least one option; non-choice kinds drop any given.
    ///
    /// # Errors
    /// A [`CatalogError`] for malformed drafts or unknown creators.
    pub async fn create_question(&self, mut draft: NewQuestion) -> Result<Question> {
        if draft.title.en.trim().is_empty() {
            return Err(CatalogError::MissingTitle.into());
        }

        if draft.kind.is_choice() {
            if draft.options.is_empty() {
                if draft.kind != QuestionKind::YesNo {
                    return Err(CatalogError::MissingOptions { kind: draft.kind }.into());
                }
                draft.options = default_yes_no_options();
            }
            if draft.options.iter().any(|o| o.en.trim().is_empty()) {
                return Err(CatalogError::EmptyOptionLabel.into());
            }
        } else {
            draft.options.clear();
        }

        if self.balances.account(draft.creator).await?.is_none() {
            return Err(CatalogError::UserNotFound(draft.creator).into());
        }

        let question = self.catalog.create_question(&draft).await?;
        info!(
            question = %question.id,
            kind = %question.kind,
            options = question.options.len(),
            "Question created"
        );
        Ok(question)
    }

    /// Newest questions first, at most [`LIST_LIMIT`].
    ///
    /// # Errors
    /// Returns an error if the read fails.
    pub async fn list_questions(&self) -> Result<Vec<QuestionSummary>> {
        self.catalog.list_questions(LIST_LIMIT).await
    }

    /// One question with its options.
    ///
    /// # Errors
    /// `QuestionNotFound`, or a storage error.
    pub async fn question(&self, id: QuestionId) -> Result<Question> {
        self.catalog
            .question(id)
            .await?
            .ok_or_else(|| CatalogError::QuestionNotFound(id).into())
    }
}
