//! In-memory store implementation for tests and ephemeral runs.
//!
//! Balances and wagers live behind a single lock so a commit's debit and
//! insert become visible together, and a stake read sees either all of a
//! commit or none of it.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use parking_lot::RwLock;

use crate::domain::id::{OptionId, QuestionId, UserId};
use crate::domain::money::Tokens;
use crate::domain::question::{NewQuestion, Question, QuestionOption, QuestionSnapshot};
use crate::domain::wager::{Selection, Wager};
use crate::error::{CatalogError, Result, WagerError};
use crate::port::outbound::store::{
    Account, BalanceStore, CatalogStore, LedgerStore, QuestionSummary, StakeStore,
};

#[derive(Debug, Default)]
struct Ledger {
    accounts: HashMap<UserId, Account>,
    wagers: Vec<Wager>,
    next_user: i64,
}

#[derive(Debug, Default)]
struct Catalog {
    questions: BTreeMap<QuestionId, Question>,
    next_question: i64,
    next_option: i64,
}

/// In-memory store implementing every storage port.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledger: RwLock<Ledger>,
    catalog: RwLock<Catalog>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of wagers recorded so far.
    pub fn wager_count(&self) -> usize {
        self.ledger.read().wagers.len()
    }
}

impl BalanceStore for MemoryStore {
    async fn open_account(&self, username: &str, initial: Tokens) -> Result<Account> {
        let mut ledger = self.ledger.write();
        if ledger.accounts.values().any(|a| a.username == username) {
            return Err(CatalogError::DuplicateUsername {
                username: username.to_string(),
            }
            .into());
        }

        ledger.next_user += 1;
        let account = Account {
            id: UserId::new(ledger.next_user),
            username: username.to_string(),
            balance: initial,
            created_at: Utc::now(),
        };
        ledger.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn account(&self, user: UserId) -> Result<Option<Account>> {
        Ok(self.ledger.read().accounts.get(&user).cloned())
    }

    async fn balance(&self, user: UserId) -> Result<Option<Tokens>> {
        Ok(self.ledger.read().accounts.get(&user).map(|a| a.balance))
    }
}

impl StakeStore for MemoryStore {
    async fn stake_totals(&self, question: QuestionId) -> Result<HashMap<OptionId, Tokens>> {
        let ledger = self.ledger.read();
        let mut totals: HashMap<OptionId, Tokens> = HashMap::new();
        for wager in ledger.wagers.iter().filter(|w| w.question_id == question) {
            if let Selection::Option(option) = wager.selection {
                let entry = totals.entry(option).or_default();
                *entry = entry.saturating_add(wager.amount);
            }
        }
        Ok(totals)
    }

    async fn wagers_for_user(&self, user: UserId) -> Result<Vec<Wager>> {
        Ok(self
            .ledger
            .read()
            .wagers
            .iter()
            .filter(|w| w.user_id == user)
            .cloned()
            .collect())
    }

    async fn wagers_for_question(&self, question: QuestionId) -> Result<Vec<Wager>> {
        Ok(self
            .ledger
            .read()
            .wagers
            .iter()
            .filter(|w| w.question_id == question)
            .cloned()
            .collect())
    }
}

impl LedgerStore for MemoryStore {
    async fn commit_wager(&self, wager: &Wager) -> std::result::Result<Tokens, WagerError> {
        let mut ledger = self.ledger.write();
        let account = ledger
            .accounts
            .get_mut(&wager.user_id)
            .ok_or(WagerError::UserNotFound(wager.user_id))?;

        if account.balance < wager.amount {
            return Err(WagerError::InsufficientBalance {
                balance: account.balance,
                requested: wager.amount,
            });
        }
        account.balance -= wager.amount;
        let remaining = account.balance;

        ledger.wagers.push(wager.clone());
        Ok(remaining)
    }
}

impl CatalogStore for MemoryStore {
    async fn create_question(&self, draft: &NewQuestion) -> Result<Question> {
        let mut catalog = self.catalog.write();
        catalog.next_question += 1;
        let id = QuestionId::new(catalog.next_question);

        let mut options = Vec::with_capacity(draft.options.len());
        for (position, label) in draft.options.iter().enumerate() {
            catalog.next_option += 1;
            options.push(QuestionOption {
                id: OptionId::new(catalog.next_option),
                question_id: id,
                position: position as u32,
                label: label.clone(),
            });
        }

        let question = Question {
            id,
            kind: draft.kind,
            creator: draft.creator,
            title: draft.title.clone(),
            description: draft.description.clone(),
            created_at: Utc::now(),
            options,
        };
        catalog.questions.insert(id, question.clone());
        Ok(question)
    }

    async fn question(&self, id: QuestionId) -> Result<Option<Question>> {
        Ok(self.catalog.read().questions.get(&id).cloned())
    }

    async fn snapshot(&self, id: QuestionId) -> Result<Option<QuestionSnapshot>> {
        Ok(self.catalog.read().questions.get(&id).map(Question::snapshot))
    }

    async fn list_questions(&self, limit: usize) -> Result<Vec<QuestionSummary>> {
        let catalog = self.catalog.read();
        let ledger = self.ledger.read();
        Ok(catalog
            .questions
            .values()
            .rev()
            .filter_map(|q| {
                let creator = ledger.accounts.get(&q.creator)?;
                Some(QuestionSummary {
                    id: q.id,
                    kind: q.kind,
                    title: q.title.clone(),
                    creator: q.creator,
                    creator_username: creator.username.clone(),
                    created_at: q.created_at,
                })
            })
            .take(limit)
            .collect())
    }
}
